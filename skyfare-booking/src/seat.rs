use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skyfare_core::SeatNumber;
use std::sync::Mutex;

/// Chooses the seat for a new booking.
pub trait SeatAllocator: Send + Sync {
    fn assign(&self) -> SeatNumber;
}

/// Uniform draw over the 30 x 6 cabin grid. Seats already held by other
/// passengers are not excluded.
pub struct RandomSeatAllocator {
    rng: Mutex<StdRng>,
}

impl RandomSeatAllocator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSeatAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatAllocator for RandomSeatAllocator {
    fn assign(&self) -> SeatNumber {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let row = rng.gen_range(0..SeatNumber::ROWS as usize);
        let column = rng.gen_range(0..SeatNumber::LETTERS.len());
        SeatNumber::nth(row * SeatNumber::LETTERS.len() + column)
    }
}
