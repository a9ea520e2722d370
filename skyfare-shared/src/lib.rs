pub mod pii;

pub use pii::{mask_email, Masked};
