use skyfare_core::City;

const CITIES: &[City] = &[
    City { code: "JFK", name: "New York", country: "United States" },
    City { code: "LAX", name: "Los Angeles", country: "United States" },
    City { code: "ORD", name: "Chicago", country: "United States" },
    City { code: "SFO", name: "San Francisco", country: "United States" },
    City { code: "MIA", name: "Miami", country: "United States" },
    City { code: "LHR", name: "London", country: "United Kingdom" },
    City { code: "CDG", name: "Paris", country: "France" },
    City { code: "FRA", name: "Frankfurt", country: "Germany" },
    City { code: "DXB", name: "Dubai", country: "United Arab Emirates" },
    City { code: "SIN", name: "Singapore", country: "Singapore" },
    City { code: "HKG", name: "Hong Kong", country: "China" },
    City { code: "HND", name: "Tokyo", country: "Japan" },
    City { code: "SYD", name: "Sydney", country: "Australia" },
];

/// Every city the storefront serves, in display order.
pub fn cities() -> &'static [City] {
    CITIES
}

pub fn city(code: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.code == code)
}

pub fn is_known_city(code: &str) -> bool {
    city(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_city_codes_are_unique() {
        let codes: HashSet<_> = cities().iter().map(|c| c.code).collect();
        assert_eq!(codes.len(), cities().len());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(city("LHR").map(|c| c.name), Some("London"));
        assert!(city("lhr").is_none());
        assert!(!is_known_city("XXX"));
    }
}
