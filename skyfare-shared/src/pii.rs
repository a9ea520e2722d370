use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for passenger data that must not leak into log lines.
///
/// `Debug` and `Display` print a redacted form; `Serialize` writes the real
/// value because API responses still need it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_email(self.0.as_ref()))
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_email(self.0.as_ref()))
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// `jane.doe@example.com` -> `j*******@example.com`. Anything without an `@`
/// is fully redacted.
pub fn mask_email(value: &str) -> String {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let mut chars = local.chars();
            let first = chars.next().unwrap_or('*');
            let hidden = "*".repeat(chars.count().max(1));
            format!("{}{}@{}", first, hidden, domain)
        }
        _ => "********".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email_keeps_domain() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("a@b.io"), "a*@b.io");
    }

    #[test]
    fn test_mask_email_without_at_is_redacted() {
        assert_eq!(mask_email("not-an-email"), "********");
        assert_eq!(mask_email("@example.com"), "********");
    }

    #[test]
    fn test_masked_serializes_real_value() {
        let masked = Masked("user@example.com".to_string());
        assert_eq!(format!("{:?}", masked), "u***@example.com");
        assert_eq!(serde_json::to_string(&masked).unwrap(), "\"user@example.com\"");
    }
}
