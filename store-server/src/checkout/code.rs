//! Order code generation
//!
//! Codes are human-readable references printed on invoices: a fixed `HD`
//! tag followed by the first two hyphen-separated segments of a fresh
//! random UUID, uppercased. Shape: `HD` + 8 hex chars + 4 hex chars.

use uuid::Uuid;

/// Fixed tag prefixing every order code
pub const ORDER_CODE_PREFIX: &str = "HD";

/// Generate a fresh order code, e.g. `HD1A2B3C4D5E6F`
pub fn generate_order_code() -> String {
    let id = Uuid::new_v4().to_string();
    let mut segments = id.split('-');
    let first = segments.next().unwrap_or_default();
    let second = segments.next().unwrap_or_default();
    format!("{ORDER_CODE_PREFIX}{first}{second}").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let code = generate_order_code();
        assert_eq!(code.len(), 2 + 8 + 4);
        assert!(code.starts_with(ORDER_CODE_PREFIX));
        assert!(
            code[2..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_codes_are_random() {
        let a = generate_order_code();
        let b = generate_order_code();
        assert_ne!(a, b);
    }
}
