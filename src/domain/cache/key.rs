//! Lookup key normalization

/// Canonicalizes a lookup key so cache lookups ignore case and surrounding
/// whitespace. Total: an empty or all-whitespace input yields `""`, which is
/// still a usable key.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize_key("  Tokyo "), "tokyo");
        assert_eq!(normalize_key("Central"), "central");
        assert_eq!(normalize_key("\tHAMMERSMITH-CITY\n"), "hammersmith-city");
    }

    #[test]
    fn test_empty_key_is_accepted() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("   "), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "", " ", "Tokyo", "  São Paulo ", "ΣΊΣΥΦΟΣ", "İstanbul", "MiXeD cAsE", "a\u{3000}",
        ];

        for input in inputs {
            let once = normalize_key(input);
            assert_eq!(normalize_key(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_case_variants_share_a_key() {
        assert_eq!(normalize_key("LONDON"), normalize_key(" london"));
    }
}
