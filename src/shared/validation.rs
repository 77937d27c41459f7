use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating slug fields (product and category slugs).
    /// Must be lowercase alphanumeric with single hyphens
    /// - Valid: "gaming-laptop", "rtx4090", "asus-rog-strix"
    /// - Invalid: "-laptop", "laptop-", "gaming--laptop", "Laptop", "gaming_laptop"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Regex for Bangladeshi mobile numbers, with or without the +88 prefix
    /// - Valid: "01712345678", "+8801712345678", "8801712345678"
    /// - Invalid: "1712345678", "017123", "02123456789"
    pub static ref BD_MOBILE_REGEX: Regex = Regex::new(r"^(?:\+?88)?01[3-9]\d{8}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("gaming-laptop"));
        assert!(SLUG_REGEX.is_match("rtx4090"));
        assert!(SLUG_REGEX.is_match("asus-rog-strix-g16"));
        assert!(SLUG_REGEX.is_match("a"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-laptop")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("laptop-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("gaming--laptop")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Laptop")); // uppercase
        assert!(!SLUG_REGEX.is_match("gaming_laptop")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("gaming laptop")); // space
    }

    #[test]
    fn test_bd_mobile_regex() {
        assert!(BD_MOBILE_REGEX.is_match("01712345678"));
        assert!(BD_MOBILE_REGEX.is_match("+8801712345678"));
        assert!(BD_MOBILE_REGEX.is_match("8801912345678"));
        assert!(!BD_MOBILE_REGEX.is_match("1712345678")); // missing leading 0
        assert!(!BD_MOBILE_REGEX.is_match("017123")); // too short
        assert!(!BD_MOBILE_REGEX.is_match("02123456789")); // not a mobile prefix
    }
}
