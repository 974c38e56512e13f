/// Sentinel returned when a phone number is too short or empty to mask
pub const UNKNOWN_PHONE: &str = "unknown";

/// Fixed pattern substituted for the masked portion of a number
const MASK_PATTERN: &str = "******";

/// Minimum digits a number must carry to be usable at all
const MIN_PHONE_DIGITS: usize = 4;

/// Strip a raw phone number down to its digits
///
/// `"+91 98765-43210"` becomes `"919876543210"`. Anything that is not an
/// ASCII digit is dropped.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// True if the record carries enough of a phone number to contact the donor
pub fn is_usable_phone(raw: &str) -> bool {
    normalize_phone(raw).len() >= MIN_PHONE_DIGITS
}

/// Mask a phone number for external display
///
/// All but the last 4 digits of the normalized number are replaced by a
/// fixed pattern. Numbers with fewer than 4 digits mask to the
/// [`UNKNOWN_PHONE`] sentinel; this function never fails.
pub fn mask_phone(raw: &str) -> String {
    let digits = normalize_phone(raw);
    if digits.len() < MIN_PHONE_DIGITS {
        return UNKNOWN_PHONE.to_string();
    }
    let last_four = &digits[digits.len() - 4..];
    format!("{}{}", MASK_PATTERN, last_four)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_non_digits() {
        assert_eq!(normalize_phone("+91 98765-43210"), "919876543210");
        assert_eq!(normalize_phone("(555) 867-5309"), "5558675309");
        assert_eq!(normalize_phone("no digits"), "");
    }

    #[test]
    fn test_mask_keeps_last_four() {
        let masked = mask_phone("+919876543210");
        assert!(masked.ends_with("3210"), "got {}", masked);
        assert_eq!(masked, "******3210");
    }

    #[test]
    fn test_mask_short_numbers() {
        assert_eq!(mask_phone(""), UNKNOWN_PHONE);
        assert_eq!(mask_phone("12"), UNKNOWN_PHONE);
        assert_eq!(mask_phone("abc"), UNKNOWN_PHONE);
    }

    #[test]
    fn test_mask_exactly_four_digits() {
        assert_eq!(mask_phone("1234"), "******1234");
    }

    #[test]
    fn test_usable_phone() {
        assert!(is_usable_phone("+919876543210"));
        assert!(!is_usable_phone(""));
        assert!(!is_usable_phone("911"));
    }
}
