use tracing::debug;

/// Country calling code prefix for Kenyan subscriber numbers
pub const KENYA_PREFIX: &str = "+254";

/// Normalize a loosely formatted phone number into canonical `+254XXXXXXXXX` form
///
/// Accepted raw forms:
/// - local `0XXXXXXXXX` (10 digits)
/// - international without plus `254XXXXXXXXX` (12 digits)
/// - already prefixed `+254...` (whitespace and dashes removed)
/// - bare subscriber number `XXXXXXXXX` (9 digits)
///
/// Anything else is returned unchanged so that `is_valid_phone` rejects it.
/// The function never fails and is idempotent.
pub fn normalize_phone(input: &str) -> String {
    let cleaned = clean_phone(input);

    // A retained '+' means the caller already supplied an international form
    if !cleaned.starts_with('+') {
        if cleaned.starts_with('0') && cleaned.len() == 10 {
            return format!("{}{}", KENYA_PREFIX, &cleaned[1..]);
        }
        if cleaned.starts_with("254") && cleaned.len() == 12 {
            return format!("+{}", cleaned);
        }
    }

    if input.trim_start().starts_with(KENYA_PREFIX) {
        return strip_separators(input);
    }

    if !cleaned.starts_with('+') && cleaned.len() == 9 {
        return format!("{}{}", KENYA_PREFIX, cleaned);
    }

    debug!("Phone number left unnormalized: {:?}", input);
    input.to_string()
}

/// Keep only ASCII digits, plus a '+' if it is the first non-space character
fn clean_phone(input: &str) -> String {
    let trimmed = input.trim_start();
    let mut cleaned = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        cleaned.push('+');
    }
    cleaned.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
    cleaned
}

fn strip_separators(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_form_gets_country_code() {
        assert_eq!(normalize_phone("0712345678"), "+254712345678");
        assert_eq!(normalize_phone("0712 345 678"), "+254712345678");
        assert_eq!(normalize_phone("071-234-5678"), "+254712345678");
    }

    #[test]
    fn test_international_without_plus() {
        assert_eq!(normalize_phone("254712345678"), "+254712345678");
        assert_eq!(normalize_phone("254 712 345 678"), "+254712345678");
    }

    #[test]
    fn test_already_prefixed_is_stripped() {
        assert_eq!(normalize_phone("+254712345678"), "+254712345678");
        assert_eq!(normalize_phone("+254 712-345-678"), "+254712345678");
        assert_eq!(normalize_phone("  +254 712 345 678"), "+254712345678");
    }

    #[test]
    fn test_nine_digit_subscriber_number() {
        for local in ["712345678", "110000000", "798765432"] {
            assert_eq!(normalize_phone(local), format!("+254{}", local));
        }
        assert_eq!(normalize_phone("712 345 678"), "+254712345678");
    }

    #[test]
    fn test_unrecognized_input_is_returned_unchanged() {
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone("not a phone"), "not a phone");
        assert_eq!(normalize_phone(""), "");
        assert_eq!(normalize_phone("+1 555 0100"), "+1 555 0100");
        assert_eq!(normalize_phone("07123456789"), "07123456789");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "0712345678",
            "254712345678",
            "+254712345678",
            "+254 712 345 678",
            "712345678",
            "+254 71",
            "12345",
            "",
            "  0712345678  ",
            "+0712345678",
            "abc-def",
        ];
        for input in inputs {
            let once = normalize_phone(input);
            assert_eq!(normalize_phone(&once), once, "input {:?}", input);
        }
    }
}
