/*
[INPUT]:  Raw keystrokes or pasted text
[OUTPUT]: Normalized input ready to merge into field values
[POS]:    View-level input sanitation helpers
[UPDATE]: When new constrained input formats appear
*/

/// Keep ASCII digits only and truncate to `max_len`
pub fn digits_only(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_len)
        .collect()
}

/// Trim surrounding whitespace and lowercase an email address
pub fn normalize_email(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123456", 6, "123456")]
    #[case("12-34 56", 6, "123456")]
    #[case("1234567890", 6, "123456")]
    #[case("abc", 6, "")]
    #[case("９12", 6, "12")]
    fn test_digits_only(#[case] input: &str, #[case] max_len: usize, #[case] expected: &str) {
        assert_eq!(digits_only(input, max_len), expected);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
