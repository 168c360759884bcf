/// Separator used inside delimiter-joined list settings (ticker items).
pub const LIST_SEPARATOR: char = '•';

/// Splits a delimiter-joined setting value into display items.
///
/// Segments are trimmed and empty segments are dropped; order is preserved.
pub fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(
            split_list("A • B •  • C", LIST_SEPARATOR),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_split_preserves_order_and_inner_whitespace() {
        assert_eq!(
            split_list("first item•second item", LIST_SEPARATOR),
            vec!["first item", "second item"]
        );
    }

    #[test]
    fn test_split_empty_input() {
        assert!(split_list("", LIST_SEPARATOR).is_empty());
        assert!(split_list(" • • ", LIST_SEPARATOR).is_empty());
    }
}
