/// Escape character paired with [`contains_pattern`] in `ILIKE ... ESCAPE` clauses.
pub const LIKE_ESCAPE: char = '\\';

/// Builds a substring pattern for `ILIKE` in which `%` and `_` in the
/// user's input match themselves.
///
/// The SQL must name the escape character: `col ILIKE $1 ESCAPE '\'`.
pub fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_wrapped() {
        assert_eq!(contains_pattern("amina"), "%amina%");
    }

    #[test]
    fn test_wildcards_are_escaped() {
        assert_eq!(contains_pattern("amina_y"), r"%amina\_y%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
    }

    #[test]
    fn test_escape_character_is_escaped() {
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
