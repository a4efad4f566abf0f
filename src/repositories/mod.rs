pub(crate) mod announcements;
pub(crate) mod assignments;
pub(crate) mod attendance;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod health;
pub(crate) mod notifications;
pub(crate) mod stats;
pub(crate) mod students;
pub(crate) mod submissions;
pub(crate) mod users;

/// Wraps `search` as a `%...%` pattern with its own `%`, `_` and `\`
/// taken literally. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("asha"), "%asha%");
        assert_eq!(contains_pattern("_"), "%\\_%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
