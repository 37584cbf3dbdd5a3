//! URI to filesystem key escaping.

/// Escapes a URI into a single path component.
///
/// Uses `application/x-www-form-urlencoded` byte serialization: ASCII
/// alphanumerics and `*-._` pass through, space becomes `+`, every other byte
/// becomes `%XX`. The mapping is injective and never yields `/`, so distinct
/// URIs get distinct names in one flat directory. The look-aside cache uses
/// the same key.
pub fn escape_uri(uri: &str) -> String {
    url::form_urlencoded::byte_serialize(uri.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_separators() {
        assert_eq!(
            escape_uri("https://h/a.jar"),
            "https%3A%2F%2Fh%2Fa.jar"
        );
    }

    #[test]
    fn keeps_unreserved() {
        assert_eq!(escape_uri("abc-XYZ_0.9*"), "abc-XYZ_0.9*");
    }

    #[test]
    fn space_and_plus_do_not_collide() {
        assert_eq!(escape_uri("a b"), "a+b");
        assert_eq!(escape_uri("a+b"), "a%2Bb");
    }

    #[test]
    fn never_contains_path_separators() {
        let key = escape_uri("http://example.com/x/../y\\z?q=1&r=%20");
        assert!(!key.contains('/'));
        assert!(!key.contains('\\'));
    }

    #[test]
    fn escapes_utf8_bytes() {
        assert_eq!(escape_uri("é"), "%C3%A9");
    }
}
