//! Parse validator headers out of collected response header lines.

use super::Validators;

/// Extract `ETag` / `Last-Modified` from raw header lines.
///
/// Lines from every response in a redirect chain are fed in order; a status
/// line (`HTTP/...`) starts over so only the final response counts. Values are
/// kept verbatim (quotes included, since they are sent back in
/// `If-None-Match`). A header that is present with an empty value yields
/// `Some("")`, distinct from an absent header.
pub(crate) fn parse_validators(lines: &[String]) -> Validators {
    let mut out = Validators::default();
    for line in lines {
        let line = line.trim();
        if line.len() >= 5 && line[..5].eq_ignore_ascii_case("HTTP/") {
            out = Validators::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("etag") {
                out.etag = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("last-modified") {
                out.last_modified = Some(value.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_etag_and_last_modified() {
        let v = parse_validators(&lines(&[
            "HTTP/1.1 200 OK",
            "ETag: \"abc-123\"",
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT",
            "Content-Length: 3",
        ]));
        assert_eq!(v.etag.as_deref(), Some("\"abc-123\""));
        assert_eq!(
            v.last_modified.as_deref(),
            Some("Wed, 21 Oct 2015 07:28:00 GMT")
        );
    }

    #[test]
    fn absent_headers_are_none() {
        let v = parse_validators(&lines(&["HTTP/1.1 200 OK", "Content-Length: 3", ""]));
        assert!(v.etag.is_none());
        assert!(v.last_modified.is_none());
    }

    #[test]
    fn empty_header_is_some_empty() {
        let v = parse_validators(&lines(&["HTTP/1.1 200 OK", "ETag:", "last-modified:   "]));
        assert_eq!(v.etag.as_deref(), Some(""));
        assert_eq!(v.last_modified.as_deref(), Some(""));
    }

    #[test]
    fn only_final_response_in_redirect_chain_counts() {
        let v = parse_validators(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: /real",
            "ETag: \"redirect\"",
            "",
            "HTTP/1.1 200 OK",
            "Last-Modified: Thu, 01 Jan 2015 00:00:00 GMT",
        ]));
        assert!(v.etag.is_none());
        assert!(v.last_modified.is_some());
    }
}
