//! Compiled search patterns for the built-in handlers
//!
//! URL pattern after John Gruber's "liberal, accurate regex for matching URLs"
//! (http://daringfireball.net/2010/07/improved_regex_for_matching_urls).
//! E-mail pattern after the jQuery Validation plugin's `email` method.
//! IPv4 octets after Perl's Regexp::Common::net.
//!
//! The `regex` crate has no lookaround, so the one lookahead the URL pattern
//! needs lives in [`ATTRIBUTE_TAIL`] and is applied by the handler.

use regex::Regex;
use std::sync::LazyLock;

const IPV4: &str = r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9]{1,2})\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9]{1,2})";

/// `scheme:` followed by slashes, or by a single opaque character (`mailto:x`)
const PROTOCOL: &str = r"(?P<scheme>[a-z][\w-]+:)(?:/{1,3}|(?P<opaque>[a-z0-9%]))";

/// URL body: anything but whitespace, parens, angle brackets and quotes, with
/// up to two levels of balanced parens. The last character must not be
/// punctuation.
const URL_BODY: &str = r#"(?:[^\s()<>"]+|\((?:[^\s()<>"]+|\([^\s()<>"]+\))*\))+(?:\((?:[^\s()<>"]+|\([^\s()<>"]+\))*\)|[^\s()<>"\[\]{};:'`.,!?«»“”‘’])"#;

/// Characters allowed beyond ASCII, mirroring the BMP ranges the validator allows
const UCS: &str = r"\x{A0}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}";

fn domain_source() -> String {
    format!(r"www\d{{0,3}}\.|[a-z0-9.\-]+\.[a-z]{{2,4}}/|{IPV4}(?::\d+)?/")
}

fn url_source() -> String {
    format!(r"(?i)\b(?:{PROTOCOL}|{domain})(?:{URL_BODY})", domain = domain_source())
}

fn email_source() -> String {
    let atom = format!(r"[a-z0-9!#$%&'*+\-/=?^_`{{|}}~{UCS}]");
    let fws = r"(?:[\x20\x09]*\x0d\x0a)?[\x20\x09]+";
    let qtext = format!(r"[\x01-\x08\x0b\x0c\x0e-\x1f\x7f\x21\x23-\x5b\x5d-\x7e{UCS}]");
    let quoted_pair = format!(r"\\[\x01-\x09\x0b\x0c\x0d-\x7f{UCS}]");
    let local = format!(
        r"(?:{atom}+(?:\.{atom}+)*|\x22(?:(?:{fws})?(?:{qtext}|{quoted_pair}))*(?:{fws})?\x22)"
    );

    let alnum = format!("[a-z0-9{UCS}]");
    let alpha = format!("[a-z{UCS}]");
    let inner = format!(r"[a-z0-9\-._~{UCS}]");
    let label = format!("(?:{alnum}|{alnum}{inner}*{alnum})");
    let tld = format!("(?:{alpha}|{alpha}{inner}*{alpha})+");

    format!(r"(?i)\b{local}@(?:(?:{label}\.)+{tld}|{IPV4})")
}

/// Full URL search pattern
pub static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&url_source()).expect("built-in URL pattern compiles"));

/// E-mail address search pattern
pub static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&email_source()).expect("built-in e-mail pattern compiles"));

/// What follows `scheme:x` when the text is really an attribute, as in
/// `xmlns:foo="..."`. Anchored at the character after `x`.
pub static ATTRIBUTE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[\w-]*\s*=\s*""#).expect("built-in attribute pattern compiles")
});

#[cfg(test)]
mod tests {
    use super::*;

    fn url_matches<'a>(text: &'a str) -> Vec<&'a str> {
        URL.find_iter(text).map(|m| m.as_str()).collect()
    }

    fn email_matches<'a>(text: &'a str) -> Vec<&'a str> {
        EMAIL.find_iter(text).map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_patterns_compile() {
        LazyLock::force(&URL);
        LazyLock::force(&EMAIL);
        LazyLock::force(&ATTRIBUTE_TAIL);
    }

    #[test]
    fn test_url_forms() {
        assert_eq!(url_matches("see http://example.com now"), ["http://example.com"]);
        assert_eq!(url_matches("FTP://Files.Example.com/a"), ["FTP://Files.Example.com/a"]);
        assert_eq!(url_matches("go www.example.com/page"), ["www.example.com/page"]);
        assert_eq!(url_matches("www2.example.com"), ["www2.example.com"]);
        assert_eq!(url_matches("example.org/path?q=1"), ["example.org/path?q=1"]);
        assert_eq!(url_matches("at 192.168.0.1:8080/admin"), ["192.168.0.1:8080/admin"]);
        assert_eq!(url_matches("news:comp.lang.rust"), ["news:comp.lang.rust"]);
    }

    #[test]
    fn test_url_trailing_punctuation() {
        assert_eq!(url_matches("(see http://example.com/a)."), ["http://example.com/a"]);
        assert_eq!(url_matches("http://example.com/a, b"), ["http://example.com/a"]);
        assert_eq!(url_matches("«http://example.com/x»"), ["http://example.com/x"]);
        assert_eq!(
            url_matches("http://en.wikipedia.org/wiki/Rust_(language)."),
            ["http://en.wikipedia.org/wiki/Rust_(language)"]
        );
    }

    #[test]
    fn test_url_non_matches() {
        assert!(url_matches("no links here").is_empty());
        assert!(url_matches("example.com").is_empty());
        assert!(url_matches("ratio 3:4").is_empty());
        assert!(url_matches("contact: a.b@example.org.").is_empty());
    }

    #[test]
    fn test_email_forms() {
        assert_eq!(email_matches("contact: a.b@example.org."), ["a.b@example.org"]);
        assert_eq!(email_matches("x+tag@mail.example.co.uk"), ["x+tag@mail.example.co.uk"]);
        assert_eq!(email_matches("root@192.168.1.1"), ["root@192.168.1.1"]);
        assert_eq!(email_matches("René@exämple.de"), ["René@exämple.de"]);
    }

    #[test]
    fn test_email_non_matches() {
        assert!(email_matches("no links here").is_empty());
        assert!(email_matches("user@").is_empty());
        assert!(email_matches("@example.org").is_empty());
    }

    #[test]
    fn test_attribute_tail() {
        assert!(ATTRIBUTE_TAIL.is_match(r#"oo="http://x""#));
        assert!(ATTRIBUTE_TAIL.is_match(r#"-bar = "x""#));
        assert!(!ATTRIBUTE_TAIL.is_match("ser@example.org"));
    }
}
