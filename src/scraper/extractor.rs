use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Address grammar. The `|` in the last class is a literal pipe and the TLD
/// is capped at 2..=7 letters; both are part of the matching contract.
pub const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,7}\b";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

/// Every match in `text`, left to right, duplicates included.
pub fn extract(text: &str) -> Vec<String> {
    EMAIL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Drops repeated addresses, keeping the first occurrence of each.
pub fn unique<S: AsRef<str>>(emails: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .iter()
        .map(|e| e.as_ref())
        .filter(|e| seen.insert(*e))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_order() {
        assert_eq!(
            extract("contact: a@b.com and c@d.org"),
            vec!["a@b.com", "c@d.org"]
        );
    }

    #[test]
    fn test_no_matches() {
        assert!(extract("no emails here").is_empty());
        assert!(extract("").is_empty());
        assert!(extract("@ alone, user@ and @host.com").is_empty());
    }

    #[test]
    fn test_tld_length_bounds() {
        assert!(extract("x@y.toolongtld").is_empty());
        assert!(extract("x@y.c").is_empty());
        assert_eq!(extract("x@y.co"), vec!["x@y.co"]);
        assert_eq!(extract("x@y.museums"), vec!["x@y.museums"]);
        assert!(extract("x@y.museumss").is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let text = "a@b.com, c@d.org, a@b.com";
        assert_eq!(extract(text), vec!["a@b.com", "c@d.org", "a@b.com"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "<p>Mail <a href=\"mailto:info@example.com\">info@example.com</a> \
                    or sales.team+eu@mail.example.co.uk</p>";
        let first = extract(text);
        assert_eq!(first, extract(text));
        assert_eq!(
            first,
            vec![
                "info@example.com",
                "info@example.com",
                "sales.team+eu@mail.example.co.uk"
            ]
        );
    }

    #[test]
    fn test_grammar_quirks() {
        // Literal pipe is accepted inside the TLD class
        assert_eq!(extract("a@b.c|m"), vec!["a@b.c|m"]);
        // Upper case TLDs and a trailing sentence dot
        assert_eq!(extract("Write to JOHN@EXAMPLE.COM."), vec!["JOHN@EXAMPLE.COM"]);
        // Local part characters
        assert_eq!(extract("100%_off-deal@x.io"), vec!["100%_off-deal@x.io"]);
    }

    #[test]
    fn test_word_boundaries() {
        assert!(extract("a@b.comx1").is_empty());
        assert_eq!(extract("(a@b.com)"), vec!["a@b.com"]);
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let emails = vec!["b@x.com", "a@x.com", "b@x.com", "c@x.com", "a@x.com"];
        assert_eq!(unique(&emails), vec!["b@x.com", "a@x.com", "c@x.com"]);
        assert!(unique::<String>(&[]).is_empty());
    }
}
