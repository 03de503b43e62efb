// Word tokenizer.
//
// Splits on whitespace and peels punctuation off into separate tokens, the
// way a lemmatizing tagger tokenizes: "women's rights." becomes
// ["women", "'s", "rights", "."]. Hyphens and slashes split words.

use std::sync::OnceLock;

use regex_lite::Regex;

/// A token with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

const PUNCT: &str = r#".,;:!?()\[\]{}"'“”‘’«»\-–—/…"#;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"['’][sS]\b|[^\s{PUNCT}]+|[{PUNCT}]");
        Regex::new(&pattern).expect("token pattern is valid")
    })
}

pub fn tokenize(text: &str) -> Vec<Span<'_>> {
    token_regex()
        .find_iter(text)
        .map(|m| Span {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

pub fn is_punctuation(token: &str) -> bool {
    token.chars().all(|c| !c.is_alphanumeric())
}

pub fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        tokenize(text).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn splits_punctuation_and_possessive() {
        assert_eq!(
            words("The women's rights, (finally)."),
            vec!["The", "women", "'s", "rights", ",", "(", "finally", ")", "."]
        );
    }

    #[test]
    fn keeps_accented_letters_together() {
        assert_eq!(words("Thérèse of Lisieux"), vec!["Thérèse", "of", "Lisieux"]);
    }

    #[test]
    fn apostrophe_not_followed_by_s_is_punctuation() {
        assert_eq!(words("'sorry'"), vec!["'", "sorry", "'"]);
    }

    #[test]
    fn spans_point_back_into_text() {
        let text = "Mary  met John.";
        for span in tokenize(text) {
            assert_eq!(&text[span.start..span.end], span.text);
        }
    }

    #[test]
    fn classifies_tokens() {
        assert!(is_punctuation("—"));
        assert!(!is_punctuation("a."));
        assert!(is_number("1891"));
        assert!(!is_number("xiv"));
    }
}
