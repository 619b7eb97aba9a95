//! Text normalization and tokenization for question matching.
//!
//! Every token produced here is made of ASCII lowercase letters and digits
//! only, so downstream comparisons can treat byte length as character length.

/// Words that carry no topic on their own: greetings, pronouns, articles and
/// the auxiliaries customers wrap around a question.
pub const STOP_WORDS: &[&str] = &[
    "do", "does", "is", "are", "the", "a", "an", "of", "on", "in", "to", "for", "what", "your",
    "you", "i", "we", "and", "or", "with", "my", "our", "hi", "hello", "good", "morning",
    "evening", "afternoon", "at", "how", "when", "where", "please", "can", "could", "would",
];

pub const MIN_TOKEN_LEN: usize = 2;
pub const MIN_CONTENT_TOKEN_LEN: usize = 3;

/// Lower-case, blank out anything that is not `[a-z0-9]` or whitespace, then
/// collapse whitespace runs into single spaces.
pub fn normalize(text: &str) -> String {
    let blanked: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    blanked.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drops single-character tokens.
pub fn filter_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

pub fn is_content_token(token: &str) -> bool {
    token.len() >= MIN_CONTENT_TOKEN_LEN && !is_stop_word(token)
}

pub fn content_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| is_content_token(t))
        .cloned()
        .collect()
}

/// Tokens and content tokens of one text, computed once and reused for every
/// comparison in a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    pub tokens: Vec<String>,
    pub content: Vec<String>,
}

impl TokenSet {
    pub fn from_text(text: &str) -> Self {
        let tokens = filter_tokens(tokenize(text));
        let content = content_tokens(&tokens);
        Self { tokens, content }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_spaces() {
        assert_eq!(normalize("  What are   your hours?! "), "what are your hours");
        assert_eq!(normalize("Hair-Coloring\tprices\n"), "hair coloring prices");
        assert_eq!(normalize("???"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_output_is_restricted_alphabet() {
        let samples = [
            "Café au lait, s'il vous plaît!",
            "\u{00A0}tabs\tand\u{2003}em spaces",
            "ÜBER straße 42 № 7",
            "İstanbul",
            "emoji 🎉 party",
        ];

        for s in samples {
            let n = normalize(s);
            assert!(
                n.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '),
                "unexpected char in {n:?}"
            );
            assert!(!n.starts_with(' ') && !n.ends_with(' '), "untrimmed {n:?}");
            assert!(!n.contains("  "), "double space in {n:?}");
        }
    }

    #[test]
    fn tokenize_splits_normalized_words() {
        assert_eq!(
            tokenize("Is Jitendra available?"),
            vec!["is", "jitendra", "available"]
        );
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn filter_drops_single_characters() {
        let tokens = tokenize("I want a 3 day trim");
        assert_eq!(filter_tokens(tokens), vec!["want", "day", "trim"]);
    }

    #[test]
    fn content_tokens_skip_stop_words_and_short_words() {
        assert!(is_content_token("hours"));
        assert!(is_content_token("cut"));
        assert!(!is_content_token("what"));
        assert!(!is_content_token("please"));
        assert!(!is_content_token("me"));

        let set = TokenSet::from_text("Hello, can I book a hair cut for my son?");
        assert_eq!(set.content, vec!["book", "hair", "cut", "son"]);
    }
}
