//! Tokenization shared by the keyword summarizer and the keyword matcher.

/// Words that never count as keywords.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "all", "also", "an", "and", "any", "are", "as",
    "at", "be", "been", "being", "both", "but", "by", "can", "could", "do", "does", "each",
    "etc", "experience", "for", "from", "good", "great", "has", "have", "help", "in", "including",
    "into", "is", "it", "its", "join", "looking", "may", "more", "most", "must", "need", "new",
    "of", "on", "or", "our", "other", "over", "own", "per", "plus", "preferred", "required",
    "role", "should", "skills", "so", "strong", "such", "team", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "up", "us", "use", "using", "very",
    "want", "we", "well", "what", "when", "where", "which", "who", "will", "with", "within",
    "work", "working", "would", "year", "years", "you", "your",
];

/// Splits text into lowercase tokens. Letters and digits form words; `+`, `#` and `.`
/// are kept inside a token so `c++`, `c#` and `node.js` survive. Trailing dots are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|raw| raw.trim_start_matches(['.', '+', '#']).trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens worth counting as keywords: not a stop word, not a bare number, at least two
/// characters unless it carries a symbol (`c#`).
pub fn significant_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| is_significant(token))
        .collect()
}

pub fn is_significant(token: &str) -> bool {
    if STOP_WORDS.contains(&token) {
        return false;
    }
    // "5+", "10", "2.5"
    if token
        .trim_end_matches('+')
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.')
    {
        return false;
    }
    token.chars().count() >= 2 || token.contains(['+', '#'])
}

/// Space-padded token stream, so whole-token and whole-phrase lookups are plain
/// substring checks against `" {phrase} "`.
pub fn padded_token_stream(text: &str) -> String {
    let tokens = tokenize(text);
    let mut stream = String::with_capacity(text.len() + 2);
    stream.push(' ');
    stream.push_str(&tokens.join(" "));
    stream.push(' ');
    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_symbols_inside_tokens() {
        let tokens = tokenize("Experience with C++, C# and Node.js.");
        assert_eq!(tokens, vec!["experience", "with", "c++", "c#", "and", "node.js"]);
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(tokenize("CI/CD (GitHub-Actions)"), vec!["ci", "cd", "github", "actions"]);
    }

    #[test]
    fn test_significant_tokens_drop_stop_words_and_numbers() {
        let tokens = significant_tokens("You will need 5+ years of Rust and Go in 2024");
        assert_eq!(tokens, vec!["rust", "go"]);
    }

    #[test]
    fn test_single_letter_with_symbol_is_significant() {
        assert!(is_significant("c#"));
        assert!(!is_significant("c"));
    }

    #[test]
    fn test_padded_stream_supports_phrase_lookup() {
        let stream = padded_token_stream("Built Distributed-Systems at scale");
        assert!(stream.contains(" distributed systems "));
        assert!(!stream.contains(" distributed-systems "));
    }
}
