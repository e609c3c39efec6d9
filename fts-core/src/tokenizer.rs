use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into",
            "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then",
            "there", "these", "they", "this", "to", "was", "will", "with",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Turn text into search terms: split on anything that is not a letter or a
/// digit, lowercase, drop stopwords, then stem. Duplicates and order are
/// preserved; the caller decides set semantics.
///
/// Stopwords are matched on the lowercased form before stemming, so "The"
/// is dropped rather than stemmed.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for mat in TOKEN_RE.find_iter(text) {
        let token = mat.as_str().to_lowercase();
        if is_stopword(&token) {
            continue;
        }
        let stem = STEMMER.stem(&token).to_string();
        if stem.is_empty() {
            continue;
        }
        tokens.push(stem);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let tokens = tokenize("Running, runner's run!");
        assert!(tokens.iter().any(|w| w == "run"));
    }

    #[test]
    fn digits_are_tokens() {
        assert_eq!(tokenize("2 dogs"), vec!["2", "dog"]);
    }
}
