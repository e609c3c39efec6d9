use fts_core::tokenizer::tokenize;

#[test]
fn it_tokenizes_folds_filters_and_stems() {
    assert_eq!(
        tokenize("The quick brown FOXES, jumping over 2 lazy dogs!"),
        vec!["quick", "brown", "fox", "jump", "over", "2", "lazi", "dog"]
    );
}

#[test]
fn it_filters_stopwords() {
    let tokens = tokenize("the cat and the dog");
    assert_eq!(tokens, vec!["cat", "dog"]);
}

#[test]
fn it_drops_stopwords_before_stemming() {
    // "This" must be matched as a stopword on its lowercased form, not on
    // its stem
    assert!(tokenize("This is it").is_empty());
}

#[test]
fn it_splits_on_every_non_alphanumeric_code_point() {
    assert_eq!(
        tokenize("state-of-the-art (2024)"),
        vec!["state", "art", "2024"]
    );
}

#[test]
fn it_keeps_duplicates_and_order() {
    assert_eq!(tokenize("dog dog cat dog"), vec!["dog", "dog", "cat", "dog"]);
}

#[test]
fn tokens_are_never_empty_uppercase_or_stopwords() {
    let stopwords = [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is",
        "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
        "these", "they", "this", "to", "was", "will", "with",
    ];
    let tokens = tokenize("The Wikipedia abstracts, with THEIR titles and URLs, are indexed!");
    assert!(!tokens.is_empty());
    for token in tokens {
        assert!(!token.is_empty());
        assert_eq!(token, token.to_lowercase());
        assert!(!stopwords.contains(&token.as_str()));
    }
}

#[test]
fn empty_and_punctuation_only_input_yield_nothing() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("...!?,;--").is_empty());
}
