use crate::models::email::NameTokens;

/// Linking words that never contribute to an address.
const CONNECTORS: &[&str] = &["de", "da", "di", "do", "du"];

/// Standalone vowels, e.g. the "e" in "Silva e Souza".
const SINGLE_VOWELS: &[&str] = &["a", "e", "i", "o", "u"];

fn is_filler(token: &str) -> bool {
    CONNECTORS.contains(&token) || SINGLE_VOWELS.contains(&token)
}

/// Splits a typed full name into its significant lower-case words.
///
/// Order is kept and duplicates are not removed. A name made only of filler
/// words yields an empty sequence, which the caller has to reject.
pub fn tokenize(full_name: &str) -> NameTokens {
    full_name
        .to_lowercase()
        .split_whitespace()
        .filter(|token| !is_filler(token))
        .collect()
}
