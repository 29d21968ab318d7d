//! Text helpers shared by the similarity providers.

/// Longest name prefix (in characters) that string comparisons look at.
pub const MAX_NAME_CHARS: usize = 256;

/// Lowercases a field name and caps its length for comparison.
pub fn fold_name(raw: &str) -> String {
    raw.chars().take(MAX_NAME_CHARS).collect::<String>().to_lowercase()
}

/// Splits a field name into lowercase words on any non-alphanumeric
/// character.
///
/// The name is folded first, so names differing only in case yield the same
/// words.
pub fn split_words(raw: &str) -> Vec<String> {
    fold_name(raw)
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_stopword(token: &str) -> bool {
    matches!(
        token,
        "of" | "and"
            | "the"
            | "to"
            | "for"
            | "in"
            | "on"
            | "at"
            | "with"
            | "by"
            | "from"
            | "or"
            | "a"
            | "an"
            | "is"
            | "if"
            | "your"
    )
}
