//! Typo-tolerant token comparison using Levenshtein distance.

/// Tokens at or below this length only tolerate a single edit.
pub const SHORT_TOKEN_LEN: usize = 5;
pub const SHORT_TOKEN_MAX_EDITS: usize = 1;
pub const LONG_TOKEN_MAX_EDITS: usize = 2;

/// Calculate Levenshtein distance between two strings
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0; b.len() + 1]; a.len() + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }
    dp[a.len()][b.len()]
}

/// Equality with a typo budget: one edit when either token is short, two
/// otherwise.
pub fn fuzzy_equal(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let short = a.chars().count() <= SHORT_TOKEN_LEN || b.chars().count() <= SHORT_TOKEN_LEN;
    let max_edits = if short {
        SHORT_TOKEN_MAX_EDITS
    } else {
        LONG_TOKEN_MAX_EDITS
    };

    levenshtein(a, b) <= max_edits
}
