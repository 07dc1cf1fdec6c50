//! Parameter-name normalization and fuzzy matching, used by the
//! parameter-flow analyzer to recognize producer/consumer pairs whose
//! names differ only by casing, separators, or a small set of known
//! synonyms.

use lazy_static::lazy_static;

lazy_static! {
    /// Canonical-variant table: names inside the same group are treated
    /// as referring to the same value regardless of spelling.
    static ref VARIANT_GROUPS: Vec<Vec<&'static str>> = vec![
        vec!["id", "ID", "Id", "_id", "identifier"],
        vec!["user_id", "userId", "user_ID", "userID", "uid"],
        vec!["pet_id", "petId", "pet_ID", "petID"],
        vec!["order_id", "orderId", "order_ID", "orderID"],
        vec!["username", "user_name", "userName", "login", "user"],
    ];
}

/// Lower-cases and strips `_`/`-`, the canonical form used to compare two
/// parameter names regardless of casing or separator convention.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Length of the longest common subsequence of two strings.
fn lcs_len(a: &[u8], b: &[u8]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut prev_diag = 0usize;
        for (j, &cb) in b.iter().enumerate() {
            let prev_row_j1 = row[j + 1];
            row[j + 1] = if ca == cb {
                prev_diag + 1
            } else {
                row[j + 1].max(row[j])
            };
            prev_diag = prev_row_j1;
        }
    }
    row[b.len()]
}

/// Similarity ratio in `[0, 1]`: twice the LCS length over the sum of
/// both lengths (mirrors `difflib.SequenceMatcher`'s ratio closely enough
/// for the `>= 0.8` threshold this crate uses it for).
pub fn lcs_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    let matched = lcs_len(a_bytes, b_bytes);
    (2.0 * matched as f64) / (a_bytes.len() + b_bytes.len()) as f64
}

/// Two parameter names are variants of the same canonical identifier if
/// their canonical forms match exactly, both appear in the same
/// canonical-variant group, or their LCS similarity is `>= 0.8`.
pub fn are_variants(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let canon_a = canonicalize(a);
    let canon_b = canonicalize(b);
    if canon_a == canon_b {
        return true;
    }
    let in_same_group = VARIANT_GROUPS.iter().any(|group| {
        let canon_group: Vec<String> = group.iter().map(|v| canonicalize(v)).collect();
        canon_group.contains(&canon_a) && canon_group.contains(&canon_b)
    });
    if in_same_group {
        return true;
    }
    // Short-circuit on gross length mismatch before paying for the LCS pass.
    let (shorter, longer) = if canon_a.len() <= canon_b.len() {
        (canon_a.len(), canon_b.len())
    } else {
        (canon_b.len(), canon_a.len())
    };
    if longer > 0 && (shorter as f64 / longer as f64) < 0.5 {
        return false;
    }
    lcs_similarity(&canon_a, &canon_b) >= 0.8
}

/// Porter-stems a word and lower-cases the result.
pub fn stem(word: &str) -> String {
    porter_stemmer::stem(word).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_variants_match() {
        assert!(are_variants("user_id", "userId"));
        assert!(are_variants("_id", "identifier"));
        assert!(are_variants("username", "login"));
    }

    #[test]
    fn case_and_separator_insensitive() {
        assert!(are_variants("PetId", "pet_id"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(!are_variants("status", "total"));
    }

    #[test]
    fn lcs_similarity_is_symmetric() {
        assert_eq!(lcs_similarity("kitten", "sitting"), lcs_similarity("sitting", "kitten"));
    }
}
