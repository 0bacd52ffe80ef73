//! Fuzzy competition-name similarity
//!
//! Invoice documents rarely spell a competition exactly the way the Eventor
//! export does ("Hallands 3-dagars, etapp 2" vs "Hallands 3-dagars etapp 2"),
//! so names are compared as token sets with the Jaccard index.

use std::collections::BTreeSet;

/// Normalize a competition name into a set of lowercase tokens.
///
/// Any run of non-alphanumeric characters acts as a separator. Unicode
/// alphanumerics are kept, which preserves Swedish å/ä/ö.
pub fn name_tokens(name: &str) -> BTreeSet<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Jaccard index of two token sets: |intersection| / |union|.
///
/// Zero when either set is empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Similarity score between two raw competition names
pub fn name_similarity(a: &str, b: &str) -> f64 {
    jaccard(&name_tokens(a), &name_tokens(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_with_swedish_letters() {
        let tokens = name_tokens("Hallands 3-dagars, etapp 2 (lång)");
        assert!(tokens.contains("hallands"));
        assert!(tokens.contains("3"));
        assert!(tokens.contains("dagars"));
        assert!(tokens.contains("etapp"));
        assert!(tokens.contains("lång"));
    }

    #[test]
    fn identical_names_score_one() {
        assert_eq!(name_similarity("SM Medel 2024", "SM Medel 2024"), 1.0);
    }

    #[test]
    fn punctuation_and_case_do_not_matter() {
        assert_eq!(
            name_similarity("Hallands 3-dagars etapp 2", "hallands 3 dagars, Etapp 2"),
            1.0
        );
    }

    #[test]
    fn disjoint_names_score_zero() {
        assert_eq!(name_similarity("Vårserien deltävling", "SM Medel"), 0.0);
    }

    #[test]
    fn empty_name_scores_zero() {
        assert_eq!(name_similarity("", "SM Medel"), 0.0);
        assert_eq!(name_similarity("SM Medel", "  ,, "), 0.0);
    }

    #[test]
    fn partial_overlap_scores_between() {
        // {sm, medel, 2024} vs {sm, medel}: 2 shared of 3 total
        let score = name_similarity("SM Medel 2024", "SM Medel");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }
}
