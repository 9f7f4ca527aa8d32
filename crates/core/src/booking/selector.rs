//! Candidate ranking.

use super::types::{Blocklist, Candidate};

/// Rank candidates for the next pass.
///
/// Removes blocklisted keywords, then — if the affinity hint still names a
/// surviving candidate — moves that candidate to the front. All other
/// relative ordering is preserved. Pure; no side effects.
pub fn rank_candidates(
    candidates: &[Candidate],
    blocklist: &Blocklist,
    affinity_hint: Option<&str>,
) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| !blocklist.contains(&candidate.keyword))
        .cloned()
        .collect();

    if let Some(hint) = affinity_hint {
        let hint = hint.trim().to_lowercase();
        if let Some(position) = ranked
            .iter()
            .position(|candidate| candidate.keyword.to_lowercase() == hint)
        {
            let hinted = ranked.remove(position);
            ranked.insert(0, hinted);
        }
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(keywords: &[&str]) -> Vec<Candidate> {
        keywords
            .iter()
            .enumerate()
            .map(|(rank, keyword)| Candidate::new(*keyword, rank as u32))
            .collect()
    }

    #[test]
    fn test_no_blocklist_no_hint_preserves_order() {
        let input = candidates(&["Gold", "Silver", "Bronze"]);
        let ranked = rank_candidates(&input, &Blocklist::new(), None);
        assert_eq!(ranked, input);
    }

    #[test]
    fn test_blocklisted_keywords_removed() {
        let input = candidates(&["Gold", "Silver", "Bronze"]);
        let mut blocklist = Blocklist::new();
        blocklist.insert("Silver");

        let ranked = rank_candidates(&input, &blocklist, None);
        let keywords: Vec<&str> = ranked.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Gold", "Bronze"]);
    }

    #[test]
    fn test_hint_moved_to_front_rest_preserved() {
        let input = candidates(&["Gold", "Silver", "Bronze"]);
        let ranked = rank_candidates(&input, &Blocklist::new(), Some("Bronze"));
        let keywords: Vec<&str> = ranked.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Bronze", "Gold", "Silver"]);
    }

    #[test]
    fn test_hint_match_is_case_insensitive() {
        let input = candidates(&["Gold", "Silver"]);
        let ranked = rank_candidates(&input, &Blocklist::new(), Some("silver"));
        assert_eq!(ranked[0].keyword, "Silver");
    }

    #[test]
    fn test_blocklisted_hint_is_ignored() {
        let input = candidates(&["Gold", "Silver"]);
        let mut blocklist = Blocklist::new();
        blocklist.insert("Silver");

        let ranked = rank_candidates(&input, &blocklist, Some("Silver"));
        let keywords: Vec<&str> = ranked.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["Gold"]);
    }

    #[test]
    fn test_unknown_hint_is_ignored() {
        let input = candidates(&["Gold", "Silver"]);
        let ranked = rank_candidates(&input, &Blocklist::new(), Some("Platinum"));
        assert_eq!(ranked, input);
    }

    #[test]
    fn test_result_is_permutation_of_survivors() {
        let input = candidates(&["A", "B", "C", "D", "E"]);
        let mut blocklist = Blocklist::new();
        blocklist.insert("B");
        blocklist.insert("E");

        let ranked = rank_candidates(&input, &blocklist, Some("D"));
        let mut keywords: Vec<&str> = ranked.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["D", "A", "C"]);
        keywords.sort();
        assert_eq!(keywords, vec!["A", "C", "D"]);
    }

    #[test]
    fn test_all_blocklisted_returns_empty() {
        let input = candidates(&["Gold"]);
        let mut blocklist = Blocklist::new();
        blocklist.insert("gold");
        assert!(rank_candidates(&input, &blocklist, None).is_empty());
    }
}
