//! Hybrid ingredient matching.
//!
//! Decides whether a normalized recipe ingredient is satisfied by a user's
//! normalized ingredient list. Checks are an ordered disjunction that
//! short-circuits on the first hit: exact equality, substring containment in
//! either direction, fuzzy similarity, alias-group membership.

use crate::tables::IngredientTables;

/// Minimum fuzzy similarity for two ingredients to count as a match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// Normalized similarity ratio in `[0, 1]` based on the longest common
/// subsequence: `2 * lcs(a, b) / (len(a) + len(b))`.
///
/// Symmetric by construction: `similarity_ratio(a, b) == similarity_ratio(b, a)`.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    // Two-row LCS table; ingredient tokens are short so O(n*m) is fine.
    let mut prev = vec![0usize; b_chars.len() + 1];
    let mut curr = vec![0usize; b_chars.len() + 1];

    for &ca in &a_chars {
        for (j, &cb) in b_chars.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let lcs = prev[b_chars.len()];
    2.0 * lcs as f64 / (a_chars.len() + b_chars.len()) as f64
}

/// Check whether a normalized recipe ingredient is satisfied by any of the
/// user's normalized ingredients.
///
/// Empty inputs never match.
#[must_use]
pub fn ingredients_match(
    recipe_ingredient: &str,
    user_ingredients: &[String],
    tables: &IngredientTables,
) -> bool {
    if recipe_ingredient.is_empty() || user_ingredients.is_empty() {
        return false;
    }

    // 1. Exact match after normalization
    if user_ingredients.iter().any(|u| u == recipe_ingredient) {
        return true;
    }

    // 2. Substring match (one contains the other)
    if user_ingredients
        .iter()
        .filter(|u| !u.is_empty())
        .any(|u| recipe_ingredient.contains(u.as_str()) || u.contains(recipe_ingredient))
    {
        return true;
    }

    // 3. Fuzzy match for close spellings
    if user_ingredients
        .iter()
        .any(|u| similarity_ratio(recipe_ingredient, u) >= FUZZY_MATCH_THRESHOLD)
    {
        return true;
    }

    // 4. Alias group membership
    tables.share_alias_group(recipe_ingredient, user_ingredients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::IngredientTables;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_match() {
        let tables = IngredientTables::empty();
        assert!(ingredients_match("tomato", &strings(&["tomato"]), &tables));
        assert!(!ingredients_match("tomato", &strings(&["basil"]), &tables));
    }

    #[test]
    fn test_substring_match_both_directions() {
        let tables = IngredientTables::empty();
        assert!(ingredients_match(
            "chicken breast",
            &strings(&["chicken"]),
            &tables
        ));
        assert!(ingredients_match(
            "chicken",
            &strings(&["chicken breast"]),
            &tables
        ));
    }

    #[test]
    fn test_fuzzy_match_at_threshold() {
        let tables = IngredientTables::empty();
        // One-letter typo on an 8-letter word clears 0.8.
        assert!(ingredients_match("zucchini", &strings(&["zuchini"]), &tables));
        assert!(!ingredients_match("tomato", &strings(&["turmeric"]), &tables));
    }

    #[test]
    fn test_alias_group_match() {
        let mut tables = IngredientTables::empty();
        tables.insert_alias_group(
            "scallion",
            strings(&["scallion", "green onion", "spring onion"]),
        );
        assert!(ingredients_match(
            "spring onion",
            &strings(&["green onion"]),
            &tables
        ));
        assert!(!ingredients_match("spring onion", &strings(&["leek"]), &tables));
    }

    #[test]
    fn test_empty_inputs_never_match() {
        let tables = IngredientTables::empty();
        assert!(!ingredients_match("", &strings(&["tomato"]), &tables));
        assert!(!ingredients_match("tomato", &[], &tables));
        assert!(!ingredients_match("", &[], &tables));
    }

    #[test]
    fn test_similarity_ratio_symmetry() {
        for (a, b) in [
            ("tomato", "tomatoe"),
            ("onion", "union"),
            ("chicken", "kitchen"),
            ("", "basil"),
            ("a", "b"),
        ] {
            assert_eq!(similarity_ratio(a, b), similarity_ratio(b, a));
        }
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("tomato", "tomato"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        let r = similarity_ratio("onion", "onions");
        assert!(r > 0.9 && r < 1.0);
    }
}
