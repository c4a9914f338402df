//! Match scoring.
//!
//! Combines matcher output with criticality tiers into a calibrated match
//! percentage, missing-ingredient lists grouped by importance, and
//! substitution suggestions. Computed fresh per request, never persisted.

use crate::criticality::{CriticalityAnalyzer, ImportanceTier};
use crate::matcher::ingredients_match;
use crate::normalize::normalize;
use crate::recipe::{CorpusStore, RecipeRecord};
use crate::tables::IngredientTables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// At most this many missing ingredients get substitution suggestions.
const SUBSTITUTION_SUGGESTION_LIMIT: usize = 5;

/// How well a user's ingredients cover one recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub matches: u32,
    pub total: u32,
    pub percentage: f64,
    pub weighted_percentage: f64,
    /// All missing ingredients (raw tags) in tier order, critical first.
    pub missing: Vec<String>,
    pub critical_missing: Vec<String>,
    pub important_missing: Vec<String>,
    pub optional_missing: Vec<String>,
    pub rare_missing: Vec<String>,
    pub substitution_suggestions: BTreeMap<String, Vec<String>>,
    #[serde(rename = "hasAllIngredients")]
    pub has_all_ingredients: bool,
    #[serde(rename = "hasAllCriticalIngredients")]
    pub has_all_critical_ingredients: bool,
}

/// A recipe enriched with its similarity score and match result.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedRecipe {
    #[serde(flatten)]
    pub recipe: RecipeRecord,
    /// Cosine similarity of the recipe embedding to the query embedding.
    pub score: f64,
    #[serde(rename = "match")]
    pub match_result: MatchResult,
}

/// Score one recipe against the user's ingredient list.
///
/// Every recipe tag gets a tier from the analyzer. The weighted percentage is
/// `100 * matched tier weight / total tier weight` with weights 4/3/2/1 for
/// critical/important/optional/rare; the plain percentage is
/// `100 * matches / total`. Both are 0 for a tagless recipe or an empty user
/// list.
#[must_use]
pub fn score_match(
    recipe: &RecipeRecord,
    user_ingredients: &[String],
    tables: &IngredientTables,
    analyzer: &CriticalityAnalyzer,
    corpus: &CorpusStore,
) -> MatchResult {
    let user_normalized: Vec<String> = user_ingredients
        .iter()
        .map(|ing| normalize(ing))
        .filter(|ing| !ing.is_empty())
        .collect();

    let mut matches = 0u32;
    let mut matched_weight = 0u64;
    let mut total_weight = 0u64;

    let mut critical_missing = Vec::new();
    let mut important_missing = Vec::new();
    let mut optional_missing = Vec::new();
    let mut rare_missing = Vec::new();

    for tag in &recipe.ingredient_tags {
        let normalized = normalize(tag);
        let tier = analyzer.tier_for(corpus, &recipe.name, tag);
        total_weight += u64::from(tier.weight());

        if ingredients_match(&normalized, &user_normalized, tables) {
            matches += 1;
            matched_weight += u64::from(tier.weight());
        } else {
            match tier {
                ImportanceTier::Critical => critical_missing.push(tag.clone()),
                ImportanceTier::Important => important_missing.push(tag.clone()),
                ImportanceTier::Optional => optional_missing.push(tag.clone()),
                ImportanceTier::Rare => rare_missing.push(tag.clone()),
            }
        }
    }

    let total = recipe.ingredient_tags.len() as u32;
    let percentage = if total > 0 {
        round1(100.0 * f64::from(matches) / f64::from(total))
    } else {
        0.0
    };
    let weighted_percentage = if total_weight > 0 {
        round1(100.0 * matched_weight as f64 / total_weight as f64)
    } else {
        0.0
    };

    let missing: Vec<String> = critical_missing
        .iter()
        .chain(&important_missing)
        .chain(&optional_missing)
        .chain(&rare_missing)
        .cloned()
        .collect();

    let mut substitution_suggestions = BTreeMap::new();
    for ingredient in missing.iter().take(SUBSTITUTION_SUGGESTION_LIMIT) {
        if let Some(subs) = tables.substitutions_for(&normalize(ingredient)) {
            substitution_suggestions.insert(ingredient.clone(), subs.to_vec());
        }
    }

    MatchResult {
        matches,
        total,
        percentage,
        weighted_percentage,
        has_all_ingredients: total > 0 && matches == total,
        has_all_critical_ingredients: critical_missing.is_empty(),
        missing,
        critical_missing,
        important_missing,
        optional_missing,
        rare_missing,
        substitution_suggestions,
    }
}

#[inline]
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
