//! Corpus-driven ingredient criticality.
//!
//! For a recipe name, finds other corpus recipes with similar names, tallies
//! how often each normalized ingredient occurs across that dish family, and
//! buckets ingredients into importance tiers by frequency. Tier lookups are
//! cached per `(recipe name, normalized ingredient)` pair for the process
//! lifetime; a corpus or table reload invalidates the whole cache.

use crate::normalize::normalize;
use crate::recipe::{CorpusStore, RecipeRecord};
use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How many similar recipes to consider per dish family.
pub const SIMILAR_RECIPE_LIMIT: usize = 20;

/// How many distinct recipe names to pre-analyze at startup.
pub const PRELOAD_RECIPE_LIMIT: usize = 100;

/// Minimum name-word overlap for a recipe to count as similar.
const NAME_OVERLAP_THRESHOLD: f64 = 0.3;

/// Frequency thresholds for tier bucketing. Heuristic defaults, not law.
const CRITICAL_FREQUENCY: f64 = 0.8;
const IMPORTANT_FREQUENCY: f64 = 0.5;
const OPTIONAL_FREQUENCY: f64 = 0.2;

/// Importance of an ingredient within a dish family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceTier {
    Critical,
    Important,
    Optional,
    Rare,
}

impl ImportanceTier {
    /// Scoring weight for the weighted match percentage.
    #[inline]
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::Important => 3,
            Self::Optional => 2,
            Self::Rare => 1,
        }
    }
}

/// Learns which ingredients a dish family cannot do without.
#[derive(Debug, Default)]
pub struct CriticalityAnalyzer {
    cache: RwLock<AHashMap<(String, String), ImportanceTier>>,
}

impl CriticalityAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find corpus recipes whose names overlap with `name`.
    ///
    /// Overlap is `|common words| / max(|A|, |B|)` over lowercase word sets;
    /// recipes above the 0.3 threshold are returned by descending overlap,
    /// ties keeping corpus order.
    #[must_use]
    pub fn find_similar_recipes<'a>(
        &self,
        corpus: &'a CorpusStore,
        name: &str,
        limit: usize,
    ) -> Vec<&'a RecipeRecord> {
        let name_words: AHashSet<String> = name
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if name_words.is_empty() {
            return Vec::new();
        }

        let mut similar: Vec<(&RecipeRecord, f64)> = Vec::new();
        for recipe in corpus.records() {
            let other_words: AHashSet<String> = recipe
                .name
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect();
            let common = name_words.intersection(&other_words).count();
            if common == 0 {
                continue;
            }

            let overlap = common as f64 / name_words.len().max(other_words.len()) as f64;
            if overlap > NAME_OVERLAP_THRESHOLD {
                similar.push((recipe, overlap));
            }
        }

        // Stable sort keeps corpus order among equal overlaps.
        similar.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        similar.truncate(limit);
        similar.into_iter().map(|(recipe, _)| recipe).collect()
    }

    /// Bucket every normalized ingredient tag seen across `similar` into a
    /// tier by how many of the recipes contain it.
    ///
    /// An empty similar set yields an empty map; callers fall back to
    /// [`ImportanceTier::Optional`] for every ingredient.
    #[must_use]
    pub fn analyze(similar: &[&RecipeRecord]) -> AHashMap<String, ImportanceTier> {
        if similar.is_empty() {
            return AHashMap::new();
        }

        let mut counts: AHashMap<String, usize> = AHashMap::new();
        for recipe in similar {
            let normalized_tags: AHashSet<String> = recipe
                .ingredient_tags
                .iter()
                .map(|tag| normalize(tag))
                .filter(|tag| !tag.is_empty())
                .collect();
            for tag in normalized_tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        let total = similar.len() as f64;
        counts
            .into_iter()
            .map(|(tag, count)| {
                let frequency = count as f64 / total;
                let tier = if frequency >= CRITICAL_FREQUENCY {
                    ImportanceTier::Critical
                } else if frequency >= IMPORTANT_FREQUENCY {
                    ImportanceTier::Important
                } else if frequency >= OPTIONAL_FREQUENCY {
                    ImportanceTier::Optional
                } else {
                    ImportanceTier::Rare
                };
                (tag, tier)
            })
            .collect()
    }

    /// Tier for one ingredient of one recipe, cached.
    ///
    /// Concurrent callers may race to compute the same missing entry; the
    /// computation is pure, so last-writer-wins is identical either way.
    #[must_use]
    pub fn tier_for(&self, corpus: &CorpusStore, recipe_name: &str, ingredient: &str) -> ImportanceTier {
        let normalized = normalize(ingredient);
        let key = (recipe_name.to_string(), normalized.clone());

        if let Some(tier) = self.cache.read().get(&key) {
            return *tier;
        }

        let similar = self.find_similar_recipes(corpus, recipe_name, SIMILAR_RECIPE_LIMIT);
        let tier = if similar.is_empty() {
            ImportanceTier::Optional
        } else {
            Self::analyze(&similar)
                .get(&normalized)
                .copied()
                .unwrap_or(ImportanceTier::Optional)
        };

        self.cache.write().insert(key, tier);
        tier
    }

    /// Eagerly analyze up to `limit_recipes` distinct recipe names, caching
    /// every tag tier. Produces identical results to on-demand lookups; this
    /// only trades startup time for first-query latency.
    pub fn preload(&self, corpus: &CorpusStore, limit_recipes: usize) {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut analyzed = 0usize;

        for recipe in corpus.records() {
            if analyzed >= limit_recipes {
                break;
            }
            if recipe.name.is_empty() || !seen.insert(recipe.name.as_str()) {
                continue;
            }
            analyzed += 1;

            let similar = self.find_similar_recipes(corpus, &recipe.name, SIMILAR_RECIPE_LIMIT);
            if similar.is_empty() {
                continue;
            }
            let tiers = Self::analyze(&similar);
            let mut cache = self.cache.write();
            for (tag, tier) in tiers {
                cache.insert((recipe.name.clone(), tag), tier);
            }
        }

        info!(
            recipes = analyzed,
            cached_pairs = self.cached_pairs(),
            "criticality analysis preloaded"
        );
    }

    /// Drop every cached tier. Required after a corpus or table reload.
    pub fn invalidate(&self) {
        let mut cache = self.cache.write();
        debug!(dropped = cache.len(), "criticality cache invalidated");
        cache.clear();
    }

    #[must_use]
    pub fn cached_pairs(&self) -> usize {
        self.cache.read().len()
    }
}
