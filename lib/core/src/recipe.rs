use serde::{Deserialize, Serialize};

/// A single recipe, immutable after corpus load.
///
/// `id` is the 1-based position assigned at load time and is the only
/// persisted identity key; it stays stable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRecord {
    pub id: u64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Raw, lowercase ingredient tags used for matching; not yet normalized.
    pub ingredient_tags: Vec<String>,
    pub category: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: String,
}

/// The full set of recipes available for search plus the index-aligned
/// searchable texts the embeddings were built from. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct CorpusStore {
    records: Vec<RecipeRecord>,
    texts: Vec<String>,
}

impl CorpusStore {
    #[must_use]
    pub fn new(records: Vec<RecipeRecord>, texts: Vec<String>) -> Self {
        debug_assert_eq!(records.len(), texts.len());
        Self { records, texts }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a recipe by its 1-based id.
    #[inline]
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&RecipeRecord> {
        if id == 0 {
            return None;
        }
        self.records.get(id as usize - 1)
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[RecipeRecord] {
        &self.records
    }

    #[inline]
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

/// Derive a coarse category from the ingredient list.
///
/// Dish-type keywords are checked before protein keywords so that e.g. a
/// chicken soup classifies as Soup, while protein plus greens or starch
/// classifies as Main Course rather than Salad/Side Dish.
#[must_use]
pub fn determine_category(ingredients: &[String]) -> String {
    const PROTEINS: [&str; 6] = ["chicken", "beef", "pork", "fish", "egg", "tofu"];

    if ingredients.is_empty() {
        return "Main Course".to_string();
    }

    let joined = ingredients.join(" ").to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| joined.contains(w));

    if has(&["soup", "broth", "stock", "bouillon"]) {
        "Soup"
    } else if has(&["sauce", "dressing", "marinade", "gravy"]) {
        "Sauce"
    } else if has(&["salad", "lettuce", "arugula", "kale"]) {
        if has(&PROTEINS) {
            "Main Course"
        } else {
            "Salad"
        }
    } else if has(&["bread", "pasta", "rice", "noodle", "quinoa"]) {
        if has(&PROTEINS) {
            "Main Course"
        } else {
            "Side Dish"
        }
    } else {
        "Main Course"
    }
    .to_string()
}

/// Estimate preparation time from recipe complexity.
#[must_use]
pub fn estimate_prep_time(ingredients: &[String], instructions: &[String]) -> String {
    match ingredients.len() + instructions.len() {
        0..=4 => "5 min",
        5..=9 => "15 min",
        _ => "30 min",
    }
    .to_string()
}

/// Estimate cooking time from instruction keywords.
#[must_use]
pub fn estimate_cook_time(instructions: &[String]) -> String {
    if instructions.is_empty() {
        return "15 min".to_string();
    }

    let joined = instructions.join(" ").to_lowercase();
    if ["bake", "roast", "oven"].iter().any(|w| joined.contains(w)) {
        "1+ hours"
    } else if ["simmer", "boil", "cook"].iter().any(|w| joined.contains(w)) {
        "30 min"
    } else {
        "15 min"
    }
    .to_string()
}

/// Estimate recipe difficulty from complexity.
#[must_use]
pub fn estimate_difficulty(ingredients: &[String], instructions: &[String]) -> String {
    match ingredients.len() + instructions.len() {
        0..=4 => "Easy",
        5..=9 => "Medium",
        _ => "Hard",
    }
    .to_string()
}

/// On-demand calorie estimate from a per-ingredient lookup, capped at 2000.
///
/// Returns `None` for a recipe without ingredients. An optional derived
/// attribute, never stored on the record.
#[must_use]
pub fn estimate_calories(recipe: &RecipeRecord) -> Option<u32> {
    const CALORIE_MAP: [(&str, u32); 24] = [
        ("chicken", 165),
        ("beef", 250),
        ("pork", 242),
        ("fish", 206),
        ("salmon", 208),
        ("rice", 130),
        ("pasta", 131),
        ("bread", 265),
        ("potato", 77),
        ("sweet potato", 86),
        ("onion", 40),
        ("garlic", 149),
        ("tomato", 18),
        ("carrot", 41),
        ("broccoli", 34),
        ("cheese", 113),
        ("milk", 42),
        ("egg", 155),
        ("butter", 717),
        ("oil", 884),
        ("sugar", 387),
        ("flour", 364),
        ("chocolate", 546),
        ("nuts", 607),
    ];

    if recipe.ingredients.is_empty() {
        return None;
    }

    let mut total = 0u32;
    for ingredient in &recipe.ingredients {
        let lower = ingredient.to_lowercase();
        if let Some((_, calories)) = CALORIE_MAP.iter().find(|(key, _)| lower.contains(key)) {
            total += calories;
        }
    }

    if total == 0 {
        total = recipe.ingredients.len() as u32 * 50;
    }

    Some(total.min(2000))
}
