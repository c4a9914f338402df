//! Ingredient normalization.
//!
//! Reduces a raw ingredient phrase ("2 cups chopped tomatoes") to a canonical
//! comparable token ("tomato"). Lossy and order-dependent: unit/descriptor
//! stopwords are removed before plural reduction, and conjunction truncation
//! happens after stopword removal so an "and" inside a multi-word ingredient
//! is not confused with a unit phrase.

/// Unit, quantity and descriptor words stripped from ingredient phrases.
const UNIT_WORDS: [&str; 58] = [
    "cup", "cups", "tablespoon", "tablespoons", "tbsp", "tsp", "teaspoon", "teaspoons",
    "pound", "pounds", "lb", "lbs", "ounce", "ounces", "oz", "gram", "grams", "g",
    "kilogram", "kilograms", "kg", "liter", "liters", "l", "milliliter", "milliliters", "ml",
    "pinch", "dash", "handful", "bunch", "clove", "cloves", "slice", "slices",
    "can", "cans", "jar", "jars", "bottle", "bottles", "package", "packages",
    "large", "medium", "small", "extra", "fresh", "dried", "frozen", "canned",
    "chopped", "diced", "sliced", "minced", "grated", "shredded", "crushed",
];

/// Descriptor words that only make sense on cuts of meat.
const CUT_WORDS: [&str; 6] = [
    "boneless", "skinless", "whole", "halved", "quartered", "cubed",
];

const ARTICLES: [&str; 3] = ["a", "an", "the"];
const CONJUNCTIONS: [&str; 4] = ["and", "or", "with", "without"];

/// Normalize a raw ingredient phrase to a canonical comparable token.
///
/// Total over all inputs; malformed or empty input degrades to the empty
/// string. Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let lowered = raw.to_lowercase();

    // Strip digits; the leftover punctuation of fractions and decimals is
    // dropped below together with any token that carries no letters.
    let digitless: String = lowered.chars().filter(|c| !c.is_ascii_digit()).collect();

    let mut words: Vec<&str> = digitless
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .filter(|w| !UNIT_WORDS.contains(w) && !CUT_WORDS.contains(w))
        .collect();

    if words.first().is_some_and(|w| ARTICLES.contains(w)) {
        words.remove(0);
    }

    // Truncate at the first conjunction clause; everything after is discarded.
    // A leading conjunction is left alone, mirroring the mid-phrase rule.
    if let Some(pos) = words
        .iter()
        .skip(1)
        .position(|w| CONJUNCTIONS.contains(w))
    {
        words.truncate(pos + 1);
    }

    let mut normalized = words.join(" ");
    apply_plural_reduction(&mut normalized);
    normalized
}

/// Plural reduction on the phrase tail: "ies" -> "y", "oes" -> strip "es",
/// "ches"/"shes"/"xes"/"zes" unchanged, otherwise strip a trailing "s" on
/// phrases longer than 3 characters.
fn apply_plural_reduction(s: &mut String) {
    if s.ends_with("ies") {
        s.truncate(s.len() - 3);
        s.push('y');
    } else if s.ends_with("ches") || s.ends_with("shes") || s.ends_with("xes") || s.ends_with("zes")
    {
        // leave as-is
    } else if s.ends_with("oes") {
        s.truncate(s.len() - 2);
    } else if s.ends_with('s') && s.chars().count() > 3 {
        s.truncate(s.len() - 1);
    }
}
