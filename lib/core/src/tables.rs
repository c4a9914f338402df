//! Static ingredient lookup tables.
//!
//! Alias groups, per-category critical-ingredient lists and substitution
//! suggestions, each loaded from a JSON file at startup and reloadable on
//! demand. A missing or malformed file degrades to an empty table with a
//! warning; the engine keeps serving without it.

use ahash::AHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::warn;

pub const ALIASES_FILE: &str = "ingredient_aliases.json";
pub const CRITICAL_FILE: &str = "critical_ingredients.json";
pub const SUBSTITUTIONS_FILE: &str = "ingredient_substitutions.json";

/// Proteins treated as critical in any main dish, regardless of the
/// per-category table.
const PRIMARY_PROTEINS: [&str; 9] = [
    "chicken", "beef", "pork", "fish", "salmon", "tuna", "tofu", "lamb", "turkey",
];

#[derive(Debug, Deserialize)]
struct RawTable(AHashMap<String, Vec<String>>);

/// The three static lookup tables consumed by the matcher and scorer.
#[derive(Debug, Clone, Default)]
pub struct IngredientTables {
    /// canonical name -> alias group (transitive equivalence set)
    aliases: AHashMap<String, Vec<String>>,
    /// category (lowercase) -> critical ingredient names
    critical: AHashMap<String, Vec<String>>,
    /// ingredient key -> substitution suggestions, sorted longest key first
    /// (secondary: lexicographic) so containment lookups are deterministic
    substitutions: Vec<(String, Vec<String>)>,
}

impl IngredientTables {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all three tables from `dir`. Missing files yield empty tables.
    #[must_use]
    pub fn load_from_dir(dir: &Path) -> Self {
        let aliases = load_table(&dir.join(ALIASES_FILE));
        let critical = load_table(&dir.join(CRITICAL_FILE))
            .into_iter()
            .map(|(category, list)| (category.to_lowercase(), list))
            .collect();
        let mut substitutions: Vec<(String, Vec<String>)> =
            load_table(&dir.join(SUBSTITUTIONS_FILE)).into_iter().collect();
        substitutions.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            aliases,
            critical,
            substitutions,
        }
    }

    /// True when the recipe ingredient and any user ingredient belong to the
    /// same alias group.
    ///
    /// Membership is decided by the alias list alone; the canonical map key
    /// only names the group and must be repeated in its own list to match.
    #[must_use]
    pub fn share_alias_group(&self, recipe_ingredient: &str, user_ingredients: &[String]) -> bool {
        for group in self.aliases.values() {
            let in_group = |name: &str| group.iter().any(|alias| alias == name);
            if in_group(recipe_ingredient) && user_ingredients.iter().any(|user| in_group(user)) {
                return true;
            }
        }
        false
    }

    /// Substitution suggestions for a normalized ingredient.
    ///
    /// Keys match by containment: first the longest key contained in the
    /// ingredient, then the longest key containing it.
    #[must_use]
    pub fn substitutions_for(&self, normalized: &str) -> Option<&[String]> {
        if normalized.is_empty() {
            return None;
        }
        self.substitutions
            .iter()
            .find(|(key, _)| normalized.contains(key.as_str()))
            .or_else(|| {
                self.substitutions
                    .iter()
                    .find(|(key, _)| key.contains(normalized))
            })
            .map(|(_, subs)| subs.as_slice())
    }

    /// True when a normalized ingredient is on the critical list for a recipe
    /// category, or is a primary protein.
    #[must_use]
    pub fn is_critical_for_category(&self, normalized: &str, category: &str) -> bool {
        if normalized.is_empty() {
            return false;
        }

        if let Some(list) = self.critical.get(&category.to_lowercase()) {
            if list
                .iter()
                .any(|c| c.contains(normalized) || normalized.contains(c.as_str()))
            {
                return true;
            }
        }

        PRIMARY_PROTEINS.iter().any(|p| normalized.contains(p))
    }

    #[must_use]
    pub fn alias_group_count(&self) -> usize {
        self.aliases.len()
    }

    #[must_use]
    pub fn critical_category_count(&self) -> usize {
        self.critical.len()
    }

    #[must_use]
    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    /// Test and host hook for assembling tables in memory.
    pub fn insert_alias_group(&mut self, canonical: &str, group: Vec<String>) {
        self.aliases.insert(canonical.to_string(), group);
    }

    pub fn insert_substitution(&mut self, key: &str, subs: Vec<String>) {
        self.substitutions.push((key.to_string(), subs));
        self.substitutions
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    }

    pub fn insert_critical(&mut self, category: &str, list: Vec<String>) {
        self.critical.insert(category.to_lowercase(), list);
    }
}

fn load_table(path: &Path) -> AHashMap<String, Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            warn!(path = %path.display(), "ingredient table not found, using empty table");
            return AHashMap::new();
        }
    };

    match serde_json::from_reader::<_, RawTable>(BufReader::new(file)) {
        Ok(RawTable(map)) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse ingredient table, using empty table");
            AHashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_files_give_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = IngredientTables::load_from_dir(dir.path());
        assert_eq!(tables.alias_group_count(), 0);
        assert_eq!(tables.critical_category_count(), 0);
        assert_eq!(tables.substitution_count(), 0);
    }

    #[test]
    fn test_load_and_reload_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join(ALIASES_FILE)).unwrap();
        write!(f, r#"{{"scallion": ["scallion", "green onion"]}}"#).unwrap();
        let mut f = File::create(dir.path().join(SUBSTITUTIONS_FILE)).unwrap();
        write!(f, r#"{{"butter": ["margarine", "coconut oil"]}}"#).unwrap();

        let tables = IngredientTables::load_from_dir(dir.path());
        assert_eq!(tables.alias_group_count(), 1);
        assert!(tables.share_alias_group("green onion", &strings(&["scallion"])));
        assert_eq!(
            tables.substitutions_for("butter").unwrap(),
            &["margarine".to_string(), "coconut oil".to_string()]
        );
    }

    #[test]
    fn test_alias_group_key_is_not_a_member() {
        let mut tables = IngredientTables::empty();
        // The key names the group; only the listed aliases are members.
        tables.insert_alias_group("allium", strings(&["onion", "shallot"]));

        assert!(tables.share_alias_group("onion", &strings(&["shallot"])));
        assert!(!tables.share_alias_group("allium", &strings(&["onion"])));
        assert!(!tables.share_alias_group("onion", &strings(&["allium"])));
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = File::create(dir.path().join(ALIASES_FILE)).unwrap();
        write!(f, "not json at all").unwrap();

        let tables = IngredientTables::load_from_dir(dir.path());
        assert_eq!(tables.alias_group_count(), 0);
    }

    #[test]
    fn test_substitution_longest_key_wins() {
        let mut tables = IngredientTables::empty();
        tables.insert_substitution("cream", strings(&["milk"]));
        tables.insert_substitution("sour cream", strings(&["greek yogurt"]));

        // "sour cream" matches both keys; the longer one is preferred.
        assert_eq!(
            tables.substitutions_for("sour cream").unwrap(),
            &["greek yogurt".to_string()]
        );
        assert_eq!(tables.substitutions_for("cream").unwrap(), &["milk".to_string()]);
        assert!(tables.substitutions_for("saffron").is_none());
        assert!(tables.substitutions_for("").is_none());
    }

    #[test]
    fn test_category_critical_and_proteins() {
        let mut tables = IngredientTables::empty();
        tables.insert_critical("Soup", strings(&["broth", "stock"]));

        assert!(tables.is_critical_for_category("broth", "soup"));
        assert!(tables.is_critical_for_category("chicken broth", "Soup"));
        assert!(!tables.is_critical_for_category("parsley", "soup"));
        // primary proteins are critical in any category
        assert!(tables.is_critical_for_category("chicken breast", "Main Course"));
        assert!(!tables.is_critical_for_category("", "soup"));
    }
}
