//! Corpus loading.
//!
//! The corpus source is a JSON array of raw recipe rows. Rows are tolerant
//! of missing fields and of ingredient tags stored either as a list or as a
//! comma-joined string; loading assigns stable 1-based ids and derives the
//! presentation attributes (category, times, difficulty) that the source
//! does not carry.

use forkful_core::{
    determine_category, estimate_cook_time, estimate_difficulty, estimate_prep_time, CorpusStore,
    Error, RecipeRecord, Result,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Ingredient tags as they appear in source data: either a proper list or a
/// single comma-joined string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagList {
    List(Vec<String>),
    Joined(String),
}

impl Default for TagList {
    fn default() -> Self {
        TagList::List(Vec::new())
    }
}

impl TagList {
    fn into_tags(self) -> Vec<String> {
        let raw = match self {
            TagList::List(items) => items,
            TagList::Joined(s) => s.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// One raw recipe row from the corpus source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub ingredient_tags: TagList,
}

/// Load and materialize a corpus from a JSON source file.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<CorpusStore> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::CorpusSourceMissing(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let rows: Vec<RecipeRow> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::Serialization(format!("{}: {e}", path.display())))?;

    let corpus = build_corpus(rows);
    info!(recipes = corpus.len(), source = %path.display(), "loaded recipe corpus");
    Ok(corpus)
}

/// Turn raw rows into the immutable corpus: 1-based ids in source order,
/// derived attributes, and one searchable text per recipe.
#[must_use]
pub fn build_corpus(rows: Vec<RecipeRow>) -> CorpusStore {
    let mut records = Vec::with_capacity(rows.len());
    let mut texts = Vec::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let id = i as u64 + 1;
        let name = match row.name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => format!("Recipe {id}"),
        };
        let ingredient_tags = row.ingredient_tags.into_tags();

        let text = format!(
            "{} {} {}",
            name,
            row.ingredients.join(" "),
            row.instructions.join(" ")
        )
        .trim()
        .to_string();

        records.push(RecipeRecord {
            id,
            name,
            category: determine_category(&row.ingredients),
            prep_time: estimate_prep_time(&row.ingredients, &row.instructions),
            cook_time: estimate_cook_time(&row.instructions),
            difficulty: estimate_difficulty(&row.ingredients, &row.instructions),
            ingredients: row.ingredients,
            instructions: row.instructions,
            ingredient_tags,
        });
        texts.push(text);
    }

    CorpusStore::new(records, texts)
}
