//! # forkful Core
//!
//! Core library for the forkful recipe retrieval engine.
//!
//! This crate provides the algorithmic heart of the system:
//!
//! - [`Vector`] - Dense embedding vector with cosine similarity
//! - [`FlatIndex`] - Exact top-k cosine similarity index
//! - [`RecipeRecord`] / [`CorpusStore`] - The searchable recipe corpus
//! - [`normalize`] - Ingredient phrase canonicalization
//! - [`ingredients_match`] - Hybrid exact/substring/fuzzy/alias matching
//! - [`CriticalityAnalyzer`] - Corpus-driven ingredient importance tiers
//! - [`score_match`] - Weighted ingredient-match scoring
//!
//! ## Example
//!
//! ```rust
//! use forkful_core::{FlatIndex, Vector};
//!
//! let mut index = FlatIndex::new();
//! index
//!     .build(vec![
//!         Vector::new(vec![1.0, 0.0, 0.0]),
//!         Vector::new(vec![0.0, 1.0, 0.0]),
//!     ])
//!     .unwrap();
//!
//! let hits = index.search(&Vector::new(vec![1.0, 0.1, 0.0]), 1).unwrap();
//! assert_eq!(hits[0].0, 1);
//! ```

pub mod criticality;
pub mod error;
pub mod index;
pub mod matcher;
pub mod normalize;
pub mod recipe;
pub mod scorer;
pub mod tables;
pub mod vector;

pub use criticality::{
    CriticalityAnalyzer, ImportanceTier, PRELOAD_RECIPE_LIMIT, SIMILAR_RECIPE_LIMIT,
};
pub use error::{Error, Result};
pub use index::FlatIndex;
pub use matcher::{ingredients_match, similarity_ratio, FUZZY_MATCH_THRESHOLD};
pub use normalize::normalize;
pub use recipe::{
    determine_category, estimate_calories, estimate_cook_time, estimate_difficulty,
    estimate_prep_time, CorpusStore, RecipeRecord,
};
pub use scorer::{score_match, EnrichedRecipe, MatchResult};
pub use tables::IngredientTables;
pub use vector::Vector;
