//! # forkful
//!
//! A recipe retrieval engine: semantic vector search over a recipe corpus,
//! enriched per hit with corpus-driven ingredient-match scoring.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! forkful --corpus ./recipes.json --query "tomato soup" --ingredients tomato,onion
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use forkful::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let options = EngineOptions::new("./data", "./recipes.json", "./tables");
//! let engine = RecipeEngine::initialize(options, Arc::new(HashingEmbedder::default())).await?;
//!
//! let results = engine
//!     .search("tomato soup", 5, &["tomato".to_string(), "onion".to_string()])
//!     .await?;
//! for result in results {
//!     println!("{}: {}%", result.recipe.name, result.match_result.weighted_percentage);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `forkful-core` - Vectors, the flat index, ingredient normalization,
//!   hybrid matching, criticality analysis and match scoring
//! - `forkful-storage` - Persisted index artifacts with cache validity
//! - `forkful-engine` - Corpus loading, embedding providers and the engine

// Re-export core types
pub use forkful_core::{
    ingredients_match, normalize, score_match, CorpusStore, CriticalityAnalyzer, EnrichedRecipe,
    Error, FlatIndex, ImportanceTier, IngredientTables, MatchResult, RecipeRecord, Result, Vector,
};

// Re-export storage
pub use forkful_storage::{IndexConfig, RecipeArtifacts};

// Re-export the engine
pub use forkful_engine::{
    EmbeddingProvider, EngineOptions, EngineState, HashingEmbedder, RecipeEngine,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CorpusStore, EmbeddingProvider, EngineOptions, EngineState, EnrichedRecipe, Error,
        FlatIndex, HashingEmbedder, ImportanceTier, IngredientTables, MatchResult, RecipeEngine,
        RecipeRecord, Result, Vector,
    };
}
