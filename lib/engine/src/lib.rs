//! # forkful Engine
//!
//! Orchestration layer for the forkful recipe retrieval engine: corpus
//! loading, the embedding provider boundary, index lifecycle (cached restore
//! or rebuild-and-persist) and the search-plus-enrichment pipeline.
//!
//! The algorithms live in `forkful-core`; persistence lives in
//! `forkful-storage`. This crate wires them together behind [`RecipeEngine`].

pub mod corpus;
pub mod embedder;
pub mod engine;

pub use corpus::{build_corpus, load_corpus, RecipeRow, TagList};
pub use embedder::{
    embed_texts, EmbeddingProvider, HashingEmbedder, DEFAULT_EMBEDDING_DIM, EMBED_BATCH_SIZE,
};
pub use engine::{EngineOptions, EngineState, RecipeEngine};
