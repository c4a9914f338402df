//! Persistence layer for the forkful recipe engine.
//!
//! One artifact generation at a time: serialized flat index, recipe
//! metadata, searchable texts, and a config descriptor that gates cache
//! reuse.

pub mod artifacts;

pub use artifacts::{
    IndexConfig, LoadedArtifacts, RecipeArtifacts, CONFIG_FILE, INDEX_FILE, METADATA_FILE,
    TEXTS_FILE,
};
