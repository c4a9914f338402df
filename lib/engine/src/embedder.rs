//! Embedding provider boundary.
//!
//! The engine treats text embedding as a black box behind
//! [`EmbeddingProvider`]; the host supplies a real model. The built-in
//! [`HashingEmbedder`] hashes word and character-trigram features into a
//! fixed-dimension bag vector, which keeps the engine self-contained and
//! makes tests deterministic.

use forkful_core::{Error, Result, Vector};

/// Texts are embedded in batches of this size to bound memory and per-call
/// provider overhead.
pub const EMBED_BATCH_SIZE: usize = 32;

/// Default dimension for the hashing embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 256;

/// Maps text to fixed-dimension vectors. One model, one dimension, for the
/// whole process.
pub trait EmbeddingProvider: Send + Sync {
    /// Model identity, persisted in the index config descriptor so a cached
    /// build from another model is never reused.
    fn model_name(&self) -> &str;

    fn dim(&self) -> usize;

    /// Embed one batch of texts, one vector per text in order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>>;
}

/// Embed an arbitrary number of texts through a provider, batched.
///
/// A failed batch aborts the whole run; partial output is never returned, so
/// a provider failure cannot leave a half-embedded corpus behind.
pub fn embed_texts(provider: &dyn EmbeddingProvider, texts: &[String]) -> Result<Vec<Vector>> {
    let mut vectors = Vec::with_capacity(texts.len());
    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        let embedded = provider.embed_batch(batch)?;
        if embedded.len() != batch.len() {
            return Err(Error::EmbeddingProvider(format!(
                "provider returned {} vectors for a batch of {}",
                embedded.len(),
                batch.len()
            )));
        }
        for v in &embedded {
            if v.dim() != provider.dim() {
                return Err(Error::InvalidDimension {
                    expected: provider.dim(),
                    actual: v.dim(),
                });
            }
        }
        vectors.extend(embedded);
    }
    Ok(vectors)
}

/// Deterministic hash-based embedder.
///
/// Words and character trigrams are hashed to vector positions; words
/// contribute more than trigrams. The result is L2-normalized. Simple but
/// effective for lexical similarity; swap in an ML provider for semantics.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        debug_assert!(dim > 0);
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vector {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut components = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        let bucket = |token: &str| {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            (hasher.finish() as usize) % self.dim
        };

        for word in normalized.split_whitespace() {
            components[bucket(word)] += 2.0; // words contribute more

            let chars: Vec<char> = word.chars().collect();
            for trigram in chars.windows(3) {
                let trigram: String = trigram.iter().collect();
                components[bucket(&trigram)] += 1.0;
            }
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing-trigram-v1"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
