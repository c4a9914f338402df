use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};

/// Exact flat index over normalized embedding vectors.
///
/// Every vector is normalized to unit length at build time, so ranking by raw
/// dot product is ranking by cosine similarity. Ids are the 1-based positions
/// of the vectors handed to [`FlatIndex::build`], matching recipe ids assigned
/// at corpus load.
///
/// An exact scan is the right trade-off for corpora of hundreds to a few
/// thousand recipes; it trivially preserves the ordering contract (descending
/// score, ties broken by ascending id).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatIndex {
    vectors: Vec<Vector>,
    dim: usize,
    built: bool,
}

impl FlatIndex {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from embedding vectors, normalizing each to unit length.
    ///
    /// All vectors must share one dimension.
    pub fn build(&mut self, vectors: Vec<Vector>) -> Result<()> {
        let dim = vectors.first().map(Vector::dim).unwrap_or(0);
        for v in &vectors {
            if v.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: v.dim(),
                });
            }
        }

        self.vectors = vectors.into_iter().map(|v| v.normalized()).collect();
        self.dim = dim;
        self.built = true;
        Ok(())
    }

    /// Top-k cosine similarity search.
    ///
    /// Returns `(recipe_id, score)` pairs ordered by descending similarity,
    /// ties broken by ascending id. `k` is clamped to the corpus size.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(u64, f64)>> {
        if !self.built {
            return Err(Error::IndexNotBuilt);
        }
        if query.dim() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let normalized_query = query.normalized();
        let mut scored: Vec<(u64, f64)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| ((i + 1) as u64, f64::from(v.dot(&normalized_query))))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k.min(self.vectors.len()));
        Ok(scored)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_index(vectors: Vec<Vec<f32>>) -> FlatIndex {
        let mut index = FlatIndex::new();
        index
            .build(vectors.into_iter().map(Vector::new).collect())
            .unwrap();
        index
    }

    #[test]
    fn test_search_before_build_fails() {
        let index = FlatIndex::new();
        let err = index.search(&Vector::new(vec![1.0, 0.0]), 5).unwrap_err();
        assert!(matches!(err, Error::IndexNotBuilt));
    }

    #[test]
    fn test_vectors_are_normalized_at_build() {
        let index = build_index(vec![vec![3.0, 4.0], vec![0.0, 2.0]]);
        // A scaled copy of a stored vector must score 1.0 against it.
        let results = index.search(&Vector::new(vec![30.0, 40.0]), 1).unwrap();
        assert_eq!(results[0].0, 1);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_descending_order_and_clamped_k() {
        let index = build_index(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.7, 0.7],
        ]);
        let results = index.search(&Vector::new(vec![1.0, 0.0]), 10).unwrap();
        assert_eq!(results.len(), 3); // clamped to corpus size
        assert!(results[0].1 >= results[1].1 && results[1].1 >= results[2].1);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_ties_broken_by_ascending_id() {
        // Identical vectors tie exactly; ids must come back ascending.
        let index = build_index(vec![
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![1.0, 0.0],
            vec![3.0, 3.0],
        ]);
        let results = index.search(&Vector::new(vec![1.0, 1.0]), 3).unwrap();
        assert_eq!(
            results.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = build_index(vec![vec![1.0, 0.0]]);
        let err = index
            .search(&Vector::new(vec![1.0, 0.0, 0.0]), 1)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDimension {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_search_is_deterministic() {
        let index = build_index(vec![vec![0.9, 0.1], vec![0.8, 0.2], vec![0.1, 0.9]]);
        let query = Vector::new(vec![1.0, 0.3]);
        let first = index.search(&query, 3).unwrap();
        for _ in 0..10 {
            assert_eq!(index.search(&query, 3).unwrap(), first);
        }
    }
}
