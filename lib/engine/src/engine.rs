//! The retrieval engine.
//!
//! Owns the corpus, the flat index, the ingredient tables and the
//! criticality cache. Startup either restores a cached index generation or
//! rebuilds from the corpus source; after that the engine is read-only
//! except for table reloads.

use crate::corpus::load_corpus;
use crate::embedder::{embed_texts, EmbeddingProvider};
use forkful_core::{
    estimate_calories, normalize, score_match, CorpusStore, CriticalityAnalyzer, EnrichedRecipe,
    Error, FlatIndex, IngredientTables, RecipeRecord, Result, PRELOAD_RECIPE_LIMIT,
};
use forkful_storage::RecipeArtifacts;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Candidate pool multiplier: the index is asked for `limit * 4` hits so the
/// enrichment stage has headroom for future filtering without re-querying.
const CANDIDATE_MULTIPLIER: usize = 4;

/// Where the engine reads and writes its data.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Directory for persisted index artifacts.
    pub data_dir: PathBuf,
    /// JSON corpus source, only read on a rebuild.
    pub corpus_path: PathBuf,
    /// Directory holding the ingredient tables.
    pub tables_dir: PathBuf,
    /// How many distinct recipe names to pre-analyze at startup.
    pub preload_limit: usize,
}

impl EngineOptions {
    #[must_use]
    pub fn new<P: Into<PathBuf>>(data_dir: P, corpus_path: P, tables_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            corpus_path: corpus_path.into(),
            tables_dir: tables_dir.into(),
            preload_limit: PRELOAD_RECIPE_LIMIT,
        }
    }
}

/// Engine lifecycle. Initialization walks `ColdStart` through `Loading`
/// (valid cache) or `Rebuilding` (no cache, corrupt cache, provider
/// mismatch); an engine handle is only returned in `Ready`, the only state
/// in which queries run. [`RecipeEngine::initialize_with_state`] publishes
/// the transitions through a shared handle so a host task can report
/// progress while a slow rebuild runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    ColdStart,
    Loading,
    Rebuilding,
    Ready,
}

/// Recipe retrieval and ingredient-match scoring engine.
pub struct RecipeEngine {
    corpus: CorpusStore,
    index: FlatIndex,
    tables: RwLock<IngredientTables>,
    criticality: CriticalityAnalyzer,
    embedder: Arc<dyn EmbeddingProvider>,
    tables_dir: PathBuf,
    state: Arc<RwLock<EngineState>>,
}

impl std::fmt::Debug for RecipeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeEngine").finish_non_exhaustive()
    }
}

impl RecipeEngine {
    /// Bring the engine up: restore the cached index generation when it is
    /// valid and matches the provider, otherwise rebuild from the corpus
    /// source and persist a fresh generation. Either path ends with the
    /// criticality preload.
    pub async fn initialize(
        options: EngineOptions,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let state = Arc::new(RwLock::new(EngineState::ColdStart));
        Self::initialize_with_state(options, embedder, state).await
    }

    /// Like [`RecipeEngine::initialize`], but publishes every lifecycle
    /// transition through `state`, so a host task holding the handle can
    /// report progress while a slow load or rebuild runs. On a fatal rebuild
    /// failure the handle is left in [`EngineState::Rebuilding`].
    pub async fn initialize_with_state(
        options: EngineOptions,
        embedder: Arc<dyn EmbeddingProvider>,
        state: Arc<RwLock<EngineState>>,
    ) -> Result<Self> {
        let artifacts = RecipeArtifacts::new(&options.data_dir)?;
        let tables = IngredientTables::load_from_dir(&options.tables_dir);

        let cached = if artifacts.is_cache_valid() {
            *state.write() = EngineState::Loading;
            match artifacts.load() {
                Ok(loaded) => {
                    let model_ok = loaded.config.model_name == embedder.model_name();
                    let dim_ok =
                        loaded.index.is_empty() || loaded.index.dim() == embedder.dim();
                    if model_ok && dim_ok {
                        Some(loaded)
                    } else {
                        info!(
                            cached_model = %loaded.config.model_name,
                            cached_dim = loaded.config.embedding_dim,
                            model = embedder.model_name(),
                            dim = embedder.dim(),
                            "cached index was built by a different provider, rebuilding"
                        );
                        None
                    }
                }
                Err(e) => {
                    warn!(error = %e, "cached index unreadable, rebuilding");
                    None
                }
            }
        } else {
            None
        };

        let (corpus, index) = match cached {
            Some(loaded) => {
                info!(recipes = loaded.records.len(), "restored cached index");
                (
                    CorpusStore::new(loaded.records, loaded.texts),
                    loaded.index,
                )
            }
            None => {
                *state.write() = EngineState::Rebuilding;
                Self::rebuild(&options, &artifacts, &embedder).await?
            }
        };

        let engine = Self {
            corpus,
            index,
            tables: RwLock::new(tables),
            criticality: CriticalityAnalyzer::new(),
            embedder,
            tables_dir: options.tables_dir,
            state,
        };

        engine
            .criticality
            .preload(&engine.corpus, options.preload_limit);
        *engine.state.write() = EngineState::Ready;
        info!(recipes = engine.corpus.len(), "recipe engine ready");
        Ok(engine)
    }

    async fn rebuild(
        options: &EngineOptions,
        artifacts: &RecipeArtifacts,
        embedder: &Arc<dyn EmbeddingProvider>,
    ) -> Result<(CorpusStore, FlatIndex)> {
        let corpus = load_corpus(&options.corpus_path)?;
        info!(recipes = corpus.len(), "rebuilding index from corpus source");

        let texts = corpus.texts().to_vec();
        let provider = Arc::clone(embedder);
        let vectors = tokio::task::spawn_blocking(move || embed_texts(provider.as_ref(), &texts))
            .await
            .map_err(|e| Error::EmbeddingProvider(format!("embedding task failed: {e}")))??;

        let mut index = FlatIndex::new();
        index.build(vectors)?;
        artifacts.save(
            corpus.records(),
            corpus.texts(),
            &index,
            embedder.model_name(),
        )?;
        Ok((corpus, index))
    }

    /// Semantic search plus per-recipe ingredient-match enrichment.
    ///
    /// Returns at most `limit` recipes by descending embedding similarity,
    /// each carrying its match result against `user_ingredients`. The query
    /// embedding runs on the blocking pool so a slow provider never stalls
    /// the async workers.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        user_ingredients: &[String],
    ) -> Result<Vec<EnrichedRecipe>> {
        if limit == 0 || self.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let provider = Arc::clone(&self.embedder);
        let text = query.to_string();
        let embedded = tokio::task::spawn_blocking(move || provider.embed_batch(&[text]))
            .await
            .map_err(|e| Error::EmbeddingProvider(format!("embedding task failed: {e}")))??;
        let query_vector = embedded
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmbeddingProvider("provider returned no vector".to_string()))?;

        let k = (limit * CANDIDATE_MULTIPLIER).min(self.corpus.len());
        let hits = self.index.search(&query_vector, k)?;
        debug!(query, candidates = hits.len(), "index search complete");

        let tables = self.tables.read();
        let mut results = Vec::with_capacity(limit.min(hits.len()));
        for (id, score) in hits.into_iter().take(limit) {
            // Ids come from the index build, so the lookup cannot miss.
            let Some(recipe) = self.corpus.get(id) else {
                continue;
            };
            let match_result =
                score_match(recipe, user_ingredients, &tables, &self.criticality, &self.corpus);
            results.push(EnrichedRecipe {
                recipe: recipe.clone(),
                score,
                match_result,
            });
        }
        Ok(results)
    }

    /// Recipe by 1-based id, as a defensive copy.
    #[must_use]
    pub fn get_by_id(&self, id: u64) -> Option<RecipeRecord> {
        self.corpus.get(id).cloned()
    }

    #[must_use]
    pub fn get_all(&self) -> Vec<RecipeRecord> {
        self.corpus.records().to_vec()
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.corpus.len()
    }

    /// On-demand calorie estimate for one recipe.
    #[must_use]
    pub fn calories_for(&self, id: u64) -> Option<u32> {
        self.corpus.get(id).and_then(estimate_calories)
    }

    /// Re-read the ingredient tables from disk and drop every cached
    /// criticality tier, so the next lookups see the new tables.
    pub fn reload_tables(&self) {
        let fresh = IngredientTables::load_from_dir(&self.tables_dir);
        info!(
            aliases = fresh.alias_group_count(),
            substitutions = fresh.substitution_count(),
            "ingredient tables reloaded"
        );
        *self.tables.write() = fresh;
        self.criticality.invalidate();
    }

    /// Whether an ingredient is on the critical list for a category (or is a
    /// primary protein). Advisory only; never feeds the frequency tiers.
    #[must_use]
    pub fn is_critical_ingredient(&self, ingredient: &str, category: &str) -> bool {
        self.tables
            .read()
            .is_critical_for_category(&normalize(ingredient), category)
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state.read()
    }
}
