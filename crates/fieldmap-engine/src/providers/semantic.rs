//! Embedding-based similarity with a statistical fallback.
//!
//! The provider sends every source and target name to an injected
//! [`TextEmbedder`] in a single batch and compares the returned vectors by
//! cosine similarity. When no embedder is configured, or the embedder fails,
//! times out, panics, or answers with the wrong number of vectors, the
//! matrix is computed with TF-IDF vectors instead.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::{ProviderKind, SimilarityProvider, tfidf_similarity};
use crate::error::EmbedError;
use crate::matrix::SimilarityMatrix;

/// Text-embedding collaborator.
///
/// Must accept batches. Vector dimensionality is up to the backend; only
/// cosine similarity between returned vectors is used.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Semantic similarity provider.
#[derive(Clone, Default)]
pub struct SemanticProvider {
    embedder: Option<Arc<dyn TextEmbedder>>,
}

impl std::fmt::Debug for SemanticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticProvider")
            .field("has_embedder", &self.embedder.is_some())
            .finish()
    }
}

impl SemanticProvider {
    pub fn with_embedder(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self {
            embedder: Some(embedder),
        }
    }

    /// Creates a provider that always uses the TF-IDF similarity.
    pub fn statistical() -> Self {
        Self { embedder: None }
    }

    fn embedding_matrix(
        &self,
        embedder: &dyn TextEmbedder,
        sources: &[&str],
        targets: &[&str],
    ) -> Result<SimilarityMatrix, EmbedError> {
        let texts: Vec<String> = sources
            .iter()
            .chain(targets)
            .map(|name| (*name).to_string())
            .collect();
        let vectors = catch_unwind(AssertUnwindSafe(|| embedder.embed(&texts)))
            .map_err(|_| EmbedError::Unavailable("embedding backend panicked".to_string()))??;
        if vectors.len() != texts.len() {
            return Err(EmbedError::ShapeMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        let (source_vectors, target_vectors) = vectors.split_at(sources.len());
        Ok(SimilarityMatrix::from_fn(
            sources.len(),
            targets.len(),
            |i, j| cosine_similarity(&source_vectors[i], &target_vectors[j]),
        ))
    }
}

impl SimilarityProvider for SemanticProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Semantic
    }

    fn compute_matrix(&self, sources: &[&str], targets: &[&str]) -> SimilarityMatrix {
        if sources.is_empty() || targets.is_empty() {
            return SimilarityMatrix::zeros(sources.len(), targets.len());
        }
        let Some(embedder) = self.embedder.as_deref() else {
            debug!("no embedding backend configured, using TF-IDF similarity");
            return tfidf_similarity(sources, targets);
        };
        match self.embedding_matrix(embedder, sources, targets) {
            Ok(matrix) => matrix,
            Err(err) => {
                warn!(error = %err, "embedding similarity failed, falling back to TF-IDF");
                tfidf_similarity(sources, targets)
            }
        }
    }
}

/// Cosine similarity clamped to [0, 1].
///
/// Mismatched dimensions, empty vectors, and zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if !denom.is_finite() || denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// Bounds the latency of another embedder.
///
/// The wrapped call runs on a worker thread. When it does not answer within
/// the timeout, [`EmbedError::Timeout`] is returned and the worker is left to
/// finish on its own.
pub struct DeadlineEmbedder {
    inner: Arc<dyn TextEmbedder>,
    timeout: Duration,
}

impl DeadlineEmbedder {
    pub fn new(inner: Arc<dyn TextEmbedder>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl TextEmbedder for DeadlineEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let (sender, receiver) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let batch = texts.to_vec();
        thread::Builder::new()
            .name("fieldmap-embed".to_string())
            .spawn(move || {
                let _ = sender.send(inner.embed(&batch));
            })
            .map_err(|err| EmbedError::Unavailable(format!("could not start worker: {err}")))?;
        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(EmbedError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EmbedError::Unavailable(
                "embedding worker stopped without answering".to_string(),
            )),
        }
    }
}
