//! Maximal marginal relevance re-ranking.
//!
//! MMR selects passages one at a time, each step picking the candidate
//! that maximizes `lambda * sim(query, cand) - (1 - lambda) *
//! max_sim(cand, selected)`. High lambda favors relevance; low lambda
//! favors diversity among the selected set.

use crate::index::IndexHit;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        dot_product / (magnitude_a * magnitude_b)
    }
}

/// Select up to `k` candidate indices by maximal marginal relevance.
///
/// `candidates` must carry their stored embeddings (`IndexHit.embedding`)
/// and their similarity to the query (`IndexHit.similarity`). The returned
/// indices are in selection order, most relevant first.
///
/// `k >= candidates.len()` degenerates to similarity order; `lambda = 1.0`
/// is pure relevance ranking.
pub fn maximal_marginal_relevance(candidates: &[IndexHit], k: usize, lambda: f32) -> Vec<usize> {
    if candidates.is_empty() || k == 0 {
        return Vec::new();
    }

    let k = k.min(candidates.len());
    let mut selected: Vec<usize> = Vec::with_capacity(k);
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();

    // First pick is always the most query-similar candidate.
    let first = remaining
        .iter()
        .copied()
        .max_by(|&a, &b| {
            candidates[a]
                .similarity
                .partial_cmp(&candidates[b].similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("remaining is non-empty");
    selected.push(first);
    remaining.retain(|&i| i != first);

    while selected.len() < k && !remaining.is_empty() {
        let mut best_index = remaining[0];
        let mut best_score = f32::NEG_INFINITY;

        for &candidate in &remaining {
            let redundancy = selected
                .iter()
                .map(|&s| {
                    cosine_similarity(
                        &candidates[candidate].embedding,
                        &candidates[s].embedding,
                    )
                })
                .fold(f32::NEG_INFINITY, f32::max);

            let score = lambda * candidates[candidate].similarity - (1.0 - lambda) * redundancy;
            if score > best_score {
                best_score = score;
                best_index = candidate;
            }
        }

        selected.push(best_index);
        remaining.retain(|&i| i != best_index);
    }

    selected
}
