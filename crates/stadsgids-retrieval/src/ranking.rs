//! Cosine similarity ranking over corpus embeddings.

use stadsgids_core::Embedding;

/// Calculate cosine similarity between two vectors.
///
/// A zero-magnitude operand (and, defensively, a length mismatch) scores
/// exactly `0.0`: "no signal" rather than an error. Scores for
/// non-degenerate vectors lie in `[-1, 1]`.
pub fn cosine_similarity(vector_a: &[f64], vector_b: &[f64]) -> f64 {
    if vector_a.len() != vector_b.len() {
        return 0.0;
    }

    let dot_product: f64 = vector_a
        .iter()
        .zip(vector_b.iter())
        .map(|(component_a, component_b)| component_a * component_b)
        .sum();
    let magnitude_a = vector_a.iter().map(|component| component * component).sum::<f64>().sqrt();
    let magnitude_b = vector_b.iter().map(|component| component * component).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Select the best-scoring corpus index for a query embedding.
///
/// Ties break to the LOWEST index: the scan keeps the first occurrence of
/// the maximum, so identical inputs always select the same document.
/// Returns `None` for an empty corpus; callers special-case "no documents"
/// before ranking.
pub fn rank(query: &[f64], corpus: &[Embedding]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in corpus.iter().enumerate() {
        let score = cosine_similarity(query, candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let vector = vec![0.3, 0.5, 0.2];
        let score = cosine_similarity(&vector, &vector);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_vectors_score_minus_one() {
        let vector = vec![1.0, 2.0, 3.0];
        let opposite: Vec<f64> = vector.iter().map(|component| -component).collect();
        let score = cosine_similarity(&vector, &opposite);
        assert!((score + 1.0).abs() < 1e-12);
    }

    #[test]
    fn similarity_is_symmetric() {
        let vector_a = vec![0.1, 0.9, 0.4, 0.0];
        let vector_b = vec![0.7, 0.2, 0.5, 0.3];
        let forward = cosine_similarity(&vector_a, &vector_b);
        let backward = cosine_similarity(&vector_b, &vector_a);
        assert!((forward - backward).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let other = vec![0.5, 0.5, 0.5];
        assert!(cosine_similarity(&zero, &other).abs() < f64::EPSILON);
        assert!(cosine_similarity(&other, &zero).abs() < f64::EPSILON);
        assert!(cosine_similarity(&zero, &zero).abs() < f64::EPSILON);
    }

    #[test]
    fn length_mismatch_scores_zero() {
        let short = vec![1.0, 0.0];
        let long = vec![1.0, 0.0, 0.0];
        assert!(cosine_similarity(&short, &long).abs() < f64::EPSILON);
    }

    #[test]
    fn rank_selects_best_match() {
        let query = vec![1.0, 0.0];
        let corpus = vec![vec![0.0, 1.0], vec![0.9, 0.1], vec![0.5, 0.5]];
        let (index, score) = rank(&query, &corpus).expect("non-empty corpus");
        assert_eq!(index, 1);
        assert!(score > 0.9);
    }

    #[test]
    fn rank_breaks_ties_to_lowest_index() {
        let query = vec![1.0, 0.0];
        // Documents 0 and 2 are identical, so they tie exactly.
        let corpus = vec![vec![2.0, 0.0], vec![0.0, 1.0], vec![2.0, 0.0]];

        for _ in 0..10 {
            let (index, score) = rank(&query, &corpus).expect("non-empty corpus");
            assert_eq!(index, 0, "first occurrence wins");
            assert!((score - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn rank_of_empty_corpus_is_none() {
        let query = vec![1.0, 0.0];
        assert!(rank(&query, &[]).is_none());
    }

    #[test]
    fn rank_is_deterministic_across_calls() {
        let query = vec![0.3, 0.8, 0.1, 0.4];
        let corpus: Vec<Vec<f64>> = (0..20)
            .map(|seed| {
                (0..4)
                    .map(|dim| f64::from((seed * 7 + dim * 13) % 11) / 11.0)
                    .collect()
            })
            .collect();

        let first = rank(&query, &corpus);
        for _ in 0..5 {
            assert_eq!(rank(&query, &corpus), first);
        }
    }
}
