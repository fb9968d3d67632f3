use super::{score_pair, NEUTRAL_SCORE};

/// Cosine similarity of two vectors in [-1, 1]
///
/// Returns `None` when the lengths differ, the vectors are empty, or either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&x, &y)| {
        let (x, y) = (x as f64, y as f64);
        (dot + x * y, na + x * x, nb + y * y)
    });

    let norm = norm_a.sqrt() * norm_b.sqrt();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }

    Some((dot / norm).clamp(-1.0, 1.0))
}

/// Map a cosine similarity from [-1, 1] to [0, 1]
pub fn similarity_score(cosine: f64) -> f64 {
    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Embedding similarity mapped from [-1, 1] to [0, 1]
///
/// Unusable pairs (length mismatch, zero norm) score neutral like a missing embedding.
pub fn embedding_score(source: Option<&[f32]>, candidate: Option<&[f32]>) -> f64 {
    score_pair(source, candidate, |source, candidate| {
        cosine_similarity(source, candidate)
            .map(similarity_score)
            .unwrap_or(NEUTRAL_SCORE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cosine_extremes() {
        let a = [1.0, 0.0, 2.0];
        let opposite = [-1.0, 0.0, -2.0];
        let orthogonal = [0.0, 3.0, 0.0];

        assert!(approx(cosine_similarity(&a, &a).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&a, &opposite).unwrap(), -1.0));
        assert!(approx(cosine_similarity(&a, &orthogonal).unwrap(), 0.0));
    }

    fn some(v: &[f32]) -> Option<&[f32]> {
        Some(v)
    }

    #[test]
    fn test_embedding_score_mapping() {
        let a = [0.3, 0.4];
        assert!(approx(embedding_score(some(&a), some(&a)), 1.0));
        assert!(approx(embedding_score(some(&a), some(&[-0.3, -0.4])), 0.0));
        assert!(approx(embedding_score(some(&[1.0, 0.0]), some(&[0.0, 1.0])), 0.5));
    }

    #[test]
    fn test_degenerate_embeddings_are_neutral() {
        let a = [0.3, 0.4];
        assert_eq!(embedding_score(None, some(&a)), NEUTRAL_SCORE);
        assert_eq!(embedding_score(some(&a), None), NEUTRAL_SCORE);
        assert_eq!(embedding_score(some(&a), some(&[0.3, 0.4, 0.5])), NEUTRAL_SCORE);
        assert_eq!(embedding_score(some(&a), some(&[0.0, 0.0])), NEUTRAL_SCORE);
        assert_eq!(embedding_score(some(&[]), some(&[])), NEUTRAL_SCORE);
    }
}
