/// Fixed-length identity vector produced by a face recognition model.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Builds an embedding scaled to unit length (zero vectors are left as-is).
    pub fn normalized(mut values: Vec<f32>) -> Self {
        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in values.iter_mut() {
                *x /= norm;
            }
        }
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The identity the pipeline is looking for. Computed once at startup and
/// never modified.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceEmbedding(Embedding);

impl ReferenceEmbedding {
    pub fn new(embedding: Embedding) -> Self {
        Self(embedding)
    }

    pub fn embedding(&self) -> &Embedding {
        &self.0
    }
}

/// Distance between two embeddings; smaller means more alike.
pub type DistanceFn = fn(&Embedding, &Embedding) -> f64;

/// `1 - cos(a, b)`, in `[0, 2]`. Length mismatches compare as maximally distant.
pub fn cosine_distance(a: &Embedding, b: &Embedding) -> f64 {
    if a.len() != b.len() {
        return 2.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.values().iter().zip(b.values()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na.sqrt() * nb.sqrt())
}

/// L2 distance. Length mismatches compare as infinitely distant.
pub fn euclidean_distance(a: &Embedding, b: &Embedding) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.values()
        .iter()
        .zip(b.values())
        .map(|(x, y)| {
            let d = (*x - *y) as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_normalized_unit_length() {
        let e = Embedding::normalized(vec![3.0, 4.0]);
        assert_relative_eq!(e.values()[0], 0.6, epsilon = 1e-6);
        assert_relative_eq!(e.values()[1], 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_normalized_zero_vector_unchanged() {
        let e = Embedding::normalized(vec![0.0, 0.0]);
        assert_eq!(e.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_cosine_distance_identical_is_zero() {
        let a = emb(&[0.2, 0.5, 0.1]);
        assert_relative_eq!(cosine_distance(&a, &a), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cosine_distance_orthogonal_is_one() {
        assert_relative_eq!(cosine_distance(&emb(&[1.0, 0.0]), &emb(&[0.0, 1.0])), 1.0);
    }

    #[test]
    fn test_cosine_distance_opposite_is_two() {
        assert_relative_eq!(cosine_distance(&emb(&[1.0, 0.0]), &emb(&[-1.0, 0.0])), 2.0);
    }

    #[test]
    fn test_cosine_distance_ignores_magnitude() {
        let d = cosine_distance(&emb(&[1.0, 1.0]), &emb(&[5.0, 5.0]));
        assert_relative_eq!(d, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cosine_distance_length_mismatch() {
        assert_relative_eq!(cosine_distance(&emb(&[1.0]), &emb(&[1.0, 0.0])), 2.0);
    }

    #[test]
    fn test_euclidean_distance() {
        assert_relative_eq!(euclidean_distance(&emb(&[0.0, 0.0]), &emb(&[3.0, 4.0])), 5.0);
    }

    #[test]
    fn test_euclidean_distance_length_mismatch() {
        assert!(euclidean_distance(&emb(&[1.0]), &emb(&[1.0, 0.0])).is_infinite());
    }
}
