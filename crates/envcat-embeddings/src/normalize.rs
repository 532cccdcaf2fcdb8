//! Vector post-processing shared by generation and query embedding.

use envcat_core::errors::{EmbeddingError, EnvcatResult};

/// Scale `vec` to unit L2 norm in place. Zero vectors stay zero.
pub fn l2_normalize(vec: &mut [f32]) {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vec.iter_mut() {
            *v /= norm;
        }
    }
}

/// Reject a vector whose length differs from the provider's dimensions.
pub fn validate_dimensions(vec: &[f32], expected: usize) -> EnvcatResult<()> {
    if vec.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: vec.len(),
        }
        .into());
    }
    Ok(())
}

/// Inner product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
