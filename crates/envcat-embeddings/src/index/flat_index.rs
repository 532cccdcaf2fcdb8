//! Brute-force inner-product index. Vectors are stored row-major in one
//! contiguous buffer; slot `i` is the `i`-th pushed vector.

use std::cmp::Ordering;

use envcat_core::errors::EnvcatResult;

use crate::normalize::{dot, validate_dimensions};

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dimensions: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            data: Vec::new(),
        }
    }

    /// Rebuild from a row-major buffer. The buffer length must be a multiple
    /// of `dimensions`.
    pub(crate) fn from_raw(dimensions: usize, data: Vec<f32>) -> Self {
        Self { dimensions, data }
    }

    /// Append a vector, returning its slot.
    pub fn push(&mut self, vector: &[f32]) -> EnvcatResult<usize> {
        validate_dimensions(vector, self.dimensions)?;
        self.data.extend_from_slice(vector);
        Ok(self.len() - 1)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.data.len() / self.dimensions
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vector(&self, slot: usize) -> Option<&[f32]> {
        let start = slot.checked_mul(self.dimensions)?;
        self.data.get(start..start + self.dimensions)
    }

    pub(crate) fn raw(&self) -> &[f32] {
        &self.data
    }

    /// Top `k` slots by inner product, ties broken by slot order.
    pub fn search(&self, query: &[f32], k: usize) -> EnvcatResult<Vec<(usize, f32)>> {
        self.search_with(query, k, |a, b| a.cmp(&b))
    }

    /// Top `k` slots by inner product, highest first. Equal scores are
    /// ordered by `tiebreak(slot_a, slot_b)`, then by slot. Returns
    /// `min(k, len)` hits.
    pub fn search_with<F>(&self, query: &[f32], k: usize, tiebreak: F) -> EnvcatResult<Vec<(usize, f32)>>
    where
        F: Fn(usize, usize) -> Ordering,
    {
        validate_dimensions(query, self.dimensions)?;
        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimensions.max(1))
            .enumerate()
            .map(|(slot, row)| (slot, dot(query, row)))
            .collect();

        scored.sort_by(|(sa, a), (sb, b)| {
            b.total_cmp(a)
                .then_with(|| tiebreak(*sa, *sb))
                .then_with(|| sa.cmp(sb))
        });
        scored.truncate(k);
        Ok(scored)
    }
}
