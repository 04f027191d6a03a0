use std::collections::BTreeMap;

/// Sparse feature vector handed from a vectorizer to a classifier.
///
/// Entries are kept sorted by column index with no duplicates, and every
/// index is below `dim`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// An all-zero vector of the given width.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build from accumulated column values. Columns at or beyond `dim` and
    /// explicit zeros are dropped.
    pub fn from_columns(dim: usize, columns: BTreeMap<usize, f64>) -> Self {
        let entries = columns
            .into_iter()
            .filter(|&(idx, value)| idx < dim && value != 0.0)
            .collect();
        Self { dim, entries }
    }

    pub fn from_dense(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, value)| value != 0.0)
            .collect();
        Self {
            dim: values.len(),
            entries,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product against a dense weight row. Missing weights count as zero.
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(idx, value)| weights.get(idx).copied().unwrap_or(0.0) * value)
            .sum()
    }

    pub fn map_values(&mut self, f: impl Fn(usize, f64) -> f64) {
        for (idx, value) in &mut self.entries {
            *value = f(*idx, *value);
        }
        self.entries.retain(|&(_, value)| value != 0.0);
    }

    pub fn l1_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v.abs()).sum()
    }

    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt()
    }

    /// Divide every entry by `norm`; a zero norm leaves the vector untouched.
    pub fn normalize_by(&mut self, norm: f64) {
        if norm > 0.0 {
            self.map_values(|_, v| v / norm);
        }
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, value) in &self.entries {
            dense[idx] = value;
        }
        dense
    }
}
