//! Style exposure type definitions.

use ndarray::Array1;

use crate::PrimitivesError;

/// Tolerance on negative weights and on the distance of the weight sum from one.
pub const SIMPLEX_TOLERANCE: f64 = 1e-6;

/// Style weights estimated for a single window, one per factor.
///
/// Weights are non-negative and sum to one within [`SIMPLEX_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureVector {
    weights: Array1<f64>,
}

impl ExposureVector {
    /// Wrap a vector of simplex weights.
    ///
    /// # Errors
    /// Returns `PrimitivesError::NotOnSimplex` if the vector is empty, holds a
    /// non-finite or negative weight, or does not sum to one.
    pub fn new(weights: Array1<f64>) -> Result<Self, PrimitivesError> {
        if weights.is_empty() {
            return Err(PrimitivesError::NotOnSimplex("no weights".to_string()));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < -SIMPLEX_TOLERANCE) {
            return Err(PrimitivesError::NotOnSimplex(format!("weight {w}")));
        }
        let total = weights.sum();
        if (total - 1.0).abs() > SIMPLEX_TOLERANCE {
            return Err(PrimitivesError::NotOnSimplex(format!("weights sum to {total}")));
        }
        Ok(Self { weights })
    }

    /// The weights, in factor column order.
    #[must_use]
    pub const fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Number of factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of the factor at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    /// Sum of the weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.sum()
    }

    /// Whether all weights are non-negative and sum to one within `tolerance`.
    #[must_use]
    pub fn is_on_simplex(&self, tolerance: f64) -> bool {
        self.weights.iter().all(|&w| w >= -tolerance) && (self.total() - 1.0).abs() <= tolerance
    }

    /// Index of the largest weight.
    #[must_use]
    pub fn dominant(&self) -> Option<usize> {
        self.weights
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[test]
    fn simplex_check() {
        let exposure = ExposureVector::new(array![0.25, 0.75]).unwrap();
        assert!(exposure.is_on_simplex(1e-9));
        assert_eq!(exposure.total(), 1.0);

        // Within tolerance of the simplex
        assert!(ExposureVector::new(array![-1e-9, 0.4, 0.6 + 1e-9]).is_ok());
    }

    #[rstest]
    #[case(array![0.5, 0.6])]
    #[case(array![-0.2, 1.2])]
    #[case(array![f64::NAN, 1.0])]
    #[case(array![1.25, 0.0])]
    #[case(Array1::zeros(0))]
    fn off_simplex_weights_rejected(#[case] weights: Array1<f64>) {
        assert!(matches!(ExposureVector::new(weights), Err(PrimitivesError::NotOnSimplex(_))));
    }

    #[test]
    fn dominant_factor() {
        let exposure = ExposureVector::new(array![0.1, 0.7, 0.2]).unwrap();
        assert_eq!(exposure.dominant(), Some(1));
        assert_eq!(exposure.get(2), Some(0.2));
        assert_eq!(exposure.get(3), None);
    }
}
