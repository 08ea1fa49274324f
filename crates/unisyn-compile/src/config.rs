//! Synthesis configuration.

use serde::{Deserialize, Serialize};

/// Numerical settings shared by every synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Absolute tolerance for unitarity and equality checks, also the
    /// residual bound for accepting a simultaneous diagonalisation.
    pub tolerance: f64,
    /// Number of real mixing attempts when diagonalising `U·Uᵗ`.
    pub eigen_attempts: usize,
    /// Seed for the mixing coefficients after the first attempt.
    pub eigen_seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            eigen_attempts: 100,
            eigen_seed: 2023,
        }
    }
}

impl SynthesisConfig {
    /// Set the comparison tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of diagonalisation attempts.
    #[must_use]
    pub fn with_eigen_attempts(mut self, attempts: usize) -> Self {
        self.eigen_attempts = attempts.max(1);
        self
    }

    /// Set the mixing seed.
    #[must_use]
    pub fn with_eigen_seed(mut self, seed: u64) -> Self {
        self.eigen_seed = seed;
        self
    }
}
