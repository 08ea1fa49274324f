//! Two-qubit synthesis through the magic basis.
//!
//! In the magic basis a two-qubit unitary `U` factors as `K₂·Δ·K₂ᵗ·K₁`
//! with `K₁`, `K₂` real orthogonal and `Δ` diagonal. The orthogonal
//! factors map back to local pairs, and `Δ` is handed to the diagonal
//! synthesizer between the two fixed basis-change skeletons.

use faer::{Mat, Side};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};
use unisyn_ir::unitary::{dagger, from_diagonal, max_abs_diff};
use unisyn_ir::{DenseMatrix, GateSequence, Wire};

use crate::cache::GrayCodeCache;
use crate::config::SynthesisConfig;
use crate::error::{SynthError, SynthResult};
use crate::{diagonal, single_qubit, so4};

/// Mixing coefficients of the first diagonalisation attempt.
const FIRST_MIX: (f64, f64) = (1.260_206_611_224_938_8, 0.223_178_490_467_220_27);

/// Synthesize a 4×4 unitary on local wires 1 and 2.
///
/// Returns the sequence and the scalar `φ` with
/// `matrix = φ · embed(sequence)`.
pub fn synthesize(
    matrix: &DenseMatrix,
    cache: &GrayCodeCache,
    config: &SynthesisConfig,
) -> SynthResult<(GateSequence, Complex64)> {
    let tolerance = config.tolerance;
    let e = so4::magic_basis();
    let u = dagger(&e).dot(matrix).dot(&e);
    let u_squared = u.dot(&u.t());

    let (mut eigenvalues, mut k2) = diagonalize(&u_squared, config)?;

    // Move K₂ into SO(4).
    let det_k2 = determinant(&k2).re;
    eigenvalues[0] /= det_k2 * det_k2;
    k2.column_mut(0).mapv_inplace(|z| z * det_k2);

    let mut diag: Vec<Complex64> = eigenvalues.iter().map(|z| z.sqrt()).collect();
    let det_diag: Complex64 = diag.iter().product();
    diag[0] *= determinant(&u) / det_diag;

    let k2t = k2.t().to_owned();
    let inverse_diag: Vec<Complex64> = diag.iter().map(|z| z.inv()).collect();
    let p_inv = k2.dot(&from_diagonal(&inverse_diag)).dot(&k2t);
    let k1 = p_inv.dot(&u);

    let (c, d) = so4::factorize(&k2t.dot(&k1), tolerance)?;
    let (a, b) = so4::factorize(&k2, tolerance)?;

    let c = single_qubit::synthesize(&c, tolerance)?;
    let d = single_qubit::synthesize(&d, tolerance)?;
    let a = single_qubit::synthesize(&a, tolerance)?;
    let b = single_qubit::synthesize(&b, tolerance)?;
    let (middle, diag_phase) = diagonal::synthesize(&diag, cache, tolerance)?;

    let (w1, w2) = (Wire(1), Wire(2));
    let mut seq = GateSequence::with_capacity(24);
    seq.extend(c.gates(w1)?);
    seq.extend(d.gates(w2)?);
    seq.extend(magic_basis_adjoint_gates()?);
    seq.extend(middle);
    seq.extend(magic_basis_gates()?);
    seq.extend(a.gates(w1)?);
    seq.extend(b.gates(w2)?);

    let phase = c.phase * d.phase * diag_phase * a.phase * b.phase;
    debug!(gates = seq.len(), "two-qubit synthesis complete");
    Ok((seq, phase))
}

/// Gates realising the magic basis `E` exactly.
pub fn magic_basis_gates() -> SynthResult<GateSequence> {
    let (w1, w2) = (Wire(1), Wire(2));
    let mut seq = GateSequence::with_capacity(4);
    seq.s(w1)?.s(w2)?.h(w1)?.cx(w1, w2)?;
    Ok(seq)
}

/// Gates realising `E†` exactly.
pub fn magic_basis_adjoint_gates() -> SynthResult<GateSequence> {
    let (w1, w2) = (Wire(1), Wire(2));
    let mut seq = GateSequence::with_capacity(4);
    seq.cx(w1, w2)?.h(w1)?.sdg(w2)?.sdg(w1)?;
    Ok(seq)
}

/// Determinant through faer's LU factorization.
fn determinant(m: &DenseMatrix) -> Complex64 {
    Mat::<Complex64>::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)]).determinant()
}

/// Real orthogonal `K` and eigenvalues `d` with `K·diag(d)·Kᵗ = m`.
///
/// `m` is complex symmetric and unitary, so its real and imaginary parts
/// commute and share an orthonormal eigenbasis. A random real mixture of
/// the two is diagonalised and the result accepted once it diagonalises
/// `m` itself within the configured tolerance.
fn diagonalize(
    m: &DenseMatrix,
    config: &SynthesisConfig,
) -> SynthResult<([Complex64; 4], DenseMatrix)> {
    let mut rng = StdRng::seed_from_u64(config.eigen_seed);
    for attempt in 0..config.eigen_attempts {
        let (re, im) = if attempt == 0 {
            FIRST_MIX
        } else {
            (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
        };
        let mixed = Mat::<f64>::from_fn(4, 4, |i, j| re * m[(i, j)].re + im * m[(i, j)].im);
        let Ok(eigen) = mixed.self_adjoint_eigen(Side::Lower) else {
            trace!(attempt, "eigendecomposition did not converge");
            continue;
        };
        let vectors = eigen.U();
        let k = DenseMatrix::from_shape_fn((4, 4), |(i, j)| Complex64::new(vectors[(i, j)], 0.0));

        let projected = k.t().dot(m).dot(&k);
        let values: [Complex64; 4] = std::array::from_fn(|i| projected[(i, i)]);
        let rebuilt = k.dot(&from_diagonal(&values)).dot(&k.t());
        let residual = max_abs_diff(&rebuilt, m);
        if residual <= config.tolerance {
            trace!(attempt, residual, "simultaneous diagonalisation found");
            return Ok((values, k));
        }
        trace!(attempt, residual, "mixture left off-diagonal residue");
    }
    Err(SynthError::EigenDecomposition {
        attempts: config.eigen_attempts,
    })
}
