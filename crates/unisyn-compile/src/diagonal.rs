//! Gray-code synthesis of diagonal unitaries.
//!
//! A diagonal on `K` wires is peeled one target wire at a time. At each
//! level the target is the most significant remaining wire: a CNOT ladder
//! driven by the Gray code of the lower wires, with one Z rotation per
//! step, makes the upper and lower halves of the diagonal agree up to a
//! single Z rotation. The lower half then carries on to the next wire.

use num_complex::Complex64;
use tracing::trace;
use unisyn_ir::unitary::num_qubits_for_dim;
use unisyn_ir::{GateSequence, Wire};

use crate::cache::{GrayCodeCache, gray};
use crate::error::{SynthError, SynthResult};

/// Synthesize `diag(entries)` on local wires `1..=K`.
///
/// Returns the sequence and the scalar `φ` with
/// `diag(entries) = φ · embed(sequence)`.
pub fn synthesize(
    entries: &[Complex64],
    cache: &GrayCodeCache,
    tolerance: f64,
) -> SynthResult<(GateSequence, Complex64)> {
    let num_qubits =
        num_qubits_for_dim(entries.len()).ok_or(SynthError::NotPowerOfTwo(entries.len()))?;
    let mut seq = GateSequence::new();
    if num_qubits == 0 {
        return Ok((seq, entries[0]));
    }

    let slack = tolerance.sqrt();
    let mut diag = entries.to_vec();
    let mut depth = 0;
    loop {
        let remaining = num_qubits - depth;
        let target = Wire(depth + 1);

        if remaining == 1 {
            let theta = -(diag[0].arg() - diag[1].arg());
            seq.rz(theta, target)?;
            let phase = diag[0] * Complex64::from_polar(1.0, theta / 2.0);
            return Ok((seq, phase));
        }

        let before = seq.len();
        peel_level(&mut diag, depth, remaining, cache, &mut seq)?;

        let half = diag.len() / 2;
        if halves_deviation(&diag) > tolerance {
            let beta = -(diag[0] / diag[half]).arg();
            seq.rz(beta, target)?;
            let lower = Complex64::from_polar(1.0, beta / 2.0);
            let upper = lower.conj();
            for y in 0..half {
                diag[y] *= lower;
                diag[half + y] *= upper;
            }
        }
        let deviation = halves_deviation(&diag);
        if deviation > slack {
            return Err(SynthError::UnequalHalves { depth, deviation });
        }

        trace!(
            depth,
            wire = %target,
            gates = seq.len() - before,
            "peeled diagonal level"
        );
        diag.truncate(half);
        depth += 1;
    }
}

/// One CNOT ladder on the target `depth + 1`.
///
/// Afterwards `diag[half + y] / diag[y]` is the same for every `y`.
fn peel_level(
    diag: &mut [Complex64],
    depth: u32,
    remaining: u32,
    cache: &GrayCodeCache,
    seq: &mut GateSequence,
) -> SynthResult<()> {
    let half = diag.len() / 2;
    let target = Wire(depth + 1);
    let controls = remaining - 1;
    // bit k of a lower-half index lives on this wire
    let control_wire = |bit: u32| Wire(depth + 1 + controls - bit);

    let psi: Vec<f64> = (1..half)
        .map(|y| (diag[half + y] * diag[0] / (diag[y] * diag[half])).arg())
        .collect();

    // The parity matrix with entries (1 - v_g[y]) / 2 over y, g >= 1 has
    // inverse rows -(2/half)·v_g[1..], so each angle is a scaled column dot.
    let scale = 1.0 / half as f64;
    let alphas: Vec<f64> = (1..half)
        .map(|i| {
            let column = cache.column(gray(i), half);
            scale * column[1..].iter().zip(&psi).map(|(v, p)| v * p).sum::<f64>()
        })
        .collect();

    let mut toggled = 0_usize;
    for (i, &alpha) in (1..half).zip(&alphas) {
        let code = gray(i);
        let changed = toggled ^ code;
        for bit in (0..controls).filter(|b| (changed >> b) & 1 == 1) {
            seq.cx(control_wire(bit), target)?;
        }
        toggled = code;
        seq.rz(alpha, target)?;

        let column = cache.column(code, half);
        for (y, v) in column.iter().enumerate() {
            let lower = Complex64::from_polar(1.0, alpha * v / 2.0);
            diag[y] *= lower;
            diag[half + y] *= lower.conj();
        }
    }

    for bit in (0..controls).rev().filter(|b| (toggled >> b) & 1 == 1) {
        seq.cx(control_wire(bit), target)?;
    }
    Ok(())
}

fn halves_deviation(diag: &[Complex64]) -> f64 {
    let (lower, upper) = diag.split_at(diag.len() / 2);
    lower
        .iter()
        .zip(upper)
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max)
}
