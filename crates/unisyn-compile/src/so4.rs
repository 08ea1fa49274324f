//! Magic-basis change and the SO(4) factorizer.
//!
//! Under the magic basis `E`, the tensor product `A ⊗ B` of two SU(2)
//! matrices maps to the real orthogonal matrix `E†·(A ⊗ B)·E`. Writing
//! `A` and `B` as unit quaternions `x` and `y`, every entry of that image
//! is a fixed signed sum of the products `x_i·y_j`; [`factorize`] inverts
//! this bilinear map.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::{Array2, array};
use ndarray::linalg::kron;
use num_complex::Complex64;
use unisyn_ir::DenseMatrix;
use unisyn_ir::unitary::dagger;

use crate::error::{SynthError, SynthResult};

/// Terms `(i, j, sign)` of image entry `[k][l]` as a sum of `sign·x_i·y_j`.
const BILINEAR: [[[(usize, usize, f64); 4]; 4]; 4] = [
    [
        [(0, 0, 1.0), (1, 1, -1.0), (2, 2, 1.0), (3, 3, -1.0)],
        [(0, 3, -1.0), (1, 2, -1.0), (2, 1, -1.0), (3, 0, -1.0)],
        [(0, 1, -1.0), (1, 0, -1.0), (2, 3, 1.0), (3, 2, 1.0)],
        [(0, 2, -1.0), (1, 3, 1.0), (2, 0, 1.0), (3, 1, -1.0)],
    ],
    [
        [(0, 3, 1.0), (1, 2, -1.0), (2, 1, -1.0), (3, 0, 1.0)],
        [(0, 0, 1.0), (1, 1, 1.0), (2, 2, -1.0), (3, 3, -1.0)],
        [(0, 2, -1.0), (1, 3, -1.0), (2, 0, -1.0), (3, 1, -1.0)],
        [(0, 1, 1.0), (1, 0, -1.0), (2, 3, 1.0), (3, 2, -1.0)],
    ],
    [
        [(0, 1, 1.0), (1, 0, 1.0), (2, 3, 1.0), (3, 2, 1.0)],
        [(0, 2, 1.0), (1, 3, -1.0), (2, 0, 1.0), (3, 1, -1.0)],
        [(0, 0, 1.0), (1, 1, -1.0), (2, 2, -1.0), (3, 3, 1.0)],
        [(0, 3, -1.0), (1, 2, -1.0), (2, 1, 1.0), (3, 0, 1.0)],
    ],
    [
        [(0, 2, 1.0), (1, 3, 1.0), (2, 0, -1.0), (3, 1, -1.0)],
        [(0, 1, -1.0), (1, 0, 1.0), (2, 3, 1.0), (3, 2, -1.0)],
        [(0, 3, 1.0), (1, 2, -1.0), (2, 1, 1.0), (3, 0, -1.0)],
        [(0, 0, 1.0), (1, 1, 1.0), (2, 2, 1.0), (3, 3, 1.0)],
    ],
];

/// The magic basis `E`.
///
/// Its columns are the images of the computational basis under
/// `S ⊗ S`, then `H ⊗ I`, then a CNOT controlled by the first factor.
pub fn magic_basis() -> DenseMatrix {
    let o = Complex64::new(0.0, 0.0);
    let r = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let i = Complex64::new(0.0, FRAC_1_SQRT_2);
    array![[r, o, i, o], [o, i, o, -r], [o, i, o, r], [r, o, -i, o]]
}

/// The image `E†·(a ⊗ b)·E` of a local pair.
pub fn magic_image(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    let e = magic_basis();
    dagger(&e).dot(&kron(a, b)).dot(&e)
}

/// The SU(2) matrix `[[x0 + i·x1, x2 + i·x3], [-x2 + i·x3, x0 - i·x1]]`.
pub fn quaternion_to_su2(x: [f64; 4]) -> DenseMatrix {
    array![
        [Complex64::new(x[0], x[1]), Complex64::new(x[2], x[3])],
        [Complex64::new(-x[2], x[3]), Complex64::new(x[0], -x[1])],
    ]
}

/// Split the magic-basis image of `A ⊗ B` into `(A, B)`.
///
/// Each factor is recovered up to a shared sign: `(-A, -B)` has the same
/// image. Fails when the input is not (within tolerance) a real matrix
/// whose entries satisfy the bilinear structure of a local pair.
pub fn factorize(matrix: &DenseMatrix, tolerance: f64) -> SynthResult<(DenseMatrix, DenseMatrix)> {
    if matrix.dim() != (4, 4) {
        return Err(SynthError::Factorization(format!(
            "expected a 4×4 matrix, got {:?}",
            matrix.dim()
        )));
    }
    let slack = tolerance.sqrt();
    let imag = matrix.iter().map(|z| z.im.abs()).fold(0.0, f64::max);
    if imag > slack {
        return Err(SynthError::Factorization(format!(
            "image is not real (imaginary part {imag:.3e})"
        )));
    }

    // products[i][j] = x_i·y_j
    let mut products = Array2::<f64>::zeros((4, 4));
    for (k, row) in BILINEAR.iter().enumerate() {
        for (l, terms) in row.iter().enumerate() {
            let q = matrix[(k, l)].re;
            for &(i, j, sign) in terms {
                products[(i, j)] += 0.25 * sign * q;
            }
        }
    }

    let row_norm = |i: usize| products.row(i).iter().map(|v| v * v).sum::<f64>().sqrt();
    let pivot = (0..4)
        .max_by(|&a, &b| row_norm(a).total_cmp(&row_norm(b)))
        .unwrap_or(0);
    let norm = row_norm(pivot);
    if norm < slack {
        return Err(SynthError::Factorization("image is zero".into()));
    }

    for sign in [1.0, -1.0] {
        let p = sign * norm;
        let y: [f64; 4] = std::array::from_fn(|j| products[(pivot, j)] / p);
        let jj = (0..4)
            .max_by(|&a, &b| y[a].abs().total_cmp(&y[b].abs()))
            .unwrap_or(0);
        let x: [f64; 4] = std::array::from_fn(|i| products[(i, jj)] / y[jj]);

        let unit = |v: &[f64; 4]| (v.iter().map(|c| c * c).sum::<f64>() - 1.0).abs() <= slack;
        if unit(&x) && unit(&y) {
            return Ok((quaternion_to_su2(x), quaternion_to_su2(y)));
        }
    }

    Err(SynthError::Factorization(
        "unit-norm identity fails for both signs".into(),
    ))
}
