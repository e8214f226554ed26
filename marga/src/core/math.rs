//! Numerical primitives shared by the correction filters.
//!
//! Functions for 1-D interpolation, small dense least-squares fits and
//! banded symmetric solves.

use crate::core::types::Extrapolation;

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be sorted ascending. Outside `[xp[0], xp[n-1]]` the value is
/// held (`Nearest`) or extended along the end segment (`Linear`).
/// Returns `None` if `xp` is empty.
pub fn interp(x: f64, xp: &[f64], fp: &[f64], extrapolation: Extrapolation) -> Option<f64> {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(fp[0]);
    }

    if x <= xp[0] {
        return Some(match extrapolation {
            Extrapolation::Nearest => fp[0],
            Extrapolation::Linear => extend(x, xp[0], fp[0], xp[1], fp[1]),
        });
    }
    if x >= xp[n - 1] {
        return Some(match extrapolation {
            Extrapolation::Nearest => fp[n - 1],
            Extrapolation::Linear => extend(x, xp[n - 2], fp[n - 2], xp[n - 1], fp[n - 1]),
        });
    }

    // First index with xp[i] > x
    let hi = xp[..n].partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xp[hi] - xp[lo];
    if span <= 0.0 {
        return Some(fp[lo]);
    }
    let t = (x - xp[lo]) / span;
    Some(fp[lo] + (fp[hi] - fp[lo]) * t)
}

/// Straight-line extension through two points; holds the value when they coincide in x.
#[inline]
fn extend(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    let span = x1 - x0;
    if span.abs() <= f64::EPSILON {
        return if x < x0 { y0 } else { y1 };
    }
    y0 + (y1 - y0) * (x - x0) / span
}

/// Solve a small dense linear system `A·x = b` by Gaussian elimination with
/// partial pivoting. `a` is row-major `n×n`. Returns `None` if singular.
pub fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

/// Least-squares polynomial fit of degree `order`; returns coefficients
/// `c[0] + c[1]·x + ... + c[order]·x^order`.
pub fn polyfit(xs: &[f64], ys: &[f64], order: usize) -> Option<Vec<f64>> {
    let m = order + 1;
    if xs.len() < m || ys.len() != xs.len() {
        return None;
    }

    // Normal equations: (VᵀV) c = Vᵀy
    let mut ata = vec![vec![0.0; m]; m];
    let mut atb = vec![0.0; m];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut powers = vec![1.0; 2 * m - 1];
        for k in 1..powers.len() {
            powers[k] = powers[k - 1] * x;
        }
        for r in 0..m {
            for c in 0..m {
                ata[r][c] += powers[r + c];
            }
            atb[r] += powers[r] * y;
        }
    }

    solve_dense(ata, atb)
}

/// Solve a symmetric positive-definite pentadiagonal system.
///
/// `diag[i] = A[i][i]`, `off1[i] = A[i][i+1]`, `off2[i] = A[i][i+2]`.
/// Uses an LDLᵀ factorisation; returns `None` on a non-positive pivot.
pub fn solve_pentadiagonal(
    diag: &[f64],
    off1: &[f64],
    off2: &[f64],
    rhs: &[f64],
) -> Option<Vec<f64>> {
    let m = diag.len();
    if rhs.len() != m {
        return None;
    }
    if m == 0 {
        return Some(Vec::new());
    }

    let a1 = |i: usize| off1.get(i).copied().unwrap_or(0.0);
    let a2 = |i: usize| off2.get(i).copied().unwrap_or(0.0);

    // l1[i] = L[i+1][i], l2[i] = L[i+2][i]
    let mut d = vec![0.0; m];
    let mut l1 = vec![0.0; m];
    let mut l2 = vec![0.0; m];

    for i in 0..m {
        let mut di = diag[i];
        if i >= 1 {
            di -= l1[i - 1] * l1[i - 1] * d[i - 1];
        }
        if i >= 2 {
            di -= l2[i - 2] * l2[i - 2] * d[i - 2];
        }
        if di <= 0.0 || !di.is_finite() {
            return None;
        }
        d[i] = di;

        let mut e = a1(i);
        if i >= 1 {
            e -= l2[i - 1] * d[i - 1] * l1[i - 1];
        }
        l1[i] = e / di;
        l2[i] = a2(i) / di;
    }

    // Forward: L z = b
    let mut z = vec![0.0; m];
    for i in 0..m {
        let mut v = rhs[i];
        if i >= 1 {
            v -= l1[i - 1] * z[i - 1];
        }
        if i >= 2 {
            v -= l2[i - 2] * z[i - 2];
        }
        z[i] = v;
    }

    // Diagonal, then backward: Lᵀ x = D⁻¹ z
    let mut x = vec![0.0; m];
    for i in (0..m).rev() {
        let mut v = z[i] / d[i];
        if i + 1 < m {
            v -= l1[i] * x[i + 1];
        }
        if i + 2 < m {
            v -= l2[i] * x[i + 2];
        }
        x[i] = v;
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interp_inside() {
        let xp = [0.0, 10.0, 20.0];
        let fp = [0.0, 1.0, 3.0];
        assert_relative_eq!(interp(5.0, &xp, &fp, Extrapolation::Nearest).unwrap(), 0.5);
        assert_relative_eq!(interp(15.0, &xp, &fp, Extrapolation::Nearest).unwrap(), 2.0);
        assert_relative_eq!(interp(10.0, &xp, &fp, Extrapolation::Nearest).unwrap(), 1.0);
    }

    #[test]
    fn test_interp_extrapolation() {
        let xp = [0.0, 10.0];
        let fp = [0.0, 1.0];
        assert_eq!(interp(-5.0, &xp, &fp, Extrapolation::Nearest), Some(0.0));
        assert_eq!(interp(25.0, &xp, &fp, Extrapolation::Nearest), Some(1.0));
        assert_relative_eq!(interp(-5.0, &xp, &fp, Extrapolation::Linear).unwrap(), -0.5);
        assert_relative_eq!(interp(20.0, &xp, &fp, Extrapolation::Linear).unwrap(), 2.0);
    }

    #[test]
    fn test_interp_degenerate() {
        assert_eq!(interp(1.0, &[], &[], Extrapolation::Nearest), None);
        assert_eq!(interp(1.0, &[3.0], &[7.0], Extrapolation::Linear), Some(7.0));
    }

    #[test]
    fn test_solve_dense() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve_dense(a, vec![3.0, 5.0]).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_dense_singular() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(solve_dense(a, vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_polyfit_recovers_quadratic() {
        let xs: Vec<f64> = (-3..=3).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 1.0 - 2.0 * x + 0.5 * x * x).collect();
        let c = polyfit(&xs, &ys, 2).unwrap();
        assert_relative_eq!(c[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(c[1], -2.0, epsilon = 1e-9);
        assert_relative_eq!(c[2], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_polyfit_too_few_points() {
        assert!(polyfit(&[0.0, 1.0], &[0.0, 1.0], 2).is_none());
    }

    #[test]
    fn test_pentadiagonal_matches_dense() {
        let diag = [6.0, 7.0, 8.0, 7.0, 6.0];
        let off1 = [1.0, 2.0, 1.5, 1.0];
        let off2 = [0.5, 0.3, 0.2];
        let rhs = [1.0, 2.0, 3.0, 4.0, 5.0];

        let n = diag.len();
        let mut dense = vec![vec![0.0; n]; n];
        for i in 0..n {
            dense[i][i] = diag[i];
            if i + 1 < n {
                dense[i][i + 1] = off1[i];
                dense[i + 1][i] = off1[i];
            }
            if i + 2 < n {
                dense[i][i + 2] = off2[i];
                dense[i + 2][i] = off2[i];
            }
        }

        let banded = solve_pentadiagonal(&diag, &off1, &off2, &rhs).unwrap();
        let reference = solve_dense(dense, rhs.to_vec()).unwrap();
        for i in 0..n {
            assert_relative_eq!(banded[i], reference[i], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_pentadiagonal_rejects_indefinite() {
        assert!(solve_pentadiagonal(&[-1.0, 2.0], &[0.0], &[], &[1.0, 1.0]).is_none());
    }
}
