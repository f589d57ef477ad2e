/// Floating point type used throughout system
pub type Real = f64;

/// Relative-change convergence test.
///
/// Returns true iff `max_i |new_i - old_i| / |ref_i| < tol`, where the
/// reference defaults to `old` (classic relative change). Passing an explicit
/// reference gives an externally scaled test instead.
///
/// An entry that did not move at all is converged whatever its reference is,
/// so `is_converged(x, x, tol, None)` holds for every finite `x`, zeros
/// included. Slices of different lengths never converge.
pub fn is_converged(new: &[Real], old: &[Real], tol: Real, reference: Option<&[Real]>) -> bool {
    if new.len() != old.len() {
        return false;
    }
    let reference = reference.unwrap_or(old);
    if reference.len() != new.len() {
        return false;
    }

    for ((n, o), r) in new.iter().zip(old).zip(reference) {
        let diff = (n - o).abs();
        if diff == 0.0 {
            continue;
        }
        let ratio = diff / r.abs();
        // NaN compares false, so a NaN ratio is a failed test
        if !(ratio < tol) {
            return false;
        }
    }
    true
}

/// Under-relaxed update: `old * (1 - factor) + computed * factor`.
///
/// `factor = 1` returns `computed` unchanged.
#[inline]
pub fn relax(old: Real, computed: Real, factor: Real) -> Real {
    if factor == 1.0 {
        return computed;
    }
    old * (1.0 - factor) + computed * factor
}

/// Piecewise-linear interpolation on strictly increasing abscissae.
///
/// Outside the table the end segments are extended when `extrapolate` is set;
/// otherwise the result is NaN so that callers can detect the miss.
pub fn interp_linear(xs: &[Real], ys: &[Real], x: Real, extrapolate: bool) -> Real {
    let n = xs.len();
    if n == 0 || ys.len() != n {
        return Real::NAN;
    }
    if n == 1 {
        return if x == xs[0] || extrapolate {
            ys[0]
        } else {
            Real::NAN
        };
    }

    if (x < xs[0] || x > xs[n - 1]) && !extrapolate {
        return Real::NAN;
    }

    // Locate segment (end segments are reused for extrapolation)
    let idx = match xs.partition_point(|&xi| xi <= x) {
        0 => 0,
        i if i >= n => n - 2,
        i => i - 1,
    };

    let (x0, x1) = (xs[idx], xs[idx + 1]);
    let (y0, y1) = (ys[idx], ys[idx + 1]);
    let t = (x - x0) / (x1 - x0);
    y0 + t * (y1 - y0)
}

/// Trapezoidal quadrature of samples `ys` over abscissae `xs`.
pub fn trapz(xs: &[Real], ys: &[Real]) -> Real {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn converged_against_itself(
            xs in prop::collection::vec(-1e6_f64..1e6_f64, 1..32),
            tol in 1e-12_f64..1.0_f64,
        ) {
            prop_assert!(is_converged(&xs, &xs, tol, None));
        }

        #[test]
        fn relaxed_step_never_exceeds_raw_step(
            old in -1e3_f64..1e3_f64,
            computed in -1e3_f64..1e3_f64,
            factor in 1e-3_f64..=1.0_f64,
        ) {
            let relaxed = relax(old, computed, factor);
            let raw_step = (computed - old).abs();
            let step = (relaxed - old).abs();
            prop_assert!(step <= raw_step * (1.0 + 1e-12) + 1e-12);
        }
    }
}
