//! Bracketed scalar root finding.

/// Root finder settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootConfig {
    /// Absolute tolerance on the abscissa
    pub x_tol: f64,
    pub max_iterations: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            x_tol: 1e-10,
            max_iterations: 200,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootResult {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RootFailure {
    /// f(a) and f(b) have the same sign
    NoSignChange { fa: f64, fb: f64 },
    /// f returned NaN or ±inf
    NonFinite { x: f64 },
    MaxIterations { best: f64 },
}

/// Brent's method on `[a, b]`.
///
/// Inverse quadratic interpolation or secant steps are taken when they stay
/// inside the bracket and shrink it fast enough; otherwise the step is a
/// bisection.
pub fn brent<F>(mut f: F, a: f64, b: f64, config: &RootConfig) -> Result<RootResult, RootFailure>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let mut fa = f(a);
    let mut fb = f(b);
    if !fa.is_finite() {
        return Err(RootFailure::NonFinite { x: a });
    }
    if !fb.is_finite() {
        return Err(RootFailure::NonFinite { x: b });
    }
    if fa == 0.0 {
        return Ok(RootResult {
            root: a,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(RootResult {
            root: b,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fa.signum() == fb.signum() {
        return Err(RootFailure::NoSignChange { fa, fb });
    }

    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for iter in 1..=config.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.x_tol;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(RootResult {
                root: b,
                residual: fb,
                iterations: iter,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
        if !fb.is_finite() {
            return Err(RootFailure::NonFinite { x: b });
        }
    }

    Err(RootFailure::MaxIterations { best: b })
}

/// A residual function sampled on a uniform grid, kept for diagnostics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResidualCurve {
    /// Abscissae [rad]
    pub x: Vec<f64>,
    pub residual: Vec<f64>,
}

impl ResidualCurve {
    pub const DEFAULT_SAMPLES: usize = 181;

    pub fn sample<F>(mut f: F, a: f64, b: f64, n: usize) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let n = n.max(2);
        let x: Vec<f64> = (0..n)
            .map(|i| a + (b - a) * i as f64 / (n - 1) as f64)
            .collect();
        let residual = x.iter().map(|&xi| f(xi)).collect();
        Self { x, residual }
    }

    /// Indices `i` where the residual changes sign between `i` and `i + 1`.
    pub fn sign_changes(&self) -> Vec<usize> {
        self.residual
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0].is_finite() && w[1].is_finite() && w[0].signum() != w[1].signum())
            .map(|(i, _)| i)
            .collect()
    }

    /// Two-column CSV with the abscissa in degrees.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("phi_deg,residual\n");
        for (x, g) in self.x.iter().zip(&self.residual) {
            out.push_str(&format!("{},{}\n", x.to_degrees(), g));
        }
        out
    }
}
