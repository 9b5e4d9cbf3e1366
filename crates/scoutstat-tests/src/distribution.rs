//! Student-t and normal distribution approximations.
//!
//! Numerical Recipes style routines: Lanczos log-gamma, the continued-fraction
//! regularized incomplete beta, and Acklam's rational inverse normal. The
//! critical-value routine is a polynomial correction on top of the inverse
//! normal, not an exact inverse-t.

/// Continued fraction iteration cap.
const BETACF_MAX_ITER: usize = 100;
/// Continued fraction convergence tolerance.
const BETACF_EPS: f64 = 3e-7;

const LANCZOS_COEFFS: [f64; 6] = [
    76.180_091_729_471_46,
    -86.505_320_329_416_77,
    24.014_098_240_830_91,
    -1.231_739_572_450_155,
    0.120_865_097_386_617_9e-2,
    -0.539_523_938_495_3e-5,
];

// ═══════════════════════════════════════════════════════════════════════════════
// Gamma and beta
// ═══════════════════════════════════════════════════════════════════════════════

/// ln Γ(x) for x > 0.
pub fn ln_gamma(x: f64) -> f64 {
    let mut tmp = x + 5.5;
    tmp -= (x + 0.5) * tmp.ln();
    let mut y = x;
    let mut ser = 1.000_000_000_190_015;
    for c in LANCZOS_COEFFS {
        y += 1.0;
        ser += c / y;
    }
    (2.506_628_274_631_000_5 * ser / x).ln() - tmp
}

/// Continued fraction for the incomplete beta function.
///
/// Evaluated with the even/odd convergent recurrence, renormalized every
/// step, until successive convergents agree to a relative `BETACF_EPS`.
fn betacf(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut am = 1.0;
    let mut bm = 1.0;
    let mut az = 1.0;
    let mut bz = 1.0 - qab * x / qap;

    for m in 1..=BETACF_MAX_ITER {
        let em = m as f64;
        let tem = em + em;

        let d = em * (b - em) * x / ((qam + tem) * (a + tem));
        let ap = az + d * am;
        let bp = bz + d * bm;

        let d2 = -(a + em) * (qab + em) * x / ((a + tem) * (qap + tem));
        let app = ap + d2 * az;
        let bpp = bp + d2 * bz;

        let aold = az;
        am = ap / bpp;
        bm = bp / bpp;
        az = app / bpp;
        bz = 1.0;
        if (az - aold).abs() < BETACF_EPS * az.abs() {
            break;
        }
    }
    az
}

/// Regularized incomplete beta I_x(a, b) for x in [0, 1].
pub fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    let bt = if x <= 0.0 || x >= 1.0 {
        0.0
    } else {
        (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp()
    };
    if x < (a + 1.0) / (a + b + 2.0) {
        bt * betacf(x, a, b) / a
    } else {
        1.0 - bt * betacf(1.0 - x, b, a) / b
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Student-t
// ═══════════════════════════════════════════════════════════════════════════════

/// P(T ≤ t) for Student's t with `df` degrees of freedom.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    let tail = 0.5 * incomplete_beta(df / (df + t * t), df / 2.0, 0.5);
    if t >= 0.0 { 1.0 - tail } else { tail }
}

/// Approximate two-sided critical value for upper-tail probability `p`.
///
/// Called with `p = 1 - alpha / 2`. Always non-negative.
pub fn t_inverse(p: f64, df: f64) -> f64 {
    let a = 1.0 / (df - 0.5);
    let b = 48.0 / (a * a);
    let c = ((20700.0 * a) / b - 98.0) * a - 16.0;
    let d = (a * ((94.5 / (b + c)) - 3.0)) * a + 1.0;
    let z = inverse_normal(p);
    (df * (z * z / d)).sqrt()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Normal
// ═══════════════════════════════════════════════════════════════════════════════

/// Inverse standard normal CDF (Acklam's rational approximation).
pub fn inverse_normal(p: f64) -> f64 {
    const A: [f64; 6] = [
        -39.696_830_286_653_8,
        220.946_098_424_521,
        -275.928_510_446_969,
        138.357_751_867_269,
        -30.664_798_066_147_2,
        2.506_628_277_459_24,
    ];
    const B: [f64; 5] = [
        -54.476_098_798_224_1,
        161.585_836_858_041,
        -155.698_979_859_887,
        66.801_311_887_719_7,
        -13.280_681_552_885_7,
    ];
    const C: [f64; 6] = [
        -0.007_784_894_002_430_29,
        -0.322_396_458_041_136,
        -2.400_758_277_161_84,
        -2.549_732_539_343_73,
        4.374_664_141_464_97,
        2.938_163_982_698_78,
    ];
    const D: [f64; 4] = [
        0.007_784_695_709_041_46,
        0.322_467_129_070_04,
        2.445_134_137_142_99,
        3.754_408_661_907_42,
    ];
    const P_LOW: f64 = 0.02425;

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p > 1.0 - P_LOW {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    } else {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
    use statrs::function::gamma::ln_gamma as statrs_ln_gamma;

    #[test]
    fn test_ln_gamma_matches_statrs() {
        for x in [0.5, 1.0, 1.5, 2.0, 3.75, 10.0, 42.0] {
            let diff = (ln_gamma(x) - statrs_ln_gamma(x)).abs();
            assert!(diff < 1e-9, "ln_gamma({x}) off by {diff}");
        }
    }

    #[test]
    fn test_incomplete_beta_endpoints() {
        assert_eq!(incomplete_beta(0.0, 2.0, 0.5), 0.0);
        assert!((incomplete_beta(1.0, 2.0, 0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_incomplete_beta_closed_forms() {
        // I_x(2, 3) = 6x^2 - 8x^3 + 3x^4.
        assert!((incomplete_beta(0.3, 2.0, 3.0) - 0.3483).abs() < 1e-12);
        assert!((incomplete_beta(0.5, 1.0, 1.0) - 0.5).abs() < 1e-12);
        // Upper branch, taken through the symmetric fraction.
        let got = incomplete_beta(0.8, 4.5, 0.5);
        assert!((got - 0.167_850_656_064_407_85).abs() < 1e-12, "got {got}");
        let want = statrs::function::beta::beta_reg(4.5, 0.5, 0.8);
        assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
    }

    #[test]
    fn test_t_cdf_matches_statrs() {
        for df in [1.5, 3.0, 4.0, 7.5, 20.0, 60.0] {
            let reference = StudentsT::new(0.0, 1.0, df).unwrap();
            for t in [-3.0, -1.2, 0.0, 0.1, 0.5, 1.0, 1.7, 2.5, 4.0] {
                let got = student_t_cdf(t, df);
                let want = reference.cdf(t);
                assert!(
                    (got - want).abs() < 1e-5,
                    "t={t} df={df}: got {got}, want {want}"
                );
            }
        }
    }

    #[test]
    fn test_inverse_normal_matches_statrs() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        for p in [0.001, 0.01, 0.02, 0.1, 0.5, 0.9, 0.975, 0.99, 0.999] {
            let got = inverse_normal(p);
            let want = normal.inverse_cdf(p);
            assert!((got - want).abs() < 1e-6, "p={p}: got {got}, want {want}");
        }
    }

    #[test]
    fn test_inverse_normal_regions_are_symmetric() {
        assert!((inverse_normal(0.01) + inverse_normal(0.99)).abs() < 1e-12);
        assert!((inverse_normal(0.975) - 1.959_963_986).abs() < 1e-8);
    }

    #[test]
    fn test_t_inverse_known_values() {
        // Fixed polynomial correction, not the exact quantile.
        assert!((t_inverse(0.975, 4.0) - 4.469_471_126_717).abs() < 1e-9);
        assert!((t_inverse(0.975, 6.248_374_512_353_707) - 5.132_866_156_446).abs() < 1e-9);
    }
}
