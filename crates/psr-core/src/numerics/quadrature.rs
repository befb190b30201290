use serde::{Deserialize, Serialize};

/// Non-negative Kronrod abscissae on `[-1, 1]`; odd indices are the embedded Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_56,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_6,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

pub const DEFAULT_ABS_TOL: f64 = 1.49e-8;
pub const DEFAULT_REL_TOL: f64 = 1.49e-8;
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuadratureOptions {
    pub abs_tol: f64,
    pub rel_tol: f64,
    /// Maximum number of interval bisections.
    pub limit: usize,
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureResult {
    pub integral: f64,
    pub error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuadratureError {
    #[error("integration bounds must be finite, got [{lower}, {upper}]")]
    NonFiniteBound { lower: f64, upper: f64 },
    #[error("quadrature tolerance '{field}' must be finite and >= 0, got {value}")]
    InvalidTolerance { field: &'static str, value: f64 },
    #[error("quadrature subdivision limit must be at least 1")]
    InvalidLimit,
    #[error("integrand returned {value} at x={x}")]
    NonFiniteIntegrand { x: f64, value: f64 },
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    lower: f64,
    upper: f64,
    integral: f64,
    error: f64,
}

/// Adaptive Gauss-Kronrod (G7/K15) integration of `f` over `[lower, upper]`.
///
/// The segment with the largest error estimate is bisected until
/// `error <= max(abs_tol, rel_tol * |integral|)` or `limit` bisections are spent.
/// Reversed bounds negate the result.
pub fn integrate_adaptive<F>(
    f: F,
    lower: f64,
    upper: f64,
    options: &QuadratureOptions,
) -> Result<QuadratureResult, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    validate(lower, upper, options)?;

    if lower == upper {
        return Ok(QuadratureResult {
            integral: 0.0,
            error: 0.0,
            evaluations: 0,
            converged: true,
        });
    }
    if lower > upper {
        let result = integrate_adaptive(f, upper, lower, options)?;
        return Ok(QuadratureResult {
            integral: -result.integral,
            ..result
        });
    }

    let first = gauss_kronrod_15(&f, lower, upper)?;
    let mut segments = vec![first];
    let mut evaluations = 15;
    let mut integral = first.integral;
    let mut error = first.error;
    let mut bisections = 0;

    loop {
        let tolerance = options.abs_tol.max(options.rel_tol * integral.abs());
        if error <= tolerance {
            return Ok(QuadratureResult {
                integral,
                error,
                evaluations,
                converged: true,
            });
        }
        if bisections >= options.limit {
            return Ok(QuadratureResult {
                integral,
                error,
                evaluations,
                converged: false,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|left, right| left.1.error.total_cmp(&right.1.error))
            .map(|(index, _)| index)
            .unwrap_or_default();
        let segment = segments.swap_remove(worst);
        let midpoint = 0.5 * (segment.lower + segment.upper);
        if midpoint <= segment.lower || midpoint >= segment.upper {
            // Segment can no longer be split in floating point.
            return Ok(QuadratureResult {
                integral,
                error,
                evaluations,
                converged: false,
            });
        }

        segments.push(gauss_kronrod_15(&f, segment.lower, midpoint)?);
        segments.push(gauss_kronrod_15(&f, midpoint, segment.upper)?);
        evaluations += 30;
        bisections += 1;

        integral = segments.iter().map(|segment| segment.integral).sum();
        error = segments.iter().map(|segment| segment.error).sum();
    }
}

fn validate(lower: f64, upper: f64, options: &QuadratureOptions) -> Result<(), QuadratureError> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(QuadratureError::NonFiniteBound { lower, upper });
    }
    for (field, value) in [("abs_tol", options.abs_tol), ("rel_tol", options.rel_tol)] {
        if !value.is_finite() || value < 0.0 {
            return Err(QuadratureError::InvalidTolerance { field, value });
        }
    }
    if options.limit == 0 {
        return Err(QuadratureError::InvalidLimit);
    }
    Ok(())
}

fn gauss_kronrod_15<F>(f: &F, lower: f64, upper: f64) -> Result<Segment, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (lower + upper);
    let half_length = 0.5 * (upper - lower);
    let evaluate = |x: f64| -> Result<f64, QuadratureError> {
        let value = f(x);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(QuadratureError::NonFiniteIntegrand { x, value })
        }
    };

    let center_value = evaluate(center)?;
    let mut kronrod = WGK[7] * center_value;
    let mut gauss = WG[3] * center_value;

    for (index, abscissa) in XGK.iter().copied().enumerate().take(7) {
        let offset = half_length * abscissa;
        let pair = evaluate(center - offset)? + evaluate(center + offset)?;
        kronrod += WGK[index] * pair;
        if index % 2 == 1 {
            gauss += WG[index / 2] * pair;
        }
    }

    Ok(Segment {
        lower,
        upper,
        integral: kronrod * half_length,
        error: ((kronrod - gauss) * half_length).abs(),
    })
}
