pub mod quadrature;

pub use quadrature::{
    DEFAULT_ABS_TOL, DEFAULT_LIMIT, DEFAULT_REL_TOL, QuadratureError, QuadratureOptions,
    QuadratureResult, integrate_adaptive,
};

use crate::domain::PsrError;

impl From<QuadratureError> for PsrError {
    fn from(error: QuadratureError) -> Self {
        match error {
            QuadratureError::InvalidTolerance { .. } | QuadratureError::InvalidLimit => {
                PsrError::input_validation("INPUT.QUADRATURE", error.to_string())
            }
            QuadratureError::NonFiniteBound { .. } | QuadratureError::NonFiniteIntegrand { .. } => {
                PsrError::computation("RUN.QUADRATURE", error.to_string())
            }
        }
    }
}
