//! Labeled multi-dimensional histograms with unit-carrying contents.

mod axes;
mod axis;
mod contents;

pub use axes::Axes;
pub use axis::{Axis, MAX_NSIDE};
pub use contents::{Contents, SparseArray};

use crate::domain::PsrError;
use crate::units::{Unit, UnitError};
use ndarray::{ArrayD, Axis as ArrayAxis, IxDyn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistogramError {
    #[error("axis '{label}' needs at least 2 edges, got {actual}")]
    TooFewEdges { label: String, actual: usize },
    #[error("axis '{label}' edge must be finite at index {index}, got {value}")]
    NonFiniteEdge {
        label: String,
        index: usize,
        value: f64,
    },
    #[error(
        "axis '{label}' edges must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingEdges {
        label: String,
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("axis '{label}' requires a power-of-two HEALPix nside up to 2^29, got {nside}")]
    InvalidNside { label: String, nside: usize },
    #[error("histogram requires at least one axis")]
    NoAxes,
    #[error("duplicate axis label '{label}'")]
    DuplicateLabel { label: String },
    #[error("axis '{label}' not found; available axes: {available:?}")]
    MissingAxis {
        label: String,
        available: Vec<String>,
    },
    #[error("contents shape {contents:?} does not match axes shape {axes:?}")]
    ShapeMismatch {
        axes: Vec<usize>,
        contents: Vec<usize>,
    },
    #[error("sparse coordinate count {coords} does not match value count {data}")]
    SparseLengthMismatch { coords: usize, data: usize },
    #[error("sparse entry {entry} coordinate {coord:?} is outside shape {shape:?}")]
    SparseCoordinateOutOfBounds {
        entry: usize,
        coord: Vec<usize>,
        shape: Vec<usize>,
    },
    #[error("axis '{label}' has {expected} bins but {actual} values were supplied")]
    BroadcastLengthMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Unit(#[from] UnitError),
}

impl From<HistogramError> for PsrError {
    fn from(error: HistogramError) -> Self {
        match error {
            HistogramError::Unit(error) => error.into(),
            other => PsrError::input_validation("INPUT.HISTOGRAM", other.to_string()),
        }
    }
}

/// Axes, contents and the unit of every cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    axes: Axes,
    contents: Contents,
    unit: Unit,
}

impl Histogram {
    pub fn new(
        axes: Axes,
        contents: impl Into<Contents>,
        unit: Unit,
    ) -> Result<Self, HistogramError> {
        let contents = contents.into();
        let expected = axes.shape();
        let actual = contents.shape();
        if expected != actual {
            return Err(HistogramError::ShapeMismatch {
                axes: expected,
                contents: actual,
            });
        }
        Ok(Self {
            axes,
            contents,
            unit,
        })
    }

    /// All-zero dense histogram.
    pub fn zeros(axes: Axes, unit: Unit) -> Self {
        let contents = ArrayD::zeros(IxDyn(&axes.shape()));
        Self {
            axes,
            contents: Contents::Dense(contents),
            unit,
        }
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn ndim(&self) -> usize {
        self.axes.ndim()
    }

    pub fn is_sparse(&self) -> bool {
        self.contents.is_sparse()
    }

    pub fn total(&self) -> f64 {
        self.contents.total()
    }

    pub fn to_dense(&self) -> ArrayD<f64> {
        self.contents.to_dense()
    }

    pub fn into_parts(self) -> (Axes, Contents, Unit) {
        (self.axes, self.contents, self.unit)
    }

    /// Reshape `values` so it broadcasts along `label`: size 1 on every other axis.
    pub fn expand_dims(&self, values: &[f64], label: &str) -> Result<ArrayD<f64>, HistogramError> {
        let index = self.checked_broadcast_axis(values, label)?;
        let mut shape = vec![1; self.ndim()];
        shape[index] = values.len();
        ArrayD::from_shape_vec(IxDyn(&shape), values.to_vec()).map_err(|_| {
            HistogramError::BroadcastLengthMismatch {
                label: label.to_string(),
                expected: self.axes[index].nbins(),
                actual: values.len(),
            }
        })
    }

    /// Multiply every cell by the entry of `values` matching its bin along `label`.
    ///
    /// Sparse storage stays sparse; the result unit is `self.unit * unit`.
    pub fn scale_along(
        &self,
        label: &str,
        values: &[f64],
        unit: &Unit,
    ) -> Result<Histogram, HistogramError> {
        let index = self.checked_broadcast_axis(values, label)?;
        let contents = match &self.contents {
            Contents::Dense(array) => {
                let weights = self.expand_dims(values, label)?;
                Contents::Dense(array * &weights)
            }
            Contents::Sparse(array) => Contents::Sparse(array.scale_along(index, values)),
        };
        Ok(Histogram {
            axes: self.axes.clone(),
            contents,
            unit: &self.unit * unit,
        })
    }

    pub fn to_unit(&self, target: &Unit) -> Result<Histogram, HistogramError> {
        let factor = self.unit.conversion_factor(target)?;
        Ok(Histogram {
            axes: self.axes.clone(),
            contents: self.contents.map_values(|value| value * factor),
            unit: target.clone(),
        })
    }

    /// Sum out every axis not listed in `labels`; the result follows the order of `labels`.
    pub fn project(&self, labels: &[&str]) -> Result<Histogram, HistogramError> {
        let axes = self.axes.select(labels)?;
        let keep = labels
            .iter()
            .map(|label| self.axes.index_of(label))
            .collect::<Result<Vec<_>, _>>()?;

        let projected = match &self.contents {
            Contents::Sparse(array) => array.project(&keep),
            Contents::Dense(array) => {
                let mut reduced = array.clone();
                for index in (0..self.ndim()).rev() {
                    if !keep.contains(&index) {
                        reduced = reduced.sum_axis(ArrayAxis(index));
                    }
                }
                let mut remaining = keep.clone();
                remaining.sort_unstable();
                let permutation: Vec<usize> = keep
                    .iter()
                    .map(|axis| {
                        remaining
                            .iter()
                            .position(|candidate| candidate == axis)
                            .unwrap_or_default()
                    })
                    .collect();
                reduced.permuted_axes(IxDyn(&permutation)).as_standard_layout().into_owned()
            }
        };

        Ok(Histogram {
            axes,
            contents: Contents::Dense(projected),
            unit: self.unit.clone(),
        })
    }

    fn checked_broadcast_axis(&self, values: &[f64], label: &str) -> Result<usize, HistogramError> {
        let index = self.axes.index_of(label)?;
        let expected = self.axes[index].nbins();
        if values.len() != expected {
            return Err(HistogramError::BroadcastLengthMismatch {
                label: label.to_string(),
                expected,
                actual: values.len(),
            });
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{Axes, Axis, Histogram, HistogramError, SparseArray};
    use crate::units::Unit;
    use ndarray::{ArrayD, IxDyn};

    fn sample_histogram() -> Histogram {
        let axes = Axes::new(vec![
            Axis::new("Em", vec![0.0, 1.0, 2.0], Some(Unit::kev())).expect("Em"),
            Axis::new("Ei", vec![10.0, 20.0, 30.0, 40.0], Some(Unit::kev())).expect("Ei"),
        ])
        .expect("axes");
        let contents = ArrayD::from_shape_fn(IxDyn(&[2, 3]), |index| {
            (1 + index[0] * 3 + index[1]) as f64
        });
        Histogram::new(axes, contents, Unit::cm2_s()).expect("histogram")
    }

    #[test]
    fn expand_dims_places_values_on_the_labeled_axis() {
        let histogram = sample_histogram();
        let expanded = histogram
            .expand_dims(&[1.0, 2.0, 3.0], "Ei")
            .expect("expand");
        assert_eq!(expanded.shape(), [1, 3]);

        let error = histogram
            .expand_dims(&[1.0, 2.0], "Ei")
            .expect_err("length mismatch");
        assert_eq!(
            error,
            HistogramError::BroadcastLengthMismatch {
                label: "Ei".to_string(),
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn scale_along_broadcasts_over_other_axes() {
        let histogram = sample_histogram();
        let scaled = histogram
            .scale_along("Ei", &[1.0, 10.0, 100.0], &Unit::photon_flux_density())
            .expect("scale");
        let dense = scaled.to_dense();
        assert_eq!(dense[IxDyn(&[0, 0])], 1.0);
        assert_eq!(dense[IxDyn(&[0, 2])], 300.0);
        assert_eq!(dense[IxDyn(&[1, 1])], 50.0);
        assert_eq!(scaled.unit().to_string(), "1 / keV");
    }

    #[test]
    fn sparse_scaling_matches_dense_scaling() {
        let dense = sample_histogram();
        let (axes, contents, unit) = dense.clone().into_parts();
        let sparse = Histogram::new(axes, SparseArray::from_dense(&contents.to_dense()), unit)
            .expect("sparse histogram");

        let weights = [0.5, 2.0, 4.0];
        let from_dense = dense
            .scale_along("Ei", &weights, &Unit::dimensionless())
            .expect("dense scale");
        let from_sparse = sparse
            .scale_along("Ei", &weights, &Unit::dimensionless())
            .expect("sparse scale");
        assert!(from_sparse.is_sparse());
        assert_eq!(from_sparse.to_dense(), from_dense.to_dense());
    }

    #[test]
    fn project_sums_out_other_axes_in_requested_order() {
        let histogram = sample_histogram();
        let projected = histogram.project(&["Ei"]).expect("project");
        assert_eq!(projected.axes().labels(), ["Ei"]);
        let dense = projected.to_dense();
        assert_eq!(dense.as_slice(), Some(&[5.0, 7.0, 9.0][..]));

        let swapped = histogram.project(&["Ei", "Em"]).expect("swap");
        assert_eq!(swapped.to_dense()[IxDyn(&[2, 1])], 6.0);
        assert_eq!(swapped.total(), histogram.total());
    }

    #[test]
    fn to_unit_rescales_contents() {
        let histogram = sample_histogram();
        let converted = histogram
            .to_unit(&"m2 s".parse().expect("m2 s"))
            .expect("convert");
        assert!((converted.total() - histogram.total() * 1.0e-4).abs() < 1.0e-15);
        assert!(histogram.to_unit(&Unit::kev()).is_err());
    }

    #[test]
    fn rejects_contents_with_the_wrong_shape() {
        let axes = Axes::new(vec![Axis::new("Ei", vec![0.0, 1.0], None).expect("Ei")])
            .expect("axes");
        let contents: ArrayD<f64> = ArrayD::zeros(IxDyn(&[2]));
        assert_eq!(
            Histogram::new(axes, contents, Unit::dimensionless()),
            Err(HistogramError::ShapeMismatch {
                axes: vec![1],
                contents: vec![2]
            })
        );
    }
}
