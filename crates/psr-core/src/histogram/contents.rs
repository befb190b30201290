use super::HistogramError;
use ndarray::{ArrayD, Dimension, IxDyn};

/// Histogram storage: a dense n-dimensional array or a coordinate-list sparse array.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    Dense(ArrayD<f64>),
    Sparse(SparseArray),
}

impl Contents {
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Dense(array) => array.shape().to_vec(),
            Self::Sparse(array) => array.shape().to_vec(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }

    pub fn total(&self) -> f64 {
        match self {
            Self::Dense(array) => array.sum(),
            Self::Sparse(array) => array.data().iter().sum(),
        }
    }

    pub fn to_dense(&self) -> ArrayD<f64> {
        match self {
            Self::Dense(array) => array.clone(),
            Self::Sparse(array) => array.to_dense(),
        }
    }

    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Contents {
        match self {
            Self::Dense(array) => Self::Dense(array.mapv(f)),
            Self::Sparse(array) => Self::Sparse(SparseArray {
                shape: array.shape.clone(),
                coords: array.coords.clone(),
                data: array.data.iter().map(|value| f(*value)).collect(),
            }),
        }
    }
}

impl From<ArrayD<f64>> for Contents {
    fn from(array: ArrayD<f64>) -> Self {
        Self::Dense(array)
    }
}

impl From<SparseArray> for Contents {
    fn from(array: SparseArray) -> Self {
        Self::Sparse(array)
    }
}

/// COO sparse array. Repeated coordinates accumulate.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray {
    shape: Vec<usize>,
    coords: Vec<Vec<usize>>,
    data: Vec<f64>,
}

impl SparseArray {
    pub fn new(
        shape: Vec<usize>,
        coords: Vec<Vec<usize>>,
        data: Vec<f64>,
    ) -> Result<Self, HistogramError> {
        if coords.len() != data.len() {
            return Err(HistogramError::SparseLengthMismatch {
                coords: coords.len(),
                data: data.len(),
            });
        }
        for (entry, coord) in coords.iter().enumerate() {
            if coord.len() != shape.len()
                || coord.iter().zip(&shape).any(|(index, size)| index >= size)
            {
                return Err(HistogramError::SparseCoordinateOutOfBounds {
                    entry,
                    coord: coord.clone(),
                    shape: shape.clone(),
                });
            }
        }
        Ok(Self {
            shape,
            coords,
            data,
        })
    }

    /// Keep only the non-zero cells of `array`.
    pub fn from_dense(array: &ArrayD<f64>) -> Self {
        let mut coords = Vec::new();
        let mut data = Vec::new();
        for (index, value) in array.indexed_iter() {
            if *value != 0.0 {
                coords.push(index.slice().to_vec());
                data.push(*value);
            }
        }
        Self {
            shape: array.shape().to_vec(),
            coords,
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn coords(&self) -> &[Vec<usize>] {
        &self.coords
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn to_dense(&self) -> ArrayD<f64> {
        let mut dense = ArrayD::zeros(IxDyn(&self.shape));
        for (coord, value) in self.coords.iter().zip(&self.data) {
            dense[IxDyn(coord)] += *value;
        }
        dense
    }

    /// Multiply every stored entry by `weights[coord[axis]]`; the sparsity pattern is kept.
    pub(crate) fn scale_along(&self, axis: usize, weights: &[f64]) -> SparseArray {
        let data = self
            .coords
            .iter()
            .zip(&self.data)
            .map(|(coord, value)| value * weights[coord[axis]])
            .collect();
        SparseArray {
            shape: self.shape.clone(),
            coords: self.coords.clone(),
            data,
        }
    }

    /// Sum onto the axes in `keep` (in that order).
    pub(crate) fn project(&self, keep: &[usize]) -> ArrayD<f64> {
        let shape: Vec<usize> = keep.iter().map(|axis| self.shape[*axis]).collect();
        let mut projected = ArrayD::zeros(IxDyn(&shape));
        let mut target = vec![0; keep.len()];
        for (coord, value) in self.coords.iter().zip(&self.data) {
            for (slot, axis) in target.iter_mut().zip(keep) {
                *slot = coord[*axis];
            }
            projected[IxDyn(&target)] += *value;
        }
        projected
    }
}
