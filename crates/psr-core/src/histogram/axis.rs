use super::HistogramError;
use crate::units::Unit;

/// Largest HEALPix resolution, `2^29`.
pub const MAX_NSIDE: usize = 1 << 29;

/// A labeled binning with strictly increasing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    label: String,
    edges: Vec<f64>,
    unit: Option<Unit>,
}

impl Axis {
    pub fn new(
        label: impl Into<String>,
        edges: Vec<f64>,
        unit: Option<Unit>,
    ) -> Result<Self, HistogramError> {
        let label = label.into();
        validate_edges(&label, &edges)?;
        Ok(Self { label, edges, unit })
    }

    /// Integer pixel axis for a HEALPix map with `12 * nside^2` pixels.
    pub fn healpix(label: impl Into<String>, nside: usize) -> Result<Self, HistogramError> {
        let label = label.into();
        if nside == 0 || nside > MAX_NSIDE || !nside.is_power_of_two() {
            return Err(HistogramError::InvalidNside { label, nside });
        }
        let pixel_count = 12 * nside * nside;
        let edges = (0..=pixel_count).map(|edge| edge as f64).collect();
        Self::new(label, edges, None)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn nbins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn lower_bounds(&self) -> &[f64] {
        &self.edges[..self.edges.len() - 1]
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.edges[1..]
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect()
    }

    pub fn widths(&self) -> Vec<f64> {
        self.edges.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    /// Bins are half-open `[lo, hi)` except the last, which includes its upper edge.
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        let last = *self.edges.last()?;
        if !value.is_finite() || value < self.edges[0] || value > last {
            return None;
        }
        if value == last {
            return Some(self.nbins() - 1);
        }
        match self.edges.binary_search_by(|edge| edge.total_cmp(&value)) {
            Ok(index) => Some(index),
            Err(upper) => Some(upper - 1),
        }
    }
}

fn validate_edges(label: &str, edges: &[f64]) -> Result<(), HistogramError> {
    if edges.len() < 2 {
        return Err(HistogramError::TooFewEdges {
            label: label.to_string(),
            actual: edges.len(),
        });
    }

    for (index, edge) in edges.iter().copied().enumerate() {
        if !edge.is_finite() {
            return Err(HistogramError::NonFiniteEdge {
                label: label.to_string(),
                index,
                value: edge,
            });
        }
        if index > 0 && edge <= edges[index - 1] {
            return Err(HistogramError::NonIncreasingEdges {
                label: label.to_string(),
                index,
                previous: edges[index - 1],
                current: edge,
            });
        }
    }

    Ok(())
}
