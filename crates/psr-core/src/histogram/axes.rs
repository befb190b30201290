use super::{Axis, HistogramError};

/// Ordered axes with unique labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    axes: Vec<Axis>,
}

impl Axes {
    pub fn new(axes: Vec<Axis>) -> Result<Self, HistogramError> {
        if axes.is_empty() {
            return Err(HistogramError::NoAxes);
        }
        for (index, axis) in axes.iter().enumerate() {
            if axes[..index]
                .iter()
                .any(|previous| previous.label() == axis.label())
            {
                return Err(HistogramError::DuplicateLabel {
                    label: axis.label().to_string(),
                });
            }
        }
        Ok(Self { axes })
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::nbins).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::label).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Axis> {
        self.axes.iter()
    }

    pub fn index_of(&self, label: &str) -> Result<usize, HistogramError> {
        self.axes
            .iter()
            .position(|axis| axis.label() == label)
            .ok_or_else(|| HistogramError::MissingAxis {
                label: label.to_string(),
                available: self.axes.iter().map(|axis| axis.label().to_string()).collect(),
            })
    }

    pub fn get(&self, label: &str) -> Result<&Axis, HistogramError> {
        let index = self.index_of(label)?;
        Ok(&self.axes[index])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.axes.iter().any(|axis| axis.label() == label)
    }

    /// Subset of axes in the requested order.
    pub fn select(&self, labels: &[&str]) -> Result<Axes, HistogramError> {
        let selected = labels
            .iter()
            .map(|label| self.get(label).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Axes::new(selected)
    }
}

impl std::ops::Index<usize> for Axes {
    type Output = Axis;

    fn index(&self, index: usize) -> &Axis {
        &self.axes[index]
    }
}

impl<'a> IntoIterator for &'a Axes {
    type Item = &'a Axis;
    type IntoIter = std::slice::Iter<'a, Axis>;

    fn into_iter(self) -> Self::IntoIter {
        self.axes.iter()
    }
}
