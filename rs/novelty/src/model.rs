use ndarray::{Array1, Array2};

/// Low-rank linear model of the items absorbed so far.
///
/// `basis` is `d x k` with orthonormal columns, `mean` is the centroid of the
/// absorbed items. Both are empty until the first update.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub(crate) basis: Array2<f64>,
    pub(crate) mean: Array1<f64>,
    pub(crate) singular_values: Array1<f64>,
    pub(crate) count: usize,
}

impl LinearModel {
    pub fn empty() -> Self {
        Self {
            basis: Array2::zeros((0, 0)),
            mean: Array1::zeros(0),
            singular_values: Array1::zeros(0),
            count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    pub fn basis(&self) -> &Array2<f64> {
        &self.basis
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn singular_values(&self) -> &Array1<f64> {
        &self.singular_values
    }

    /// Number of items the model was built from.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Feature dimensionality `d`, 0 for an empty model.
    pub fn dimension(&self) -> usize {
        self.basis.nrows()
    }

    /// Number of basis columns actually kept, which may be below the requested `k`
    /// when the absorbed items do not span enough directions.
    pub fn rank(&self) -> usize {
        self.basis.ncols()
    }
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::empty()
    }
}
