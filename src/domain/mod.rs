//! Module for the types describing parsed report lines and the series derived from them.

mod style;

pub use style::{Marker, Rgb, SeriesStyle};

/// The numeric fields extracted from one matching report line, in the order the pattern declares them.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    fields: Vec<f64>,
}

impl LogRecord {
    pub(crate) fn new(fields: Vec<f64>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<f64> {
        self.fields.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A labelled sequence of `(x, y)` points.
///
/// `x` and `y` always have the same length. `x` is usually non-decreasing (a timestamp or a running
/// row count), but that is not enforced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            label: label.into(),
            x,
            y,
        }
    }

    pub fn empty(label: impl Into<String>) -> Self {
        Self::new(label, std::iter::empty())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        self.points().next()
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.x.last()?, *self.y.last()?))
    }

    /// Largest `x` and `y` of the series, `None` when it is empty.
    pub(crate) fn max(&self) -> Option<(f64, f64)> {
        self.points()
            .reduce(|(mx, my), (x, y)| (mx.max(x), my.max(y)))
    }
}
