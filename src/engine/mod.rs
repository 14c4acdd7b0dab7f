//! Module for the transformations turning parsed records into plottable series

use crate::{
    domain::{LogRecord, Series},
    error::{Error, bounds_error, insufficient_data},
};

mod trend;

pub use trend::TrendCurve;


///
/// Builds a series from two fields of every record, keeping the order of the records.
///
pub fn project(
    label: &str,
    records: &[LogRecord],
    x_field: usize,
    y_field: usize,
) -> Result<Series, Error> {
    let points = records
        .iter()
        .enumerate()
        .map(|(i, record)| match (record.field(x_field), record.field(y_field)) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(bounds_error(
                label,
                format!(
                    "record {i} has {} fields, cannot select fields {x_field} and {y_field}",
                    record.len()
                ),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Series::new(label, points))
}

///
/// Replaces every block of `block` consecutive points by the mean of their `y`, placed at
/// `x = index * block`.
///
/// The length of the series has to be a multiple of `block`, trailing points are never dropped.
///
pub fn downsample(series: &Series, block: usize) -> Result<Series, Error> {
    if block == 0 {
        return Err(insufficient_data("downsampling", "block size must be positive"));
    }
    if series.len() % block != 0 {
        return Err(insufficient_data(
            "downsampling",
            format!(
                "series '{}' has {} points, which is not a multiple of the block size {block}",
                series.label(),
                series.len()
            ),
        ));
    }

    let points = series
        .y()
        .chunks_exact(block)
        .enumerate()
        .map(|(i, chunk)| {
            let mean = chunk.iter().sum::<f64>() / block as f64;
            ((i * block) as f64, mean)
        });
    Ok(Series::new(series.label(), points))
}
