//! Charts and their CSV exports are first written under temporary names in the output directory,
//! and only moved to their final names once every step succeeded.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, file_access};

use super::ensure_parent_dir;

/// The files of one invocation, written under temporary names
///
/// Dropping it without [`StagedOutput::commit`] removes everything written so far.
#[derive(Debug)]
pub struct StagedOutput {
    target: PathBuf,
    chart: NamedTempFile,
    csv: Option<NamedTempFile>,
}

impl StagedOutput {
    /// Stages a chart for `target`, and a CSV export next to it when `with_csv` is set.
    pub fn new(target: &Path, with_csv: bool) -> Result<Self, Error> {
        ensure_parent_dir(target)?;
        let chart = stage(target)?;
        let csv = if with_csv {
            Some(stage(&target.with_extension("csv"))?)
        } else {
            None
        };
        Ok(Self {
            target: target.to_path_buf(),
            chart,
            csv,
        })
    }

    /// Where the chart is drawn until the output is committed. Keeps the extension of the target,
    /// which selects the image encoder.
    pub fn chart_path(&self) -> &Path {
        self.chart.path()
    }

    pub fn csv_path(&self) -> Option<&Path> {
        self.csv.as_ref().map(|f| f.path())
    }

    /// Moves the staged files to their final names and returns the path of the chart.
    pub fn commit(self) -> Result<PathBuf, Error> {
        let Self { target, chart, csv } = self;
        chart
            .persist(&target)
            .map_err(|e| file_access(&target, e.error))?;

        if let Some(csv) = csv {
            let csv_target = target.with_extension("csv");
            if let Err(e) = csv.persist(&csv_target) {
                if let Err(remove) = std::fs::remove_file(&target) {
                    warn!(path = %target.display(), error = %remove, "could not remove chart");
                }
                return Err(file_access(csv_target, e.error));
            }
        }
        debug!(path = %target.display(), "committed output");
        Ok(target)
    }
}

fn stage(target: &Path) -> Result<NamedTempFile, Error> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(".partial-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| file_access(dir, e))
}
