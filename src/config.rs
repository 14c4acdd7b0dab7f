//! Module for the presentation profile: which series are compared and how the charts are labelled.
//!
//! Titles, labels and colours differ between benchmark campaigns, so none of them is baked into the
//! pipeline. A TOML profile overrides the built-in one, which compares a plain table against a
//! hypertable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{Marker, Rgb, SeriesStyle},
    error::{Error, file_access},
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub inserts: InsertChartConfig,
    pub queries: QueryChartConfig,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| file_access(path, e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertChartConfig {
    /// Title prefix, followed by the batch size
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesConfig>,
}

impl Default for InsertChartConfig {
    fn default() -> Self {
        Self {
            title: "Insert batch size".to_string(),
            x_label: "Database size [millions of rows]".to_string(),
            y_label: "Insert rate [rows / second]".to_string(),
            series: vec![
                SeriesConfig {
                    label: "plain".to_string(),
                    dir: None,
                    file: None,
                    optional: true,
                    style: SeriesStyle {
                        color: Rgb::BLUE,
                        marker: Marker::Star,
                        ..SeriesStyle::default()
                    },
                },
                SeriesConfig {
                    label: "hypertable".to_string(),
                    dir: None,
                    file: None,
                    optional: false,
                    style: SeriesStyle {
                        color: Rgb::RED,
                        marker: Marker::Plus,
                        ..SeriesStyle::default()
                    },
                },
            ],
        }
    }
}

/// One compared system or configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub label: String,
    /// Sub directory of the input directory holding the logs, defaults to the label
    #[serde(default)]
    pub dir: Option<String>,
    /// Name used in the log file name, defaults to the label
    #[serde(default)]
    pub file: Option<String>,
    /// An optional series may be absent, it then counts as zero hours and is not drawn
    #[serde(default)]
    pub optional: bool,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

impl SeriesConfig {
    /// `<root>/<dir>/load_<file>_<batch size>_<report period>.log`
    pub fn log_path(&self, root: &Path, batch_size: u64, report_period: u64) -> PathBuf {
        let dir = self.dir.as_deref().unwrap_or(&self.label);
        let file = self.file.as_deref().unwrap_or(&self.label);
        root.join(dir)
            .join(format!("load_{file}_{batch_size}_{report_period}.log"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryChartConfig {
    pub title: String,
    pub x_label: String,
    /// Colour of bars where the candidate is slower
    pub slower: Rgb,
    /// Colour of bars where the candidate is faster
    pub faster: Rgb,
}

impl Default for QueryChartConfig {
    fn default() -> Self {
        Self {
            title: "Mean query latency".to_string(),
            x_label: "Difference in mean latency [%]".to_string(),
            slower: Rgb::RED,
            faster: Rgb::GREEN,
        }
    }
}
