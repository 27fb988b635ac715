//! Lane configuration for the external vehicle-counting service.
//!
//! An operator marks, per camera lane, a four-point counting polygon and
//! a two-point crossing line. [`LaneConfigWriter`] validates the whole
//! submission, resolves each lane's reference image path, and writes the
//! result as one JSON array that the counting service reads on startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::config::LanesConfig;
use crate::error::ErrorClass;

/// Number of corners a counting polygon must have.
pub const POLYGON_POINTS: usize = 4;

/// Errors that can occur while saving a lane configuration.
#[derive(Debug, thiserror::Error)]
pub enum LaneConfigError {
    /// The submission was malformed; nothing was written.
    #[error("{0}")]
    Validation(String),

    /// The configuration file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The resolved configuration could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LaneConfigError {
    /// The taxonomy class of this error.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Io { .. } | Self::Serialization(_) => ErrorClass::Internal,
        }
    }
}

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel offset.
    pub x: f64,
    /// Vertical pixel offset.
    pub y: f64,
}

/// Crossing line as submitted; either end may be missing.
#[derive(Debug, Clone, Deserialize)]
struct LineSpec {
    a: Option<Point>,
    b: Option<Point>,
}

/// One lane as submitted by the configurator.
#[derive(Debug, Clone, Deserialize)]
struct LaneSpec {
    lane_id: Option<u64>,
    #[serde(default)]
    polygon: Vec<Point>,
    line: Option<LineSpec>,
}

/// A complete crossing line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneLine {
    /// First end.
    pub a: Point,
    /// Second end.
    pub b: Point,
}

/// A validated lane in the shape the counting service reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLane {
    /// Lane number; defaults to the lane's position in the submission.
    pub lane_id: u64,
    /// Reference image for this lane.
    pub path: String,
    /// Counting polygon, exactly [`POLYGON_POINTS`] corners.
    pub polygon: Vec<Point>,
    /// Crossing line.
    pub line: LaneLine,
}

/// Validates lane submissions and writes them to disk.
#[derive(Debug, Clone)]
pub struct LaneConfigWriter {
    config_path: PathBuf,
    image_dir: String,
}

impl LaneConfigWriter {
    /// Create a writer from the `lanes` config section.
    pub fn new(config: &LanesConfig) -> Self {
        Self {
            config_path: PathBuf::from(&config.config_path),
            image_dir: config.image_dir.trim_end_matches('/').to_owned(),
        }
    }

    /// Where the configuration is written.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Validate every lane in `body` and resolve image paths.
    ///
    /// # Errors
    ///
    /// Returns [`LaneConfigError::Validation`] for the first invalid lane,
    /// or when `body` has no `lanes` array.
    pub fn resolve(&self, body: &Value) -> Result<Vec<ResolvedLane>, LaneConfigError> {
        let Some(lanes) = body.get("lanes").and_then(Value::as_array) else {
            return Err(LaneConfigError::Validation(
                "Expected { lanes: [...] }".to_owned(),
            ));
        };

        lanes
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let position = u64::try_from(index).unwrap_or(u64::MAX);
                let spec: LaneSpec = serde_json::from_value(raw.clone()).map_err(|e| {
                    LaneConfigError::Validation(format!("lane {position}: {e}"))
                })?;
                self.resolve_lane(spec, position)
            })
            .collect()
    }

    fn resolve_lane(&self, spec: LaneSpec, position: u64) -> Result<ResolvedLane, LaneConfigError> {
        let lane_id = spec.lane_id.unwrap_or(position);

        if spec.polygon.len() != POLYGON_POINTS {
            return Err(LaneConfigError::Validation(format!(
                "lane {lane_id}: polygon must contain {POLYGON_POINTS} points"
            )));
        }
        let Some(LineSpec {
            a: Some(a),
            b: Some(b),
        }) = spec.line
        else {
            return Err(LaneConfigError::Validation(format!(
                "lane {lane_id}: line must contain a and b"
            )));
        };

        Ok(ResolvedLane {
            lane_id,
            path: format!("{}/lane{lane_id}.jpeg", self.image_dir),
            polygon: spec.polygon,
            line: LaneLine { a, b },
        })
    }

    /// Validate `body` and write the resolved lanes to the config file.
    ///
    /// Returns the number of lanes saved. Nothing is written unless
    /// every lane is valid.
    ///
    /// # Errors
    ///
    /// Returns [`LaneConfigError::Validation`] for malformed input and
    /// [`LaneConfigError::Io`] if the file or its directory cannot be
    /// written.
    pub async fn save(&self, body: &Value) -> Result<usize, LaneConfigError> {
        let lanes = self.resolve(body)?;
        let json = serde_json::to_vec_pretty(&lanes)?;

        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        tokio::fs::write(&self.config_path, json)
            .await
            .map_err(|source| self.io_error(source))?;

        info!(
            path = %self.config_path.display(),
            lanes = lanes.len(),
            "Lane configuration saved"
        );
        Ok(lanes.len())
    }

    fn io_error(&self, source: std::io::Error) -> LaneConfigError {
        LaneConfigError::Io {
            path: self.config_path.display().to_string(),
            source,
        }
    }
}
