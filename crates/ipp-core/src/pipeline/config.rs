use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RADIUS;
use crate::error::{IppError, Result};
use crate::kernel::{validate_radius, DifferenceParams};
use crate::strategy::StrategyKind;

/// A batch of images processed with one operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Images to process; one output is written per input.
    pub inputs: Vec<PathBuf>,
    /// Background image, required by background subtraction.
    #[serde(default)]
    pub reference: Option<PathBuf>,
    /// Directory for outputs. Defaults to each input's own directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub operation: Operation,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// The kernel a job runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    BackgroundSubtraction(DifferenceParams),
    Erode {
        #[serde(default = "default_radius")]
        radius: i64,
    },
    Dilate {
        #[serde(default = "default_radius")]
        radius: i64,
    },
}

fn default_radius() -> i64 {
    DEFAULT_RADIUS as i64
}

impl Operation {
    /// Name used as the output file prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackgroundSubtraction(_) => "background_subtraction",
            Self::Erode { .. } => "erode",
            Self::Dilate { .. } => "dilate",
        }
    }

    pub fn needs_reference(&self) -> bool {
        matches!(self, Self::BackgroundSubtraction(_))
    }

    /// Check parameters without touching any image.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::BackgroundSubtraction(params) => params.validate(),
            Self::Erode { radius } | Self::Dilate { radius } => validate_radius(*radius).map(|_| ()),
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackgroundSubtraction(p) => write!(
                f,
                "Background subtraction (threshold {}, {})",
                p.threshold, p.mode
            ),
            Self::Erode { radius } => write!(f, "Erode (radius {radius})"),
            Self::Dilate { radius } => write!(f, "Dilate (radius {radius})"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Worker threads for the chunked strategy. Defaults to the available
    /// parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
}

impl JobConfig {
    /// Parse a job from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| IppError::Config(e.to_string()))
    }

    /// Read and parse a TOML job file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| IppError::Config(e.to_string()))
    }

    /// Check the job is runnable: valid parameters, a reference when the
    /// operation needs one, at least one worker.
    pub fn validate(&self) -> Result<()> {
        self.operation.validate()?;
        if self.operation.needs_reference() && self.reference.is_none() {
            return Err(IppError::InvalidParameter(format!(
                "{} requires a reference image",
                self.operation.name()
            )));
        }
        if self.execution.workers == Some(0) {
            return Err(IppError::InvalidParameter(
                "worker count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
