//! GIS (GDAL) capability check.
//!
//! Probed once at startup and kept in `AppState`. A missing GDAL installation is not
//! fatal; features that need it can check `GisSupport::is_available`.
use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;

use crate::config::GisProbe;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GisSupport {
    Available { version: String },
    Unavailable { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GisProbeError {
    #[error("probe disabled")]
    Disabled,
    #[error("{bin} not found")]
    NotFound { bin: String },
    #[error("failed to run {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{bin} exited with {status}")]
    Failed { bin: String, status: std::process::ExitStatus },
    #[error("{bin} timed out")]
    Timeout { bin: String },
    #[error("unrecognized version output: {0:?}")]
    UnrecognizedOutput(String),
}

impl GisSupport {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    pub async fn probe(probe: &GisProbe) -> Self {
        match run_probe(probe).await {
            Ok(version) => {
                tracing::info!(%version, "GDAL available");
                Self::Available { version }
            }
            Err(err) => {
                tracing::warn!(error = %err, "GDAL unavailable; GIS features disabled");
                Self::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

async fn run_probe(probe: &GisProbe) -> Result<String, GisProbeError> {
    let bin = match probe {
        GisProbe::Disabled => return Err(GisProbeError::Disabled),
        GisProbe::Enabled { gdalinfo_bin } => gdalinfo_bin.clone(),
    };

    let output = tokio::time::timeout(
        PROBE_TIMEOUT,
        Command::new(&bin).arg("--version").kill_on_drop(true).output(),
    )
    .await
    .map_err(|_| GisProbeError::Timeout { bin: bin.clone() })?
    .map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => GisProbeError::NotFound { bin: bin.clone() },
        _ => GisProbeError::Spawn {
            bin: bin.clone(),
            source,
        },
    })?;

    if !output.status.success() {
        return Err(GisProbeError::Failed {
            bin,
            status: output.status,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_gdal_version(&stdout)
        .ok_or_else(|| GisProbeError::UnrecognizedOutput(stdout.trim().to_string()))
}

/// `GDAL 3.8.4, released 2024/02/08` → `3.8.4`
pub fn parse_gdal_version(output: &str) -> Option<String> {
    let rest = output.trim().strip_prefix("GDAL ")?;
    let version = rest.split(',').next()?.trim();

    if version.starts_with(|c: char| c.is_ascii_digit()) {
        Some(version.to_string())
    } else {
        None
    }
}
