//! Project files.
//!
//! A file is a JSON envelope `{ version, project, app_version }`. Files
//! written before the envelope existed hold a bare project and load as
//! version 0.

use reelgen_core::{ReelgenError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::project::Project;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: u32,
    pub project: Project,
    /// Version of the editor that wrote the file.
    #[serde(default)]
    pub app_version: String,
}

/// Just enough of a file to pick a decoder.
#[derive(Deserialize)]
struct Envelope {
    version: Option<u32>,
}

fn unreadable(e: serde_json::Error) -> ReelgenError {
    ReelgenError::Serialization(format!("Unreadable project file: {e}"))
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            ReelgenError::Serialization(format!(
                "Cannot encode project {:?}: {e}",
                self.project.title
            ))
        })
    }

    /// Decode a file of any supported version.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(data).map_err(unreadable)?;
        match envelope.version {
            None => {
                let project: Project = serde_json::from_slice(data).map_err(unreadable)?;
                info!("Upgrading unversioned project {:?}", project.title);
                Ok(Self::new(project))
            }
            Some(v) if v > CURRENT_VERSION => Err(ReelgenError::Serialization(format!(
                "Project file version {v} is newer than supported version {CURRENT_VERSION}"
            ))),
            Some(_) => serde_json::from_slice(data).map_err(unreadable),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        debug!("Saved project {:?} to {:?}", self.project.title, path);
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read(path)?)
    }
}
