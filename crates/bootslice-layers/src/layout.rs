use crate::SliceError;
use std::fs;
use std::path::{Path, PathBuf};

const LAUNCH_FILE: &str = "launch.toml";
const PLAN_FILE: &str = "plan.toml";

/// Directory layout of the build output that receives layer contributions.
///
/// ```text
/// <root>/<layer>.toml          layer flags, digest, and metadata
/// <root>/<layer>/env/<VAR>.*   environment modifications for the layer
/// <root>/<layer>/env.launch/*  modifications applied at launch only
/// <root>/launch.toml           processes and slices
/// <root>/plan.toml             build plan entry with dependencies
/// ```
#[derive(Debug, Clone)]
pub struct LayersLayout {
    root: PathBuf,
}

impl LayersLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn layer_metadata_file(&self, layer: &str) -> PathBuf {
        self.root.join(format!("{layer}.toml"))
    }

    #[inline]
    pub fn layer_dir(&self, layer: &str) -> PathBuf {
        self.root.join(layer)
    }

    #[inline]
    pub fn env_dir(&self, layer: &str) -> PathBuf {
        self.layer_dir(layer).join("env")
    }

    #[inline]
    pub fn launch_env_dir(&self, layer: &str) -> PathBuf {
        self.layer_dir(layer).join("env.launch")
    }

    #[inline]
    pub fn launch_file(&self) -> PathBuf {
        self.root.join(LAUNCH_FILE)
    }

    #[inline]
    pub fn plan_file(&self) -> PathBuf {
        self.root.join(PLAN_FILE)
    }

    pub fn initialize(&self) -> Result<(), SliceError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}
