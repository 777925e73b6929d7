use crate::layout::LayersLayout;
use crate::slicer::Slice;
use crate::{fsync_dir, SliceError};
use bootslice_schema::JarDependency;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A layer's flags and metadata, persisted as `<layer>.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerContribution {
    #[serde(default)]
    pub launch: bool,
    #[serde(default)]
    pub build: bool,
    #[serde(default)]
    pub cache: bool,
    /// blake3 digest of the canonical JSON of `metadata`. `None` until written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contribution_digest: Option<String>,
    #[serde(default)]
    pub metadata: toml::Table,
}

impl LayerContribution {
    pub fn new(metadata: &impl Serialize) -> Result<Self, SliceError> {
        Ok(Self {
            metadata: to_table(metadata)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_flags(mut self, launch: bool, build: bool, cache: bool) -> Self {
        self.launch = launch;
        self.build = build;
        self.cache = cache;
        self
    }

    pub fn compute_digest(&self) -> Result<String, SliceError> {
        let json = serde_json::to_string(&self.metadata)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
}

impl Process {
    pub fn new(kind: &str, command: &str) -> Self {
        Self {
            kind: kind.to_owned(),
            command: command.to_owned(),
        }
    }
}

/// Launch-time processes and the slices of the application image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub slices: Vec<Slice>,
}

/// Build plan entry handed to later build steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub name: String,
    #[serde(default)]
    pub metadata: toml::Table,
    #[serde(default)]
    pub dependencies: Vec<JarDependency>,
}

impl BuildPlan {
    pub fn new(
        name: &str,
        metadata: &impl Serialize,
        dependencies: Vec<JarDependency>,
    ) -> Result<Self, SliceError> {
        Ok(Self {
            name: name.to_owned(),
            metadata: to_table(metadata)?,
            dependencies,
        })
    }
}

fn to_table(value: &impl Serialize) -> Result<toml::Table, SliceError> {
    match toml::Value::try_from(value)? {
        toml::Value::Table(table) => Ok(table),
        other => {
            let mut table = toml::Table::new();
            table.insert("value".to_owned(), other);
            Ok(table)
        }
    }
}

/// Writes layer output files under a [`LayersLayout`].
///
/// Every file is written to a temporary sibling and renamed into place, so a
/// reader sees either the previous content or the complete new content.
pub struct LayerWriter {
    layout: LayersLayout,
}

impl LayerWriter {
    pub fn new(layout: LayersLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayersLayout {
        &self.layout
    }

    /// Persist a layer contribution. Returns `false` without touching disk
    /// when the stored contribution already has the same digest and flags.
    pub fn write_layer(
        &self,
        layer: &str,
        contribution: &LayerContribution,
    ) -> Result<bool, SliceError> {
        let mut stamped = contribution.clone();
        stamped.contribution_digest = Some(contribution.compute_digest()?);

        if let Some(existing) = self.read_layer(layer)? {
            if existing == stamped {
                debug!("layer {layer} unchanged, reusing");
                return Ok(false);
            }
        }

        let content = toml::to_string(&stamped)?;
        self.layout.initialize()?;
        write_atomic(
            self.layout.root(),
            &self.layout.layer_metadata_file(layer),
            content.as_bytes(),
        )?;
        debug!("wrote layer metadata for {layer}");
        Ok(true)
    }

    pub fn read_layer(&self, layer: &str) -> Result<Option<LayerContribution>, SliceError> {
        let path = self.layout.layer_metadata_file(layer);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    /// Record that `value` is appended to `var` at build and launch, joined by `delim`.
    pub fn write_env_append(
        &self,
        layer: &str,
        var: &str,
        value: &str,
        delim: &str,
    ) -> Result<(), SliceError> {
        append_env(&self.layout.env_dir(layer), var, value, delim)
    }

    /// Like [`write_env_append`](Self::write_env_append), applied at launch only.
    pub fn write_launch_env_append(
        &self,
        layer: &str,
        var: &str,
        value: &str,
        delim: &str,
    ) -> Result<(), SliceError> {
        append_env(&self.layout.launch_env_dir(layer), var, value, delim)
    }

    pub fn write_launch(&self, launch: &LaunchMetadata) -> Result<PathBuf, SliceError> {
        let content = toml::to_string(launch)?;
        let dest = self.layout.launch_file();
        self.layout.initialize()?;
        write_atomic(self.layout.root(), &dest, content.as_bytes())?;
        Ok(dest)
    }

    pub fn read_launch(&self) -> Result<Option<LaunchMetadata>, SliceError> {
        let path = self.layout.launch_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn write_plan(&self, plan: &BuildPlan) -> Result<PathBuf, SliceError> {
        let content = toml::to_string(plan)?;
        let dest = self.layout.plan_file();
        self.layout.initialize()?;
        write_atomic(self.layout.root(), &dest, content.as_bytes())?;
        Ok(dest)
    }

    pub fn read_plan(&self) -> Result<Option<BuildPlan>, SliceError> {
        let path = self.layout.plan_file();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(toml::from_str(&content)?))
    }
}

fn append_env(env_dir: &Path, var: &str, value: &str, delim: &str) -> Result<(), SliceError> {
    fs::create_dir_all(env_dir)?;
    write_atomic(
        env_dir,
        &env_dir.join(format!("{var}.append")),
        value.as_bytes(),
    )?;
    write_atomic(
        env_dir,
        &env_dir.join(format!("{var}.delim")),
        delim.as_bytes(),
    )?;
    Ok(())
}

fn write_atomic(dir: &Path, dest: &Path, data: &[u8]) -> Result<(), SliceError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| SliceError::Io(e.error))?;
    fsync_dir(dir)?;
    Ok(())
}
