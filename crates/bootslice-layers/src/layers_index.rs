use crate::SliceError;
use bootslice_schema::LayerName;
use regex::Regex;
use std::fs;
use std::path::PathBuf;

/// Layer that receives every path not claimed by a declared layer.
pub const DEFAULT_LAYER_NAME: &str = "application";

/// An ordered list of custom layer names declared by the application, with
/// the rules for mapping a file path onto one of them.
///
/// Files belonging to a named layer live under `<index dir>layers/<name>/`,
/// where the index dir is the directory part of the index file path.
#[derive(Debug, Clone)]
pub struct LayersIndex {
    application_root: PathBuf,
    index_file: Option<String>,
    index_dir: String,
    default_layer: LayerName,
    layer_path: Regex,
}

impl LayersIndex {
    /// `index_file` is relative to `application_root`; `None` or an empty
    /// string disables the index.
    pub fn new(
        application_root: impl Into<PathBuf>,
        index_file: Option<&str>,
    ) -> Result<Self, SliceError> {
        let index_file = index_file.filter(|f| !f.is_empty()).map(str::to_owned);
        let index_dir = index_file
            .as_deref()
            .map(directory_part)
            .unwrap_or_default()
            .to_owned();
        let layer_path = Regex::new(&format!(
            "^{}layers/([a-zA-Z0-9-]+)/.*$",
            regex::escape(&index_dir)
        ))?;

        Ok(Self {
            application_root: application_root.into(),
            index_file,
            index_dir,
            default_layer: LayerName::new(DEFAULT_LAYER_NAME),
            layer_path,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.index_file.is_some()
    }

    pub fn index_dir(&self) -> &str {
        &self.index_dir
    }

    pub fn default_layer(&self) -> &LayerName {
        &self.default_layer
    }

    /// Layer names in declared order, with the default layer appended when the
    /// index does not mention it. Blank lines are ignored and repeated names
    /// keep their first position.
    pub fn layer_names(&self) -> Result<Vec<LayerName>, SliceError> {
        let Some(index_file) = &self.index_file else {
            return Ok(Vec::new());
        };

        let path = self.application_root.join(index_file);
        let content = fs::read_to_string(&path)
            .map_err(|source| SliceError::MissingIndex { path, source })?;

        let mut names: Vec<LayerName> = Vec::new();
        for line in content.lines() {
            let name = line.trim();
            if name.is_empty() || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(LayerName::new(name));
        }

        if !names.contains(&self.default_layer) {
            names.push(self.default_layer.clone());
        }

        Ok(names)
    }

    /// Layer a root-relative path belongs to. Paths outside
    /// `<index dir>layers/<name>/`, or under a name missing from `known`, fall
    /// back to the default layer.
    pub fn layer_name_for_path(&self, path: &str, known: &[LayerName]) -> LayerName {
        self.layer_path
            .captures(path)
            .and_then(|caps| caps.get(1))
            .and_then(|m| known.iter().find(|n| *n == m.as_str()))
            .unwrap_or(&self.default_layer)
            .clone()
    }

    /// `classes` directory of every layer, in layer order, as absolute paths.
    pub fn layer_class_paths(&self) -> Result<Vec<PathBuf>, SliceError> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }

        let base = self.application_root.join(&self.index_dir).join("layers");
        Ok(self
            .layer_names()?
            .iter()
            .map(|name| base.join(name.as_str()).join("classes"))
            .collect())
    }
}

/// Directory portion of a `/`-separated path, keeping the trailing slash.
fn directory_part(path: &str) -> &str {
    match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    }
}
