use crate::manifest::{parse_manifest_file, Manifest};
use crate::ManifestError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const CLASSES_KEY: &str = "Spring-Boot-Classes";
pub const LIB_KEY: &str = "Spring-Boot-Lib";
pub const START_CLASS_KEY: &str = "Start-Class";
pub const VERSION_KEY: &str = "Spring-Boot-Version";
pub const LAYERS_INDEX_KEY: &str = "Spring-Boot-Layers-Index";

pub const DEFAULT_CLASSES: &str = "BOOT-INF/classes/";
pub const DEFAULT_LIB: &str = "BOOT-INF/lib/";

/// Spring Boot application metadata, read once from the application manifest.
///
/// `class_path` is search order: the classes directory comes first, followed
/// by every jar under the lib directory in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Metadata {
    pub classes: String,
    #[serde(rename = "classpath")]
    pub class_path: Vec<PathBuf>,
    pub lib: String,
    pub start_class: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers_index: Option<String>,
}

impl Metadata {
    /// Read `META-INF/MANIFEST.MF` under `root`.
    ///
    /// Returns `Ok(None)` when the manifest carries no `Spring-Boot-Version`,
    /// i.e. the tree is not a Spring Boot application.
    pub fn from_application(root: &Path) -> Result<Option<Self>, ManifestError> {
        let manifest = parse_manifest_file(root.join(MANIFEST_PATH))?;
        Self::from_manifest(root, &manifest)
    }

    pub fn from_manifest(
        root: &Path,
        manifest: &Manifest,
    ) -> Result<Option<Self>, ManifestError> {
        let Some(version) = manifest.get_non_empty(VERSION_KEY) else {
            return Ok(None);
        };

        let start_class = manifest
            .get_non_empty(START_CLASS_KEY)
            .ok_or_else(|| ManifestError::MissingKey(START_CLASS_KEY.to_owned()))?;
        let classes = manifest
            .get_non_empty(CLASSES_KEY)
            .unwrap_or(DEFAULT_CLASSES)
            .to_owned();
        let lib = manifest
            .get_non_empty(LIB_KEY)
            .unwrap_or(DEFAULT_LIB)
            .to_owned();
        let layers_index = manifest.get_non_empty(LAYERS_INDEX_KEY).map(str::to_owned);

        let class_path = compute_class_path(root, &classes, &lib)?;

        Ok(Some(Self {
            classes,
            class_path,
            lib,
            start_class: start_class.to_owned(),
            version: version.to_owned(),
            layers_index,
        }))
    }

    pub fn has_layers_index(&self) -> bool {
        self.layers_index.as_deref().is_some_and(|p| !p.is_empty())
    }
}

fn compute_class_path(
    root: &Path,
    classes: &str,
    lib: &str,
) -> Result<Vec<PathBuf>, ManifestError> {
    let mut class_path = vec![root.join(classes.trim_end_matches('/'))];

    let lib_root = root.join(lib.trim_end_matches('/'));
    if !lib_root.is_dir() {
        return Ok(class_path);
    }

    for entry in WalkDir::new(&lib_root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path().extension().is_some_and(|ext| ext == "jar") {
            class_path.push(entry.into_path());
        }
    }

    Ok(class_path)
}
