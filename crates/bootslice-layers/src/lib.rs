//! Application slicing and layer output for bootslice.
//!
//! This crate partitions an unpacked application tree into ordered [`Slice`]s,
//! either with the fixed five-bucket [`DefaultSlicer`] or, when the application
//! declares a layers index, with the [`LayersIndexSlicer`]. [`AnySlicer`] binds
//! one of the two from [`Metadata`](bootslice_schema::Metadata). The `output`
//! module persists layer contributions, launch metadata, and the build plan
//! under a [`LayersLayout`].

pub mod default_slicer;
pub mod index_slicer;
pub mod layers_index;
pub mod layout;
pub mod output;
pub mod slicer;
mod walk;

pub use default_slicer::{DefaultBucket, DefaultSlicer};
pub use index_slicer::LayersIndexSlicer;
pub use layers_index::{LayersIndex, DEFAULT_LAYER_NAME};
pub use layout::LayersLayout;
pub use output::{BuildPlan, LaunchMetadata, LayerContribution, LayerWriter, Process};
pub use slicer::{AnySlicer, Slice, Slicer, Slices};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fsync a directory so a preceding `rename()` into it is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum SliceError {
    #[error("failed to walk application tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("cannot read layers index {}: {source}", path.display())]
    MissingIndex {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("path is not valid UTF-8 or not under the application root: {0}")]
    InvalidPath(String),
    #[error("invalid layer path pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("layer output I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode layer TOML: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("failed to parse layer TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
