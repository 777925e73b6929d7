use crate::default_slicer::DefaultSlicer;
use crate::index_slicer::LayersIndexSlicer;
use crate::SliceError;
use bootslice_schema::{LayerName, Metadata};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// An ordered bucket of application-relative file paths destined for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub name: LayerName,
    pub paths: Vec<String>,
}

impl Slice {
    pub fn new(name: impl Into<LayerName>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
        }
    }

    pub fn with_paths<I, S>(name: impl Into<LayerName>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub type Slices = Vec<Slice>;

/// Partitions an application tree into ordered slices.
///
/// Each call performs one full walk and returns either every slice or an error.
pub trait Slicer {
    fn slice(&self) -> Result<Slices, SliceError>;
}

/// The slicer bound for a build, chosen once from the application metadata.
#[derive(Debug)]
pub enum AnySlicer {
    Default(DefaultSlicer),
    LayersIndex(LayersIndexSlicer),
}

impl AnySlicer {
    /// Bind the layers-index slicer when the metadata names an index, the
    /// default slicer otherwise.
    pub fn for_metadata(application_root: &Path, metadata: &Metadata) -> Result<Self, SliceError> {
        match metadata.layers_index.as_deref().filter(|p| !p.is_empty()) {
            Some(index) => {
                debug!("slicing by layers index {index}");
                Ok(Self::LayersIndex(LayersIndexSlicer::new(
                    application_root,
                    index,
                )?))
            }
            None => {
                debug!("slicing with default buckets");
                Ok(Self::Default(DefaultSlicer::new(
                    application_root,
                    metadata.clone(),
                )))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Default(_) => "default",
            Self::LayersIndex(_) => "layers-index",
        }
    }
}

impl Slicer for AnySlicer {
    fn slice(&self) -> Result<Slices, SliceError> {
        match self {
            Self::Default(s) => s.slice(),
            Self::LayersIndex(s) => s.slice(),
        }
    }
}
