use crate::layers_index::LayersIndex;
use crate::slicer::{Slice, Slicer, Slices};
use crate::walk::for_each_relative_file;
use crate::SliceError;
use bootslice_schema::LayerName;
use std::collections::HashMap;
use std::path::PathBuf;

/// Buckets application files by the layer names declared in a layers index.
///
/// Slices are emitted in index order, one per declared name (plus the default
/// layer), including names that received no files.
#[derive(Debug, Clone)]
pub struct LayersIndexSlicer {
    application_root: PathBuf,
    layers_index: LayersIndex,
}

impl LayersIndexSlicer {
    pub fn new(application_root: impl Into<PathBuf>, index_file: &str) -> Result<Self, SliceError> {
        let application_root = application_root.into();
        let layers_index = LayersIndex::new(application_root.clone(), Some(index_file))?;
        Ok(Self {
            application_root,
            layers_index,
        })
    }

    pub fn layers_index(&self) -> &LayersIndex {
        &self.layers_index
    }
}

impl Slicer for LayersIndexSlicer {
    fn slice(&self) -> Result<Slices, SliceError> {
        let layer_names = self.layers_index.layer_names()?;

        let mut by_layer: HashMap<LayerName, Vec<String>> = HashMap::new();
        for_each_relative_file(&self.application_root, |rel| {
            let layer = self.layers_index.layer_name_for_path(&rel, &layer_names);
            by_layer.entry(layer).or_default().push(rel);
        })?;

        // Emission order comes from the index, never from the map.
        Ok(layer_names
            .into_iter()
            .map(|name| {
                let paths = by_layer.remove(&name).unwrap_or_default();
                Slice { name, paths }
            })
            .collect())
    }
}
