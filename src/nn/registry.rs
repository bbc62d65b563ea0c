use std::fmt;

use anyhow::Context;
use linked_hash_map::LinkedHashMap;

use crate::core::LayerError;

use super::{FixTPooling, Layer, LayerParameter};

/// Builds a layer from its parameters.
pub type LayerCreator = fn(&LayerParameter) -> Result<Box<dyn Layer>, LayerError>;

/// A name-keyed collection of layer factories, owned by the host.
///
/// It uses [LinkedHashMap] so that [LayerRegistry::layer_types] lists the types in registration order.
#[derive(Clone, Default)]
pub struct LayerRegistry {
    creators: LinkedHashMap<String, LayerCreator>,
}

impl fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.layer_types()).finish()
    }
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every layer this crate provides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.creators.insert(
            FixTPooling::TYPE.to_owned(),
            FixTPooling::create as LayerCreator,
        );
        registry
    }

    pub fn register(
        &mut self,
        layer_type: impl Into<String>,
        creator: LayerCreator,
    ) -> Result<(), LayerError> {
        let layer_type = layer_type.into();
        if self.creators.contains_key(&layer_type) {
            return Err(LayerError::DuplicateType(layer_type));
        }
        self.creators.insert(layer_type, creator);
        Ok(())
    }

    pub fn contains(&self, layer_type: &str) -> bool {
        self.creators.contains_key(layer_type)
    }

    pub fn layer_types(&self) -> impl Iterator<Item = &str> {
        self.creators.keys().map(String::as_str)
    }

    /// Instantiate the layer named by `param.layer_type`. When `param` names its bottom and top
    /// blobs, their counts are checked against what the layer accepts.
    pub fn create(&self, param: &LayerParameter) -> Result<Box<dyn Layer>, LayerError> {
        let creator = self
            .creators
            .get(&param.layer_type)
            .ok_or_else(|| LayerError::UnknownType(param.layer_type.clone()))?;
        let layer = creator(param)?;
        if !param.bottom.is_empty() || !param.top.is_empty() {
            layer.check_blob_counts(param.bottom.len(), param.top.len())?;
        }
        log::debug!("created layer {:?} of type {}", param.name, param.layer_type);
        Ok(layer)
    }

    /// Parse a JSON layer description and instantiate it.
    pub fn create_from_json(&self, json: &str) -> anyhow::Result<Box<dyn Layer>> {
        let param: LayerParameter =
            serde_json::from_str(json).context("Failed to parse layer parameter")?;
        self.create(&param)
            .with_context(|| format!("Failed to create layer {:?}", param.name))
    }
}
