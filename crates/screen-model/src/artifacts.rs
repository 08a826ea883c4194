//! Carga de los cuatro artefactos preentrenados desde disco.
//!
//! Los artefactos son opacos para el resto del programa: se deserializan a
//! sus tipos, se validan entre sí una vez y viven inmutables lo que dure el
//! proceso. Cualquier problema aquí es fatal antes de empezar a interactuar.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::classifier::GbdtClassifier;
use crate::errors::ModelError;
use crate::transforms::{FeatureSelector, StandardScaler};

pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const SELECTOR_FILE: &str = "selector.json";
pub const DESCRIPTOR_NAMES_FILE: &str = "descriptor_names.json";

/// Los cuatro artefactos, validados y listos para inferencia.
#[derive(Debug, Clone)]
pub struct PretrainedArtifacts {
    pub classifier: GbdtClassifier,
    pub scaler: StandardScaler,
    pub selector: FeatureSelector,
    /// Orden esperado de descriptores; fija la dimensión de todo lo demás.
    pub descriptor_names: Vec<String>,
}

impl PretrainedArtifacts {
    /// Lee y valida los artefactos del directorio configurado.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ModelError> {
        let dir = dir.as_ref();
        let classifier: GbdtClassifier = read_json(&dir.join(CLASSIFIER_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let selector: FeatureSelector = read_json(&dir.join(SELECTOR_FILE))?;
        let descriptor_names: Vec<String> = read_json(&dir.join(DESCRIPTOR_NAMES_FILE))?;

        let artifacts = PretrainedArtifacts { classifier, scaler, selector, descriptor_names };
        artifacts.validate()?;
        Ok(artifacts)
    }

    /// Consistencia cruzada: dimensiones y nombres.
    fn validate(&self) -> Result<(), ModelError> {
        if self.descriptor_names.is_empty() {
            return Err(ModelError::InvalidArtifact("descriptor name list is empty".to_string()));
        }
        let mut sorted = self.descriptor_names.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.descriptor_names.len() {
            return Err(ModelError::InvalidArtifact(
                "descriptor name list contains duplicates".to_string(),
            ));
        }

        let dim = self.descriptor_names.len();
        self.scaler.validate(dim)?;
        self.selector.validate(dim)?;
        self.classifier.validate(self.selector.selected_count())?;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let text = fs::read_to_string(path).map_err(|source| ModelError::ArtifactIo {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ModelError::ArtifactFormat {
        path: path.display().to_string(),
        source,
    })
}
