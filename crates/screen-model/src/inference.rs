//! Alineación de características e inferencia por lotes.
//!
//! La etapa es estricta: un descriptor esperado que no aparezca en el
//! registro calculado aborta el lote entero. El motor de descriptores ya
//! rellenó con ceros lo no computable, así que un nombre ausente aquí es un
//! desajuste de esquema entre artefactos y motor, no un fallo numérico.

use ndarray::{Array2, Axis};
use screen_chem::DescriptorRecord;
use serde::Serialize;

use crate::artifacts::PretrainedArtifacts;
use crate::errors::ModelError;

/// Etiqueta de actividad del clasificador binario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityLabel {
    Active,
    Inactive,
}

impl ActivityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLabel::Active => "Active",
            ActivityLabel::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado por molécula: etiqueta y probabilidad de clase 1.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    pub label: ActivityLabel,
    pub probability: f64,
}

/// Reindexa cada registro al orden esperado por los artefactos. Los nombres
/// sobrantes del registro se descartan; uno ausente es error duro.
pub fn align_records(
    expected_names: &[String],
    records: &[DescriptorRecord],
) -> Result<Array2<f64>, ModelError> {
    let mut matrix = Array2::zeros((records.len(), expected_names.len()));
    for (i, record) in records.iter().enumerate() {
        for (j, name) in expected_names.iter().enumerate() {
            let value = record
                .get(name)
                .copied()
                .ok_or_else(|| ModelError::MissingDescriptor(name.clone()))?;
            matrix[[i, j]] = value;
        }
    }
    Ok(matrix)
}

/// Pipeline de inferencia completo: alineación → escalado → selección →
/// clasificador. Orden de filas = orden de registros de entrada; cualquier
/// fallo descarta el lote completo.
pub fn predict_batch(
    artifacts: &PretrainedArtifacts,
    records: &[DescriptorRecord],
) -> Result<Vec<InferenceResult>, ModelError> {
    let mut matrix = align_records(&artifacts.descriptor_names, records)?;
    artifacts.scaler.transform(&mut matrix)?;
    let selected = artifacts.selector.apply(&matrix)?;

    let mut results = Vec::with_capacity(selected.nrows());
    for row in selected.axis_iter(Axis(0)) {
        let row: Vec<f64> = row.iter().copied().collect();
        let probability = artifacts.classifier.predict_probability(&row)?;
        let label = if probability >= 0.5 { ActivityLabel::Active } else { ActivityLabel::Inactive };
        results.push(InferenceResult { label, probability });
    }
    Ok(results)
}
