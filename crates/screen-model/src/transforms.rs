//! Transformaciones preentrenadas previas al clasificador: estandarización
//! y selección de características. Ambas operan sobre la matriz de lotes
//! (filas = moléculas, columnas = descriptores en el orden esperado).

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Escalador estándar ajustado: `(x - mean) / scale` por columna. Una
/// entrada de `scale` igual a cero se trata como 1, el convenio de los
/// escaladores ajustados sobre columnas constantes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn feature_dim(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self, expected_dim: usize) -> Result<(), ModelError> {
        if self.mean.len() != self.scale.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.len() != expected_dim {
            return Err(ModelError::DimensionMismatch {
                expected: expected_dim,
                got: self.mean.len(),
            });
        }
        Ok(())
    }

    /// Estandariza la matriz in situ.
    pub fn transform(&self, matrix: &mut Array2<f64>) -> Result<(), ModelError> {
        if matrix.ncols() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                got: matrix.ncols(),
            });
        }
        for mut row in matrix.axis_iter_mut(Axis(0)) {
            for (j, x) in row.iter_mut().enumerate() {
                let scale = if self.scale[j] == 0.0 { 1.0 } else { self.scale[j] };
                *x = (*x - self.mean[j]) / scale;
            }
        }
        Ok(())
    }
}

/// Máscara booleana de soporte sobre el orden esperado de descriptores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSelector {
    pub support: Vec<bool>,
}

impl FeatureSelector {
    /// Columnas que sobreviven a la selección.
    pub fn selected_count(&self) -> usize {
        self.support.iter().filter(|&&s| s).count()
    }

    pub fn validate(&self, expected_dim: usize) -> Result<(), ModelError> {
        if self.support.len() != expected_dim {
            return Err(ModelError::DimensionMismatch {
                expected: expected_dim,
                got: self.support.len(),
            });
        }
        if self.selected_count() == 0 {
            return Err(ModelError::InvalidArtifact("selector keeps no features".to_string()));
        }
        Ok(())
    }

    /// Proyecta la matriz sobre las columnas seleccionadas.
    pub fn apply(&self, matrix: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        if matrix.ncols() != self.support.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.support.len(),
                got: matrix.ncols(),
            });
        }
        let keep: Vec<usize> = self
            .support
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s)
            .map(|(j, _)| j)
            .collect();
        let mut out = Array2::zeros((matrix.nrows(), keep.len()));
        for (oj, &j) in keep.iter().enumerate() {
            out.column_mut(oj).assign(&matrix.column(j));
        }
        Ok(out)
    }
}
