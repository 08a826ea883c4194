//! Clasificador binario preentrenado: ensamble de árboles de decisión con
//! boosting de gradiente, serializado como arrays de nodos.
//!
//! La puntuación bruta es `base_score` más la salida de cada árbol; la
//! probabilidad de clase 1 sale de la sigmoide y la etiqueta es 1 si la
//! probabilidad llega a 0.5.

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Nodo de árbol. Un split lleva `feature`, `threshold`, `left` y `right`;
/// una hoja sólo `value`. `validate` garantiza que no hay formas mixtas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub left: Option<usize>,
    #[serde(default)]
    pub right: Option<usize>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl TreeNode {
    fn is_leaf(&self) -> bool {
        self.value.is_some()
            && self.feature.is_none()
            && self.left.is_none()
            && self.right.is_none()
    }

    fn is_split(&self) -> bool {
        self.feature.is_some()
            && self.threshold.is_some()
            && self.left.is_some()
            && self.right.is_some()
            && self.value.is_none()
    }
}

/// Árbol individual: array de nodos, raíz en el índice 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Evalúa el árbol sobre una fila de características ya seleccionadas.
    fn evaluate(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut idx = 0usize;
        loop {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| ModelError::InvalidArtifact(format!("tree node {idx} out of range")))?;
            if let Some(value) = node.value {
                return Ok(value);
            }
            let (feature, threshold, left, right) =
                match (node.feature, node.threshold, node.left, node.right) {
                    (Some(f), Some(t), Some(l), Some(r)) => (f, t, l, r),
                    _ => {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree node {idx} is neither leaf nor split"
                        )))
                    }
                };
            let x = *row.get(feature).ok_or(ModelError::DimensionMismatch {
                expected: feature + 1,
                got: row.len(),
            })?;
            idx = if x < threshold { left } else { right };
        }
    }
}

/// Ensamble completo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdtClassifier {
    pub base_score: f64,
    pub trees: Vec<DecisionTree>,
}

impl GbdtClassifier {
    /// Probabilidad de clase 1 para una fila.
    pub fn predict_probability(&self, row: &[f64]) -> Result<f64, ModelError> {
        let mut score = self.base_score;
        for tree in &self.trees {
            score += tree.evaluate(row)?;
        }
        Ok(sigmoid(score))
    }

    /// Consistencia estructural frente a la dimensión de entrada esperada.
    pub fn validate(&self, feature_dim: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("classifier has no trees".to_string()));
        }
        for (ti, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidArtifact(format!("tree {ti} has no nodes")));
            }
            for (ni, node) in tree.nodes.iter().enumerate() {
                if node.is_leaf() {
                    continue;
                }
                if !node.is_split() {
                    return Err(ModelError::InvalidArtifact(format!(
                        "tree {ti} node {ni} is neither leaf nor split"
                    )));
                }
                let feature = node.feature.unwrap_or_default();
                if feature >= feature_dim {
                    return Err(ModelError::InvalidArtifact(format!(
                        "tree {ti} node {ni} splits on feature {feature}, only {feature_dim} available"
                    )));
                }
                for child in [node.left.unwrap_or_default(), node.right.unwrap_or_default()] {
                    if child >= tree.nodes.len() {
                        return Err(ModelError::InvalidArtifact(format!(
                            "tree {ti} node {ni} points to missing child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: f64) -> TreeNode {
        TreeNode { feature: None, threshold: None, left: None, right: None, value: Some(value) }
    }

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode {
            feature: Some(feature),
            threshold: Some(threshold),
            left: Some(left),
            right: Some(right),
            value: None,
        }
    }

    fn stump() -> GbdtClassifier {
        GbdtClassifier {
            base_score: 0.0,
            trees: vec![DecisionTree { nodes: vec![split(0, 70.0, 1, 2), leaf(2.0), leaf(-2.0)] }],
        }
    }

    #[test]
    fn stump_splits_on_threshold() {
        let clf = stump();
        // x < 70 → hoja 2.0 → sigmoid(2) ≈ 0.881
        let p_low = clf.predict_probability(&[46.0]).unwrap();
        assert!((p_low - 0.8808).abs() < 1e-3);
        let p_high = clf.predict_probability(&[94.0]).unwrap();
        assert!((p_high - 0.1192).abs() < 1e-3);
    }

    #[test]
    fn base_score_shifts_probability() {
        let mut clf = stump();
        clf.base_score = 1.0;
        let p = clf.predict_probability(&[46.0]).unwrap();
        assert!((p - sigmoid(3.0)).abs() < 1e-12);
    }

    #[test]
    fn validate_accepts_stump() {
        assert!(stump().validate(1).is_ok());
    }

    #[test]
    fn validate_rejects_feature_out_of_range() {
        let clf = stump();
        assert!(matches!(clf.validate(0), Err(ModelError::InvalidArtifact(_))));
    }

    #[test]
    fn validate_rejects_mixed_node() {
        let bad = GbdtClassifier {
            base_score: 0.0,
            trees: vec![DecisionTree {
                nodes: vec![TreeNode {
                    feature: Some(0),
                    threshold: None,
                    left: None,
                    right: None,
                    value: None,
                }],
            }],
        };
        assert!(bad.validate(1).is_err());
    }

    #[test]
    fn validate_rejects_dangling_child() {
        let bad = GbdtClassifier {
            base_score: 0.0,
            trees: vec![DecisionTree { nodes: vec![split(0, 1.0, 1, 9)] }],
        };
        assert!(bad.validate(1).is_err());
    }

    #[test]
    fn sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
