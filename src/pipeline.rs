//! Pipeline de lote: validación → parseo → descriptores → inferencia +
//! drug-likeness → tabla. Una interacción completa del usuario es una sola
//! llamada síncrona a `run_batch`; no hay estado intermedio visible.

use screen_chem::{compute_descriptor_batch, druglikeness_metrics};
use screen_domain::parse_batch;
use screen_model::{predict_batch, PretrainedArtifacts};

use crate::presenter::{ResultRow, ResultTable};

/// Desenlace de una interacción. O hay tabla completa o no hay nada: un
/// fallo en mitad del lote lo descarta entero.
#[derive(Debug)]
pub enum RunOutcome {
    /// Envío vacío o sólo espacios en blanco.
    EmptyInput,
    /// Había líneas pero ninguna parseó como SMILES.
    NoValidInput,
    /// Fallo de cálculo del lote; mensaje agregado para el usuario.
    Failed(String),
    /// Tabla lista, una fila por estructura válida en orden de entrada.
    Ready(ResultTable),
}

/// Ejecuta un lote completo sobre los artefactos cargados.
pub fn run_batch(artifacts: &PretrainedArtifacts, input: &str) -> RunOutcome {
    if input.trim().is_empty() {
        return RunOutcome::EmptyInput;
    }

    let (smiles, molecules) = parse_batch(input);
    if molecules.is_empty() {
        return RunOutcome::NoValidInput;
    }

    let records = compute_descriptor_batch(&molecules);
    let inferences = match predict_batch(artifacts, &records) {
        Ok(results) => results,
        Err(e) => return RunOutcome::Failed(e.to_string()),
    };

    let rows = smiles
        .into_iter()
        .zip(molecules.iter())
        .zip(inferences)
        .map(|((smiles, mol), inference)| ResultRow {
            smiles,
            inference,
            metrics: druglikeness_metrics(mol),
        })
        .collect();

    RunOutcome::Ready(ResultTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_chem::descriptor_names;
    use screen_model::artifacts::PretrainedArtifacts;
    use screen_model::classifier::{DecisionTree, GbdtClassifier, TreeNode};
    use screen_model::transforms::{FeatureSelector, StandardScaler};
    use screen_model::ActivityLabel;

    /// Artefactos sintéticos sobre el conjunto real de nombres del motor:
    /// escalado identidad, selección de MolWt y un tocón con umbral 70
    /// (etanol queda por debajo, fenol por encima).
    fn toy_artifacts() -> PretrainedArtifacts {
        let names = descriptor_names();
        let dim = names.len();
        let molwt = names.iter().position(|n| n == "MolWt").unwrap();
        let mut support = vec![false; dim];
        support[molwt] = true;

        PretrainedArtifacts {
            classifier: GbdtClassifier {
                base_score: 0.0,
                trees: vec![DecisionTree {
                    nodes: vec![
                        TreeNode {
                            feature: Some(0),
                            threshold: Some(70.0),
                            left: Some(1),
                            right: Some(2),
                            value: None,
                        },
                        TreeNode {
                            feature: None,
                            threshold: None,
                            left: None,
                            right: None,
                            value: Some(2.0),
                        },
                        TreeNode {
                            feature: None,
                            threshold: None,
                            left: None,
                            right: None,
                            value: Some(-2.0),
                        },
                    ],
                }],
            },
            scaler: StandardScaler { mean: vec![0.0; dim], scale: vec![1.0; dim] },
            selector: FeatureSelector { support },
            descriptor_names: names,
        }
    }

    #[test]
    fn mixed_batch_keeps_only_valid_rows_in_order() {
        let artifacts = toy_artifacts();
        match run_batch(&artifacts, "CCO\nnotasmiles\nc1ccccc1O\n") {
            RunOutcome::Ready(table) => {
                assert_eq!(table.len(), 2);
                assert_eq!(table.rows[0].smiles, "CCO");
                assert_eq!(table.rows[1].smiles, "c1ccccc1O");
                // MW 46 < 70 < 94
                assert_eq!(table.rows[0].inference.label, ActivityLabel::Active);
                assert_eq!(table.rows[1].inference.label, ActivityLabel::Inactive);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn empty_submission_short_circuits() {
        let artifacts = toy_artifacts();
        assert!(matches!(run_batch(&artifacts, ""), RunOutcome::EmptyInput));
        assert!(matches!(run_batch(&artifacts, "  \n\t\n"), RunOutcome::EmptyInput));
    }

    #[test]
    fn invalid_only_input_stops_before_inference() {
        let artifacts = toy_artifacts();
        assert!(matches!(
            run_batch(&artifacts, "notasmiles\nxyz\n"),
            RunOutcome::NoValidInput
        ));
    }

    #[test]
    fn schema_mismatch_fails_the_whole_batch() {
        let mut artifacts = toy_artifacts();
        artifacts.descriptor_names.push("NotAComputedName".to_string());
        artifacts.scaler.mean.push(0.0);
        artifacts.scaler.scale.push(1.0);
        artifacts.selector.support.push(false);
        match run_batch(&artifacts, "CCO\n") {
            RunOutcome::Failed(msg) => assert!(msg.contains("NotAComputedName")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn run_is_idempotent_modulo_metadata() {
        let artifacts = toy_artifacts();
        let a = run_batch(&artifacts, "CCO\nc1ccccc1O\n");
        let b = run_batch(&artifacts, "CCO\nc1ccccc1O\n");
        match (a, b) {
            (RunOutcome::Ready(ta), RunOutcome::Ready(tb)) => {
                assert_eq!(ta.to_csv().unwrap(), tb.to_csv().unwrap());
            }
            other => panic!("expected two Ready outcomes, got {other:?}"),
        }
    }

    #[test]
    fn ethanol_metrics_scenario() {
        let artifacts = toy_artifacts();
        match run_batch(&artifacts, "CCO") {
            RunOutcome::Ready(table) => {
                let m = &table.rows[0].metrics;
                assert!((m.mw - 46.07).abs() < 0.1);
                assert_eq!(m.ro5_violations, 0);
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }
}
