//! Presentación de resultados: tabla de texto y exportación CSV.
//!
//! El redondeo de presentación es fijo: probabilidad, QED y logP a 3
//! decimales; MW y TPSA a 1. El CSV exporta exactamente esos valores; el
//! escritor entrecomilla sólo los campos que lo requieren (RFC 4180).

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use screen_chem::DruglikenessMetrics;
use screen_model::InferenceResult;

/// Nombre por defecto del fichero exportado.
pub const EXPORT_FILE: &str = "ldha_predictions.csv";

const CSV_HEADER: [&str; 8] =
    ["SMILES", "LDHA_Prob", "Prediction", "QED", "LogP", "MW", "TPSA", "RO5_Violations"];

/// Fila de resultado: SMILES superviviente + predicción + métricas, unidas
/// posicionalmente (1:1 con el orden de entrada).
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub smiles: String,
    pub inference: InferenceResult,
    pub metrics: DruglikenessMetrics,
}

/// Tabla de un lote completado, con metadatos de ejecución. No persiste
/// más allá de la interacción.
#[derive(Debug, Clone)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
    pub run_id: Uuid,
    pub finished_at: DateTime<Utc>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        ResultTable { rows, run_id: Uuid::new_v4(), finished_at: Utc::now() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tabla de ancho fijo para stdout.
    pub fn render(&self) -> String {
        let smiles_width =
            self.rows.iter().map(|r| r.smiles.len()).chain([6]).max().unwrap_or(6);
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<smiles_width$}  {:>9}  {:<10}  {:>6}  {:>7}  {:>7}  {:>6}  {:>3}",
            "SMILES", "LDHA_Prob", "Prediction", "QED", "LogP", "MW", "TPSA", "RO5",
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<smiles_width$}  {:>9.3}  {:<10}  {:>6.3}  {:>7.3}  {:>7.1}  {:>6.1}  {:>3}",
                row.smiles,
                row.inference.probability,
                row.inference.label.as_str(),
                row.metrics.qed,
                row.metrics.logp,
                row.metrics.mw,
                row.metrics.tpsa,
                row.metrics.ro5_violations,
            );
        }
        out
    }

    /// CSV completo con cabecera, al redondeo de presentación.
    pub fn to_csv(&self) -> io::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER).map_err(into_io_error)?;
        for row in &self.rows {
            writer
                .write_record([
                    row.smiles.clone(),
                    format!("{:.3}", row.inference.probability),
                    row.inference.label.as_str().to_string(),
                    format!("{:.3}", row.metrics.qed),
                    format!("{:.3}", row.metrics.logp),
                    format!("{:.1}", row.metrics.mw),
                    format!("{:.1}", row.metrics.tpsa),
                    row.metrics.ro5_violations.to_string(),
                ])
                .map_err(into_io_error)?;
        }
        let bytes = writer.into_inner().map_err(into_io_error)?;
        String::from_utf8(bytes).map_err(into_io_error)
    }

    pub fn write_csv(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_csv()?)
    }
}

fn into_io_error<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::Other, e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use screen_model::{ActivityLabel, InferenceResult};

    fn row(smiles: &str, probability: f64) -> ResultRow {
        ResultRow {
            smiles: smiles.to_string(),
            inference: InferenceResult {
                label: if probability >= 0.5 { ActivityLabel::Active } else { ActivityLabel::Inactive },
                probability,
            },
            metrics: DruglikenessMetrics {
                mw: 46.069,
                logp: -0.0014,
                qed: 0.4068,
                tpsa: 20.23,
                ro5_violations: 0,
            },
        }
    }

    #[test]
    fn csv_has_exact_header_and_rounding() {
        let table = ResultTable::new(vec![row("CCO", 0.8808)]);
        let csv = table.to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "SMILES,LDHA_Prob,Prediction,QED,LogP,MW,TPSA,RO5_Violations"
        );
        assert_eq!(lines.next().unwrap(), "CCO,0.881,Active,0.407,-0.001,46.1,20.2,0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn smiles_with_comma_is_quoted() {
        // No es un SMILES válido, pero el formateador no debe asumirlo.
        let table = ResultTable::new(vec![row("C,C", 0.2)]);
        let csv = table.to_csv().unwrap();
        assert!(csv.contains("\"C,C\",0.200,Inactive"));
    }

    #[test]
    fn quotes_are_doubled() {
        let table = ResultTable::new(vec![row("a\"b", 0.2)]);
        let csv = table.to_csv().unwrap();
        assert!(csv.contains("\"a\"\"b\",0.200"));
        // Un campo sin delimitadores queda sin entrecomillar.
        let plain = ResultTable::new(vec![row("CCO", 0.2)]).to_csv().unwrap();
        assert!(plain.contains("\nCCO,0.200"));
    }

    #[test]
    fn render_contains_all_columns() {
        let table = ResultTable::new(vec![row("CCO", 0.8808)]);
        let text = table.render();
        for needle in ["SMILES", "LDHA_Prob", "Prediction", "QED", "LogP", "MW", "TPSA", "RO5"] {
            assert!(text.contains(needle), "missing {needle}");
        }
        assert!(text.contains("0.881"));
        assert!(text.contains("46.1"));
    }

    #[test]
    fn empty_table_is_header_only() {
        let table = ResultTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.to_csv().unwrap().lines().count(), 1);
    }
}
