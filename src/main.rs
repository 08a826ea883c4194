use std::io::Read;
use std::path::{Path, PathBuf};

use ldhascreen_rust::config::CONFIG;
use ldhascreen_rust::pipeline::{run_batch, RunOutcome};
use ldhascreen_rust::presenter::EXPORT_FILE;
use screen_model::PretrainedArtifacts;

fn main() {
    // Cargar .env si existe para obtener LDHA_ARTIFACTS_DIR
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        // Sin argumentos: modo interactivo, SMILES por stdin hasta EOF.
        // Los artefactos se cargan antes de leer nada: un modelo ausente o
        // corrupto aborta sin pedir entrada al usuario.
        None => {
            let artifacts = load_artifacts_or_exit();
            let input = read_stdin();
            run_and_report(&artifacts, &input, Path::new(EXPORT_FILE));
        }
        Some("descriptors") => {
            for name in screen_chem::descriptor_names() {
                println!("{name}");
            }
        }
        Some("predict") => {
            let mut input_file: Option<PathBuf> = None;
            let mut out_file: Option<PathBuf> = None;
            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--input" => {
                        i += 1;
                        if i < args.len() {
                            input_file = Some(PathBuf::from(&args[i]));
                        }
                    }
                    "--out" => {
                        i += 1;
                        if i < args.len() {
                            out_file = Some(PathBuf::from(&args[i]));
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            let Some(input_file) = input_file else {
                eprintln!("Uso: ldhascreen predict --input <FILE> [--out <FILE>]");
                std::process::exit(2);
            };
            let artifacts = load_artifacts_or_exit();
            let input = match std::fs::read_to_string(&input_file) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("cannot read {}: {e}", input_file.display());
                    std::process::exit(4);
                }
            };
            let out = out_file.unwrap_or_else(|| PathBuf::from(EXPORT_FILE));
            run_and_report(&artifacts, &input, &out);
        }
        Some(_) => {
            eprintln!("Uso: ldhascreen [predict --input <FILE> [--out <FILE>] | descriptors]");
            std::process::exit(2);
        }
    }
}

/// Carga fatal: sin los cuatro artefactos no hay nada que predecir.
fn load_artifacts_or_exit() -> PretrainedArtifacts {
    match PretrainedArtifacts::load(&CONFIG.artifacts_dir) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("cannot load model artifacts from {}: {e}", CONFIG.artifacts_dir.display());
            std::process::exit(1);
        }
    }
}

fn read_stdin() -> String {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        return String::new();
    }
    input
}

/// Ejecuta el lote y traduce el desenlace a los mensajes de usuario y
/// códigos de salida.
fn run_and_report(artifacts: &PretrainedArtifacts, input: &str, out_path: &Path) {
    match run_batch(artifacts, input) {
        RunOutcome::EmptyInput => {
            println!("Please input SMILES strings to proceed.");
        }
        RunOutcome::NoValidInput => {
            println!("No valid SMILES found.");
        }
        RunOutcome::Failed(message) => {
            eprintln!("An error occurred during prediction: {message}");
            std::process::exit(3);
        }
        RunOutcome::Ready(table) => {
            println!("{} molecules predicted.", table.len());
            print!("{}", table.render());
            if let Err(e) = table.write_csv(out_path) {
                eprintln!("cannot write {}: {e}", out_path.display());
                std::process::exit(4);
            }
            println!(
                "Saved {} (run {} at {})",
                out_path.display(),
                table.run_id,
                table.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
            );
        }
    }
}
