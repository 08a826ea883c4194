//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Variable de entorno con el directorio de artefactos preentrenados.
pub const ARTIFACTS_DIR_VAR: &str = "LDHA_ARTIFACTS_DIR";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Configuración global de la aplicación (extensible para más secciones).
pub struct AppConfig {
    /// Directorio del que se cargan los cuatro artefactos del modelo.
    pub artifacts_dir: PathBuf,
}

impl AppConfig {
    /// Lee la configuración del entorno, con valores por defecto.
    pub fn from_env() -> Self {
        let artifacts_dir = env::var(ARTIFACTS_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        AppConfig { artifacts_dir }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directory_when_var_is_unset() {
        // No tocamos el entorno del proceso de test; sólo comprobamos el
        // valor por defecto cuando la variable no está definida.
        if env::var(ARTIFACTS_DIR_VAR).is_err() {
            let cfg = AppConfig::from_env();
            assert_eq!(cfg.artifacts_dir, PathBuf::from("artifacts"));
        }
    }
}
