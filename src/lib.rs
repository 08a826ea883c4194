//! Núcleo de la aplicación de screening: configuración, pipeline de lote y
//! presentación de resultados. La lógica química y de modelo vive en los
//! crates `screen-domain`, `screen-chem` y `screen-model`.

pub mod config;
pub mod pipeline;
pub mod presenter;
