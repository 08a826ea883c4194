// screen-model library entry point
pub mod artifacts;
pub mod classifier;
pub mod errors;
pub mod inference;
pub mod transforms;

pub use artifacts::PretrainedArtifacts;
pub use errors::ModelError;
pub use inference::{predict_batch, ActivityLabel, InferenceResult};
