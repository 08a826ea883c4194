// screen-chem library entry point
pub mod descriptors;
pub mod druglikeness;
pub mod properties;

pub use descriptors::{compute_descriptor_batch, compute_descriptors, descriptor_names, DescriptorRecord};
pub use druglikeness::{druglikeness_metrics, DruglikenessMetrics};
