//! Serde configuration records with defaults and YAML loading.

mod loader;
mod mesh;
mod optimizer;
mod vlm;

pub use loader::{from_yaml_file, from_yaml_str, Validate};
pub use mesh::MeshConfig;
pub use optimizer::OptiConfig;
pub use vlm::VlmConfig;
