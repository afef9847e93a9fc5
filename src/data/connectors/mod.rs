mod loader;
mod types;
mod validator;

pub use loader::FeatureLoader;
pub use types::{FeatureColumn, SourceFormat};
pub use validator::DataValidator;
