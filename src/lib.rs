pub mod config;
pub mod error;
pub mod generator;
pub mod mask;

pub use config::GeneratorConfig;
pub use error::IconError;
pub use generator::{generate, IconAssetGenerator};
