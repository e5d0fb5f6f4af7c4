pub mod config;
pub mod formatting;
pub mod validation;

// Re-exports
pub use config::*;
pub use validation::*;
