pub mod calculator;
pub mod currency;

// Re-exports
pub use calculator::*;
pub use currency::*;
