pub mod cli;
pub mod io;
pub mod models;
pub mod pricing;
pub mod services;
pub mod store;
pub mod utils;

pub use anyhow::{Error, Result};
