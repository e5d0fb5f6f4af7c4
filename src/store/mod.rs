pub mod command;
pub mod coordinator;
pub mod seed;
pub mod state;

pub use command::{reduce, Command, StoreError};
pub use coordinator::Coordinator;
pub use seed::seed_state;
pub use state::{AppState, StoreSettings, DEFAULT_LOW_STOCK_THRESHOLD};
