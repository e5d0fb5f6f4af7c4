use tracing::{debug, warn};

use crate::store::{reduce, AppState, Command, StoreError};

/// Owns the current snapshot and applies commands to it one at a time.
///
/// A failed command leaves the snapshot and revision untouched.
pub struct Coordinator {
    state: AppState,
    revision: u64,
}

impl Coordinator {
    pub fn new(state: AppState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of commands applied successfully so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, command: Command) -> Result<&AppState, StoreError> {
        debug!("Dispatching {:?}", command);

        match reduce(&self.state, command) {
            Ok(next) => {
                self.state = next;
                self.revision += 1;
                Ok(&self.state)
            }
            Err(e) => {
                warn!("Command rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn into_state(self) -> AppState {
        self.state
    }
}
