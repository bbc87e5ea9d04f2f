// Audio context - Two-phase, memoized initialization
// The audio device may only be opened after a user gesture, and every
// caller racing to open it must share the same attempt.

use super::AudioError;
use log::{debug, info, warn};
use std::future::Future;
use tokio::sync::OnceCell;

/// Lazily initialized audio context
///
/// Starts uninitialized. The first call to [`get_or_init`] runs the
/// initializer; callers arriving while it is in flight await that same
/// attempt instead of starting another. A failed attempt leaves the cell
/// uninitialized so a later gesture can retry.
///
/// [`get_or_init`]: AudioContextCell::get_or_init
pub struct AudioContextCell<C> {
    cell: OnceCell<C>,
}

impl<C> AudioContextCell<C> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Whether initialization has completed
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// The context, if initialization has completed
    pub fn get(&self) -> Result<&C, AudioError> {
        self.cell.get().ok_or(AudioError::NotInitialized)
    }

    /// Initialize once, or wait for the in-flight initialization
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<&C, AudioError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, AudioError>>,
    {
        if let Some(context) = self.cell.get() {
            return Ok(context);
        }

        debug!("audio context not ready, initializing");
        let result = self.cell.get_or_try_init(init).await;
        match &result {
            Ok(_) => info!("audio context initialized"),
            Err(e) => warn!("{}", e),
        }
        result
    }

    /// Tear down the context, returning it to the uninitialized state
    pub fn dispose(&mut self) -> Option<C> {
        self.cell.take()
    }
}

impl<C> Default for AudioContextCell<C> {
    fn default() -> Self {
        Self::new()
    }
}
