//! Shared Tokio runtime helper for behavioural tests.

use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;

/// Runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<Runtime>);

impl SharedRuntime {
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Returns the scenario runtime, creating it on first use.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created.
pub fn ensure_runtime(slot: &Slot<SharedRuntime>) -> Result<SharedRuntime, io::Error> {
    if let Some(runtime) = slot.get() {
        return Ok(runtime);
    }
    let runtime = SharedRuntime(Rc::new(Runtime::new()?));
    slot.set(runtime.clone());
    Ok(runtime)
}
