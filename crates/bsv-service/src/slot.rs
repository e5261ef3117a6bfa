use std::sync::{Arc, RwLock};

use bsv_exchange::Exchange;

/// Single, swappable reference to the attached exchange.
///
/// The lock guards only the `Option<Arc<_>>` itself and is released before
/// any exchange call starts. Callers take a [`snapshot`](Self::snapshot) at
/// the start of their exchange-dependent step and use that reference for the
/// rest of the call, so a concurrent attach or detach is never observed
/// halfway.
#[derive(Default)]
pub struct ExchangeSlot {
    current: RwLock<Option<Arc<dyn Exchange>>>,
}

impl ExchangeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `exchange`, returning whatever was attached before.
    pub fn set(&self, exchange: Arc<dyn Exchange>) -> Option<Arc<dyn Exchange>> {
        self.current
            .write()
            .expect("exchange slot poisoned")
            .replace(exchange)
    }

    /// Detach the current exchange, if any.
    pub fn clear(&self) -> Option<Arc<dyn Exchange>> {
        self.current.write().expect("exchange slot poisoned").take()
    }

    pub fn is_set(&self) -> bool {
        self.current.read().expect("exchange slot poisoned").is_some()
    }

    /// The exchange attached right now.
    pub fn snapshot(&self) -> Option<Arc<dyn Exchange>> {
        self.current.read().expect("exchange slot poisoned").clone()
    }
}

impl std::fmt::Debug for ExchangeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.snapshot().map(|e| e.name().to_string());
        f.debug_struct("ExchangeSlot").field("attached", &name).finish()
    }
}
