use parking_lot::Mutex;
use physics::Thrust;
use std::sync::Arc;

/// Pending thrust for the manually controlled body.
///
/// Clones share one slot. Writers overwrite whatever is pending; the world
/// takes the value exactly once at the start of its next step.
#[derive(Clone, Debug, Default)]
pub struct InputHandle {
    pending: Arc<Mutex<Option<Thrust>>>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, action: Thrust) {
        *self.pending.lock() = Some(action);
    }

    /// Reads and clears the pending input.
    pub fn take(&self) -> Option<Thrust> {
        self.pending.lock().take()
    }

    pub fn peek(&self) -> Option<Thrust> {
        *self.pending.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_and_take_clears() {
        let handle = InputHandle::new();
        let remote = handle.clone();
        remote.set(Thrust::Forward);
        handle.set(Thrust::Reverse);
        assert_eq!(remote.peek(), Some(Thrust::Reverse));
        assert_eq!(handle.take(), Some(Thrust::Reverse));
        assert_eq!(remote.take(), None);
    }
}
