use crate::utils::error::{Result, RoadmapError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Callers that currently have a roadmap request in flight.
///
/// This only suppresses duplicate submissions; the pipeline does not depend on it.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    callers: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, caller: &str) -> Result<InFlightGuard> {
        let mut callers = self
            .callers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !callers.insert(caller.to_string()) {
            return Err(RoadmapError::AlreadyInProgress {
                caller: caller.to_string(),
            });
        }
        Ok(InFlightGuard {
            callers: Arc::clone(&self.callers),
            caller: caller.to_string(),
        })
    }
}

/// Clears the caller's in-flight flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    callers: Arc<Mutex<HashSet<String>>>,
    caller: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut callers = self
            .callers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        callers.remove(&self.caller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_submission_rejected_until_released() {
        let registry = InFlightRegistry::new();

        let guard = registry.try_begin("alice").unwrap();
        assert!(matches!(
            registry.try_begin("alice"),
            Err(RoadmapError::AlreadyInProgress { .. })
        ));

        // Other callers are unaffected.
        let _bob = registry.try_begin("bob").unwrap();

        drop(guard);
        assert!(registry.try_begin("alice").is_ok());
    }
}
