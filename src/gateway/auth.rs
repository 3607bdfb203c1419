use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::gateway::{AuthCallback, AuthEvent};

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    callbacks: Vec<(u64, AuthCallback)>,
}

fn lock(table: &Mutex<ListenerTable>) -> MutexGuard<'_, ListenerTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registered auth-state callbacks.
#[derive(Clone, Default)]
pub struct AuthListeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: AuthCallback) -> Subscription {
        let mut table = lock(&self.table);
        let id = table.next_id;
        table.next_id += 1;
        table.callbacks.push((id, callback));
        Subscription {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    /// Deliver `event` to every live subscriber in registration order.
    ///
    /// Callbacks must not subscribe or drop subscriptions while being called.
    pub fn emit(&self, event: &AuthEvent) {
        let mut table = lock(&self.table);
        for (_, cb) in table.callbacks.iter_mut() {
            cb(event);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.table).callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AuthListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthListeners")
            .field("len", &self.len())
            .finish()
    }
}

/// Handle for one auth callback. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            lock(&table).callbacks.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerTable")
            .field("next_id", &self.next_id)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gateway/auth.rs"]
mod tests;
