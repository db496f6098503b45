//! Subscription tokens handed out by signals and notifiers

use uuid::Uuid;

/// Opaque token identifying one registered handler
///
/// Tokens are UUIDv7 so they sort by registration time when logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Generate a fresh token
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
