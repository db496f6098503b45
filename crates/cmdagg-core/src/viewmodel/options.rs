//! Initial notification flags, constructible from JSON

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Initial notification flags of a view model
///
/// Both flags remain adjustable on the instance after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewModelOptions {
    /// Announce the command registry after every property change
    pub auto_trigger_command_notification: bool,
    /// Start with notifications silenced
    pub suppress_notifications: bool,
}

impl ViewModelOptions {
    /// Parse options from a JSON document
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_auto_trigger(mut self, enabled: bool) -> Self {
        self.auto_trigger_command_notification = enabled;
        self
    }

    pub fn with_suppressed(mut self, suppressed: bool) -> Self {
        self.suppress_notifications = suppressed;
        self
    }
}
