//! Default command aggregator backed by a hash map
//!
//! ## Logging Ownership
//!
//! `execute` and `execute_async` own lifecycle logging for commands
//! dispatched by key:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Insertions and removals are traced at debug level only.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::CommandAggregator;
use crate::commands::{CanExecuteChanged, Command};
use crate::errors::{Result, VmError};
use crate::subscription::SubscriptionId;
use crate::{log_op_end, log_op_error, log_op_start};

const OP_EXECUTE: &str = "command_execute";
const OP_EXECUTE_ASYNC: &str = "command_execute_async";

struct Entry {
    command: Rc<dyn Command>,
    // forwarding handler registered on the command's own signal
    link: SubscriptionId,
}

impl Entry {
    fn detach(&self) {
        self.command.can_execute_changed().disconnect(self.link);
    }
}

/// In-memory command registry
///
/// Not thread-safe; owned by a single view model.
#[derive(Default)]
pub struct CommandRegistry {
    entries: HashMap<String, Entry>,
    can_execute_changed: CanExecuteChanged,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(VmError::InvalidArgument {
                argument: "key".to_string(),
                reason: "Command key cannot be empty or whitespace-only".to_string(),
            });
        }
        Ok(())
    }

    fn lookup(&self, key: &str) -> Result<&Rc<dyn Command>> {
        self.entries
            .get(key)
            .map(|entry| &entry.command)
            .ok_or_else(|| VmError::CommandNotFound {
                key: key.to_string(),
            })
    }
}

impl CommandAggregator for CommandRegistry {
    fn add_or_set(&mut self, key: &str, command: Rc<dyn Command>) -> Result<()> {
        Self::validate_key(key)?;

        let link = command
            .can_execute_changed()
            .forward_to(&self.can_execute_changed);
        let replaced = self
            .entries
            .insert(key.to_string(), Entry { command, link });

        if let Some(previous) = &replaced {
            previous.detach();
        }
        tracing::debug!(
            command_key = key,
            replaced = replaced.is_some(),
            "command registered"
        );
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Result<Rc<dyn Command>> {
        self.lookup(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            entry.detach();
            tracing::debug!(command_key = key, "command removed");
        }
    }

    fn remove_all(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.detach();
        }
    }

    fn count(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn execute(&self, key: &str, parameter: &Value) -> Result<()> {
        log_op_start!(OP_EXECUTE, command_key = key);
        let start = Instant::now();

        self.lookup(key)
            .and_then(|command| command.execute(parameter))
            .map_err(|e| {
                log_op_error!(
                    OP_EXECUTE,
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    command_key = key
                );
                e
            })?;

        log_op_end!(
            OP_EXECUTE,
            duration_ms = start.elapsed().as_millis() as u64,
            command_key = key
        );
        Ok(())
    }

    fn execute_async<'a>(
        &'a self,
        key: &'a str,
        parameter: &'a Value,
    ) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            log_op_start!(OP_EXECUTE_ASYNC, command_key = key);
            let start = Instant::now();

            let result = match self.lookup(key) {
                Ok(command) => command.execute_async(parameter).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    log_op_end!(
                        OP_EXECUTE_ASYNC,
                        duration_ms = start.elapsed().as_millis() as u64,
                        command_key = key
                    );
                    Ok(())
                }
                Err(e) => {
                    log_op_error!(
                        OP_EXECUTE_ASYNC,
                        e.clone(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        command_key = key
                    );
                    Err(e)
                }
            }
        })
    }

    fn can_execute_changed(&self) -> &CanExecuteChanged {
        &self.can_execute_changed
    }
}

impl Drop for CommandRegistry {
    fn drop(&mut self) {
        self.remove_all();
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
