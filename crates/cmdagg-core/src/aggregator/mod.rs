//! Command aggregator: keyed registry of commands
//!
//! [`CommandAggregator`] is the seam view models and bindings talk to;
//! [`CommandRegistry`] is the default implementation. Alternative
//! implementations are selected at composition time through an
//! [`AggregatorFactory`].

pub mod factory;
pub mod registry;

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::commands::{CanExecuteChanged, CanExecuteFn, Command, ExecuteOperation, RelayCommand};
use crate::errors::{Result, VmError};

pub use factory::{AggregatorFactory, DefaultAggregatorFactory};
pub use registry::CommandRegistry;

/// Keyed store of commands with lookup and dispatch
///
/// Keys are unique; inserting under an existing key replaces the command.
/// The aggregator caches no eligibility: every query goes to the command.
pub trait CommandAggregator {
    /// Store `command` under `key`, replacing any previous command
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is empty or whitespace-only.
    fn add_or_set(&mut self, key: &str, command: Rc<dyn Command>) -> Result<()>;

    /// Whether a command is registered under `key`
    fn exists(&self, key: &str) -> bool;

    /// Look up a command
    ///
    /// # Errors
    ///
    /// `CommandNotFound` if nothing is registered under `key`.
    fn get(&self, key: &str) -> Result<Rc<dyn Command>>;

    /// Remove the command under `key`; no-op when absent
    fn remove(&mut self, key: &str);

    /// Remove every command
    fn remove_all(&mut self);

    fn count(&self) -> usize;

    /// Registered keys, sorted
    fn keys(&self) -> Vec<String>;

    /// Look up and execute
    ///
    /// # Errors
    ///
    /// `CommandNotFound` without invoking anything if `key` is absent;
    /// otherwise whatever the command returns.
    fn execute(&self, key: &str, parameter: &Value) -> Result<()>;

    /// Look up and execute, awaiting asynchronous operations
    ///
    /// # Errors
    ///
    /// Same as [`CommandAggregator::execute`].
    fn execute_async<'a>(
        &'a self,
        key: &'a str,
        parameter: &'a Value,
    ) -> LocalBoxFuture<'a, Result<()>>;

    /// Aggregate signal raised whenever a stored command raises its own
    fn can_execute_changed(&self) -> &CanExecuteChanged;

    /// True iff at least one command is registered
    fn has_any(&self) -> bool {
        self.count() > 0
    }

    /// Store a command handed over as optional
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `command` is `None` or `key` is empty.
    fn add_or_set_command(&mut self, key: &str, command: Option<Rc<dyn Command>>) -> Result<()> {
        let command = command.ok_or_else(|| VmError::missing("command"))?;
        self.add_or_set(key, command)
    }

    /// Build a [`RelayCommand`] from its parts and store it
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is empty.
    fn add_or_set_relay(
        &mut self,
        key: &str,
        execute: ExecuteOperation,
        can_execute: Option<CanExecuteFn>,
    ) -> Result<()> {
        let command = RelayCommand::builder()
            .operation(Some(execute))
            .predicate(can_execute)
            .build()?;
        self.add_or_set(key, Rc::new(command))
    }

    /// Eligibility of the command under `key`
    ///
    /// # Errors
    ///
    /// `CommandNotFound` if nothing is registered under `key`.
    fn can_execute(&self, key: &str, parameter: &Value) -> Result<bool> {
        Ok(self.get(key)?.can_execute(parameter))
    }
}

/// Convenience for registering plain closures on any aggregator
pub trait CommandAggregatorExt: CommandAggregator {
    /// Register an always-eligible closure command
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is empty.
    fn add_or_set_fn<E>(&mut self, key: &str, execute: E) -> Result<()>
    where
        E: Fn(&Value) -> Result<()> + 'static,
    {
        self.add_or_set_relay(key, ExecuteOperation::from_fn(execute), None)
    }

    /// Register a closure command gated by a predicate
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `key` is empty.
    fn add_or_set_fn_with_predicate<E, P>(
        &mut self,
        key: &str,
        execute: E,
        can_execute: P,
    ) -> Result<()>
    where
        E: Fn(&Value) -> Result<()> + 'static,
        P: Fn(&Value) -> bool + 'static,
    {
        self.add_or_set_relay(
            key,
            ExecuteOperation::from_fn(execute),
            Some(Rc::new(can_execute)),
        )
    }
}

impl<T: CommandAggregator + ?Sized> CommandAggregatorExt for T {}
