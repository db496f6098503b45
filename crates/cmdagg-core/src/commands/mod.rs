//! Commands: invocable units of UI-triggered behavior
//!
//! Two implementations of [`Command`] are provided:
//!
//! - [`RelayCommand`]: wraps one execute-operation, an optional eligibility
//!   predicate and optional pre/post hooks.
//! - [`HierarchyCommand`]: composes child commands under an execute strategy
//!   and an eligibility strategy.
//!
//! The command parameter is a `serde_json::Value`; bindings that pass nothing
//! use `Value::Null`.

pub mod hierarchy;
pub mod operation;
pub mod relay;
pub mod signal;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::errors::Result;

pub use hierarchy::{CanExecuteStrategy, ExecuteStrategy, HierarchyCommand};
pub use operation::{action_fn, can_execute_fn, ActionFn, CanExecuteFn, ExecuteOperation};
pub use relay::{RelayCommand, RelayCommandBuilder};
pub use signal::{CanExecuteChanged, WeakCanExecuteChanged};

/// A unit of behavior with an eligibility check
pub trait Command {
    /// Whether the command may run for `parameter`
    ///
    /// Must be deterministic and free of side effects: bindings call it on
    /// every notification cycle.
    fn can_execute(&self, parameter: &Value) -> bool;

    /// Run the command to completion on the calling thread
    ///
    /// # Errors
    ///
    /// Errors raised by the wrapped operation are returned unchanged.
    fn execute(&self, parameter: &Value) -> Result<()>;

    /// Run the command, awaiting asynchronous operations
    ///
    /// The default delegates to [`Command::execute`].
    ///
    /// # Errors
    ///
    /// Errors raised by the wrapped operation are returned unchanged.
    fn execute_async<'a>(&'a self, parameter: &'a Value) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move { self.execute(parameter) })
    }

    /// Signal raised when the result of `can_execute` may have changed
    fn can_execute_changed(&self) -> &CanExecuteChanged;
}
