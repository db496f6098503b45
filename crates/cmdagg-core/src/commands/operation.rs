//! Closures wrapped by commands: execute-operations, predicates and hooks

use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

use crate::errors::{Result, VmError};

/// Eligibility predicate evaluated against the command parameter
pub type CanExecuteFn = Rc<dyn Fn(&Value) -> bool>;

/// Parameterless hook run around an execute-operation
pub type ActionFn = Rc<dyn Fn()>;

type SyncOperation = dyn Fn(&Value) -> Result<()>;
type AsyncOperation = dyn Fn(Value) -> LocalBoxFuture<'static, Result<()>>;

/// The work a command performs when executed
///
/// Either a plain closure or a closure producing a future. Asynchronous
/// operations receive an owned copy of the parameter because the future may
/// outlive the caller's borrow.
#[derive(Clone)]
pub enum ExecuteOperation {
    Sync(Rc<SyncOperation>),
    Async(Rc<AsyncOperation>),
}

impl ExecuteOperation {
    /// Wrap a synchronous closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<()> + 'static,
    {
        ExecuteOperation::Sync(Rc::new(f))
    }

    /// Wrap a closure returning a future
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        ExecuteOperation::Async(Rc::new(move |parameter| f(parameter).boxed_local()))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, ExecuteOperation::Async(_))
    }

    /// Run to completion on the calling thread
    ///
    /// Asynchronous operations are driven with a local executor until their
    /// future resolves. Callers already inside an executor must use
    /// [`ExecuteOperation::run_async`].
    ///
    /// # Errors
    ///
    /// `NestedBlockingExecute` when an async operation is run from inside
    /// an executor, otherwise whatever the wrapped operation returns.
    pub fn run(&self, parameter: &Value) -> Result<()> {
        match self {
            ExecuteOperation::Sync(f) => f(parameter),
            ExecuteOperation::Async(f) => {
                // block_on takes the enter guard itself, so release ours first
                let guard =
                    futures::executor::enter().map_err(|_| VmError::NestedBlockingExecute)?;
                drop(guard);
                futures::executor::block_on(f(parameter.clone()))
            }
        }
    }

    /// Run and await completion
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped operation returns.
    pub async fn run_async(&self, parameter: &Value) -> Result<()> {
        match self {
            ExecuteOperation::Sync(f) => f(parameter),
            ExecuteOperation::Async(f) => f(parameter.clone()).await,
        }
    }
}

impl std::fmt::Debug for ExecuteOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecuteOperation::Sync(_) => f.write_str("ExecuteOperation::Sync"),
            ExecuteOperation::Async(_) => f.write_str("ExecuteOperation::Async"),
        }
    }
}

/// Wrap a predicate closure
pub fn can_execute_fn(f: impl Fn(&Value) -> bool + 'static) -> CanExecuteFn {
    Rc::new(f)
}

/// Wrap a hook closure
pub fn action_fn(f: impl Fn() + 'static) -> ActionFn {
    Rc::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[test]
    fn test_sync_operation_receives_parameter() {
        let seen = Rc::new(RefCell::new(Value::Null));
        let sink = seen.clone();
        let op = ExecuteOperation::from_fn(move |p| {
            *sink.borrow_mut() = p.clone();
            Ok(())
        });

        op.run(&json!("hello")).unwrap();
        assert_eq!(*seen.borrow(), json!("hello"));
        assert!(!op.is_async());
    }

    #[test]
    fn test_async_operation_runs_to_completion() {
        let seen = Rc::new(RefCell::new(Value::Null));
        let sink = seen.clone();
        let op = ExecuteOperation::from_async(move |p| {
            let sink = sink.clone();
            async move {
                *sink.borrow_mut() = p;
                Ok(())
            }
        });

        op.run(&json!(7)).unwrap();
        assert_eq!(*seen.borrow(), json!(7));
        assert!(op.is_async());
    }

    #[test]
    fn test_async_failure_propagates_unchanged() {
        let op = ExecuteOperation::from_async(|_| async { Err(VmError::operation("boom")) });

        let err = futures::executor::block_on(op.run_async(&Value::Null)).unwrap_err();
        assert_eq!(err, VmError::operation("boom"));
    }

    #[test]
    fn test_blocking_run_inside_executor_is_rejected() {
        let op = ExecuteOperation::from_async(|_| async { Ok(()) });

        let result = futures::executor::block_on(async { op.run(&Value::Null) });
        assert_eq!(result, Err(VmError::NestedBlockingExecute));
        // the guard is released, so a later blocking run succeeds
        assert!(op.run(&Value::Null).is_ok());
    }
}
