//! Leaf command wrapping a single execute-operation

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::operation::{ActionFn, CanExecuteFn, ExecuteOperation};
use super::signal::CanExecuteChanged;
use super::Command;
use crate::errors::{Result, VmError};

/// Leaf command: one operation, an optional predicate, optional hooks
///
/// `execute` runs the pre-action hook, the operation, then the post-action
/// hook, sequentially on the caller's thread. Hooks can be replaced after
/// construction; the replacement applies from the next execution on.
///
/// # Example
///
/// ```
/// use cmdagg_core::commands::{Command, RelayCommand};
/// use serde_json::json;
///
/// let cmd = RelayCommand::builder()
///     .execute(|p| {
///         assert_eq!(p, &json!("go"));
///         Ok(())
///     })
///     .can_execute(|p| !p.is_null())
///     .build()
///     .unwrap();
///
/// assert!(!cmd.can_execute(&json!(null)));
/// cmd.execute(&json!("go")).unwrap();
/// ```
pub struct RelayCommand {
    execute: ExecuteOperation,
    can_execute: Option<CanExecuteFn>,
    pre_action: RefCell<Option<ActionFn>>,
    post_action: RefCell<Option<ActionFn>>,
    can_execute_changed: CanExecuteChanged,
}

impl RelayCommand {
    /// Start building a command
    pub fn builder() -> RelayCommandBuilder {
        RelayCommandBuilder::default()
    }

    /// Command that is always eligible
    pub fn new(execute: impl Fn(&Value) -> Result<()> + 'static) -> Self {
        Self::from_parts(ExecuteOperation::from_fn(execute), None, None, None)
    }

    /// Command gated by a predicate
    pub fn with_predicate(
        execute: impl Fn(&Value) -> Result<()> + 'static,
        can_execute: impl Fn(&Value) -> bool + 'static,
    ) -> Self {
        Self::from_parts(
            ExecuteOperation::from_fn(execute),
            Some(Rc::new(can_execute)),
            None,
            None,
        )
    }

    fn from_parts(
        execute: ExecuteOperation,
        can_execute: Option<CanExecuteFn>,
        pre_action: Option<ActionFn>,
        post_action: Option<ActionFn>,
    ) -> Self {
        Self {
            execute,
            can_execute,
            pre_action: RefCell::new(pre_action),
            post_action: RefCell::new(post_action),
            can_execute_changed: CanExecuteChanged::new(),
        }
    }

    /// Replace the hook run before the operation
    pub fn override_pre_action(&self, hook: impl Fn() + 'static) {
        *self.pre_action.borrow_mut() = Some(Rc::new(hook));
    }

    /// Replace the hook run after the operation
    pub fn override_post_action(&self, hook: impl Fn() + 'static) {
        *self.post_action.borrow_mut() = Some(Rc::new(hook));
    }

    /// Notify listeners that eligibility should be re-queried
    pub fn raise_can_execute_changed(&self) {
        self.can_execute_changed.raise();
    }

    pub fn is_async(&self) -> bool {
        self.execute.is_async()
    }

    // Hooks are cloned out so a hook may override itself without a
    // RefCell borrow conflict.
    fn run_hook(slot: &RefCell<Option<ActionFn>>) {
        let hook = slot.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl Command for RelayCommand {
    fn can_execute(&self, parameter: &Value) -> bool {
        self.can_execute
            .as_ref()
            .map_or(true, |predicate| predicate(parameter))
    }

    fn execute(&self, parameter: &Value) -> Result<()> {
        Self::run_hook(&self.pre_action);
        self.execute.run(parameter)?;
        Self::run_hook(&self.post_action);
        Ok(())
    }

    fn execute_async<'a>(&'a self, parameter: &'a Value) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            Self::run_hook(&self.pre_action);
            self.execute.run_async(parameter).await?;
            Self::run_hook(&self.post_action);
            Ok(())
        })
    }

    fn can_execute_changed(&self) -> &CanExecuteChanged {
        &self.can_execute_changed
    }
}

impl std::fmt::Debug for RelayCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayCommand")
            .field("execute", &self.execute)
            .field("has_predicate", &self.can_execute.is_some())
            .field("has_pre_action", &self.pre_action.borrow().is_some())
            .field("has_post_action", &self.post_action.borrow().is_some())
            .finish()
    }
}

/// Builder for [`RelayCommand`]
///
/// `build` fails with `InvalidArgument` when no execute-operation was
/// supplied, whatever else was set.
#[derive(Default)]
pub struct RelayCommandBuilder {
    execute: Option<ExecuteOperation>,
    can_execute: Option<CanExecuteFn>,
    pre_action: Option<ActionFn>,
    post_action: Option<ActionFn>,
}

impl RelayCommandBuilder {
    /// Synchronous operation
    pub fn execute(mut self, f: impl Fn(&Value) -> Result<()> + 'static) -> Self {
        self.execute = Some(ExecuteOperation::from_fn(f));
        self
    }

    /// Asynchronous operation
    pub fn execute_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        self.execute = Some(ExecuteOperation::from_async(f));
        self
    }

    /// Operation that may be absent, as handed over by a caller
    pub fn operation(mut self, operation: Option<ExecuteOperation>) -> Self {
        self.execute = operation;
        self
    }

    pub fn can_execute(mut self, f: impl Fn(&Value) -> bool + 'static) -> Self {
        self.can_execute = Some(Rc::new(f));
        self
    }

    /// Predicate that may be absent
    pub fn predicate(mut self, predicate: Option<CanExecuteFn>) -> Self {
        self.can_execute = predicate;
        self
    }

    pub fn pre_action(mut self, f: impl Fn() + 'static) -> Self {
        self.pre_action = Some(Rc::new(f));
        self
    }

    pub fn post_action(mut self, f: impl Fn() + 'static) -> Self {
        self.post_action = Some(Rc::new(f));
        self
    }

    /// Build the command
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if no execute-operation was supplied.
    pub fn build(self) -> Result<RelayCommand> {
        let execute = self.execute.ok_or_else(|| VmError::missing("execute"))?;
        Ok(RelayCommand::from_parts(
            execute,
            self.can_execute,
            self.pre_action,
            self.post_action,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_predicate_means_always_eligible() {
        let cmd = RelayCommand::new(|_| Ok(()));
        assert!(cmd.can_execute(&Value::Null));
        assert!(cmd.can_execute(&json!({"any": "thing"})));
    }

    #[test]
    fn test_predicate_sees_parameter() {
        let cmd = RelayCommand::with_predicate(|_| Ok(()), |p| p.as_i64() == Some(3));
        assert!(cmd.can_execute(&json!(3)));
        assert!(!cmd.can_execute(&json!(4)));
    }

    #[test]
    fn test_build_without_operation_fails() {
        let err = RelayCommand::builder()
            .can_execute(|_| true)
            .pre_action(|| {})
            .post_action(|| {})
            .build()
            .unwrap_err();

        match err {
            VmError::InvalidArgument { argument, .. } => assert_eq!(argument, "execute"),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_operation_skips_post_action() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let pre = trace.clone();
        let post = trace.clone();
        let cmd = RelayCommand::builder()
            .execute(|_| Err(VmError::operation("nope")))
            .pre_action(move || pre.borrow_mut().push("pre"))
            .post_action(move || post.borrow_mut().push("post"))
            .build()
            .unwrap();

        let err = cmd.execute(&Value::Null).unwrap_err();
        assert_eq!(err, VmError::operation("nope"));
        assert_eq!(*trace.borrow(), vec!["pre"]);
    }

    #[test]
    fn test_raise_can_execute_changed_reaches_handlers() {
        let cmd = RelayCommand::new(|_| Ok(()));
        let hits = Rc::new(std::cell::Cell::new(0));
        let counter = hits.clone();
        cmd.can_execute_changed()
            .connect(move || counter.set(counter.get() + 1));

        cmd.raise_can_execute_changed();
        assert_eq!(hits.get(), 1);
    }
}
