//! Composite command whose behavior depends on its children
//!
//! A hierarchy owns an ordered, append-only list of child commands. Its
//! eligibility combines the children's eligibility according to a
//! [`CanExecuteStrategy`]; its execution runs its own operation and/or the
//! children according to an [`ExecuteStrategy`].
//!
//! Children are executed unconditionally: the hierarchy never re-checks a
//! child's `can_execute` before running it. Gating belongs to whoever calls
//! `execute` on the hierarchy.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::operation::{CanExecuteFn, ExecuteOperation};
use super::signal::CanExecuteChanged;
use super::Command;
use crate::errors::{Result, VmError};
use crate::subscription::SubscriptionId;

/// What `execute` runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteStrategy {
    /// Own operation only; fails if the hierarchy has none
    MasterOnly,
    /// Own operation (if any), then each child in insertion order
    MasterThenChildren,
    /// Each child in insertion order; the own operation is never run
    ChildrenOnly,
    /// Each child in insertion order, then the own operation (if any)
    ChildrenThenMaster,
}

/// How `can_execute` combines children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanExecuteStrategy {
    /// Every child eligible AND own predicate (if any)
    DependsOnAllChildren,
    /// At least one child eligible AND own predicate (if any)
    DependsOnAnyChild,
    /// Own predicate only
    Independent,
}

struct Child {
    command: Rc<dyn Command>,
    link: SubscriptionId,
}

/// Composite command
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use cmdagg_core::commands::{
///     CanExecuteStrategy, Command, ExecuteStrategy, HierarchyCommand, RelayCommand,
/// };
/// use serde_json::Value;
///
/// let save_all = HierarchyCommand::new(
///     ExecuteStrategy::ChildrenOnly,
///     CanExecuteStrategy::DependsOnAnyChild,
/// );
/// save_all.add_child(Rc::new(RelayCommand::with_predicate(|_| Ok(()), |_| false)));
/// save_all.add_child(Rc::new(RelayCommand::new(|_| Ok(()))));
///
/// assert!(save_all.can_execute(&Value::Null));
/// assert_eq!(save_all.child_count(), 2);
/// ```
pub struct HierarchyCommand {
    execute: Option<ExecuteOperation>,
    can_execute: Option<CanExecuteFn>,
    execute_strategy: ExecuteStrategy,
    can_execute_strategy: CanExecuteStrategy,
    children: RefCell<Vec<Child>>,
    can_execute_changed: CanExecuteChanged,
}

impl HierarchyCommand {
    /// Hierarchy without an own operation or predicate
    pub fn new(execute_strategy: ExecuteStrategy, can_execute_strategy: CanExecuteStrategy) -> Self {
        Self {
            execute: None,
            can_execute: None,
            execute_strategy,
            can_execute_strategy,
            children: RefCell::new(Vec::new()),
            can_execute_changed: CanExecuteChanged::new(),
        }
    }

    /// Set the own (master) operation
    pub fn with_execute(mut self, f: impl Fn(&Value) -> Result<()> + 'static) -> Self {
        self.execute = Some(ExecuteOperation::from_fn(f));
        self
    }

    /// Set an asynchronous own operation
    pub fn with_execute_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        self.execute = Some(ExecuteOperation::from_async(f));
        self
    }

    /// Set the own operation from a value that may be absent
    pub fn with_operation(mut self, operation: Option<ExecuteOperation>) -> Self {
        self.execute = operation;
        self
    }

    /// Set the own eligibility predicate
    pub fn with_can_execute(mut self, f: impl Fn(&Value) -> bool + 'static) -> Self {
        self.can_execute = Some(Rc::new(f));
        self
    }

    /// Append a child
    ///
    /// The child's eligibility-changed signal is forwarded to the
    /// hierarchy's own signal. Adding the same command twice is allowed.
    pub fn add_child(&self, command: Rc<dyn Command>) {
        let link = command
            .can_execute_changed()
            .forward_to(&self.can_execute_changed);
        self.children.borrow_mut().push(Child { command, link });
        tracing::debug!(
            child_count = self.children.borrow().len(),
            "hierarchy child added"
        );
    }

    /// Append several children, preserving their order
    pub fn add_children<I>(&self, commands: I)
    where
        I: IntoIterator<Item = Rc<dyn Command>>,
    {
        for command in commands {
            self.add_child(command);
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Children in insertion order
    pub fn children(&self) -> Vec<Rc<dyn Command>> {
        self.children
            .borrow()
            .iter()
            .map(|child| child.command.clone())
            .collect()
    }

    pub fn execute_strategy(&self) -> ExecuteStrategy {
        self.execute_strategy
    }

    pub fn can_execute_strategy(&self) -> CanExecuteStrategy {
        self.can_execute_strategy
    }

    pub fn has_own_operation(&self) -> bool {
        self.execute.is_some()
    }

    /// Notify listeners that eligibility should be re-queried
    pub fn raise_can_execute_changed(&self) {
        self.can_execute_changed.raise();
    }

    fn own_predicate(&self, parameter: &Value) -> bool {
        self.can_execute
            .as_ref()
            .map_or(true, |predicate| predicate(parameter))
    }

    /// Which steps to run, in order; `None` stands for the own operation
    fn plan(&self) -> Result<Vec<Option<Rc<dyn Command>>>> {
        let children = self.children();
        let mut steps = Vec::with_capacity(children.len() + 1);
        match self.execute_strategy {
            ExecuteStrategy::MasterOnly => {
                if self.execute.is_none() {
                    return Err(VmError::MasterOperationMissing);
                }
                steps.push(None);
            }
            ExecuteStrategy::MasterThenChildren => {
                if self.execute.is_some() {
                    steps.push(None);
                }
                steps.extend(children.into_iter().map(Some));
            }
            ExecuteStrategy::ChildrenOnly => {
                steps.extend(children.into_iter().map(Some));
            }
            ExecuteStrategy::ChildrenThenMaster => {
                steps.extend(children.into_iter().map(Some));
                if self.execute.is_some() {
                    steps.push(None);
                }
            }
        }
        Ok(steps)
    }
}

impl Command for HierarchyCommand {
    fn can_execute(&self, parameter: &Value) -> bool {
        let children = self.children.borrow();
        match self.can_execute_strategy {
            CanExecuteStrategy::Independent => self.own_predicate(parameter),
            CanExecuteStrategy::DependsOnAllChildren => {
                children
                    .iter()
                    .all(|child| child.command.can_execute(parameter))
                    && self.own_predicate(parameter)
            }
            CanExecuteStrategy::DependsOnAnyChild => {
                children
                    .iter()
                    .any(|child| child.command.can_execute(parameter))
                    && self.own_predicate(parameter)
            }
        }
    }

    fn execute(&self, parameter: &Value) -> Result<()> {
        let steps = self.plan()?;
        tracing::debug!(
            strategy = ?self.execute_strategy,
            steps = steps.len(),
            "hierarchy execute"
        );
        for step in steps {
            match (step, &self.execute) {
                (Some(child), _) => child.execute(parameter)?,
                (None, Some(own)) => own.run(parameter)?,
                (None, None) => return Err(VmError::MasterOperationMissing),
            }
        }
        Ok(())
    }

    fn execute_async<'a>(&'a self, parameter: &'a Value) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let steps = self.plan()?;
            for step in steps {
                match (step, &self.execute) {
                    (Some(child), _) => child.execute_async(parameter).await?,
                    (None, Some(own)) => own.run_async(parameter).await?,
                    (None, None) => return Err(VmError::MasterOperationMissing),
                }
            }
            Ok(())
        })
    }

    fn can_execute_changed(&self) -> &CanExecuteChanged {
        &self.can_execute_changed
    }
}

impl Drop for HierarchyCommand {
    fn drop(&mut self) {
        for child in self.children.get_mut().drain(..) {
            child.command.can_execute_changed().disconnect(child.link);
        }
    }
}

impl std::fmt::Debug for HierarchyCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyCommand")
            .field("execute", &self.execute)
            .field("execute_strategy", &self.execute_strategy)
            .field("can_execute_strategy", &self.can_execute_strategy)
            .field("child_count", &self.child_count())
            .finish()
    }
}
