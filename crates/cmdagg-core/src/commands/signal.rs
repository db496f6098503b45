//! Eligibility-changed signal shared by every command

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::subscription::SubscriptionId;

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct SignalInner {
    handlers: RefCell<Vec<(SubscriptionId, Handler)>>,
}

/// Signal raised when a command's eligibility may have changed
///
/// Cloning yields another handle to the same handler list. Handlers run in
/// registration order on the raising thread.
#[derive(Clone, Default)]
pub struct CanExecuteChanged {
    inner: Rc<SignalInner>,
}

impl CanExecuteChanged {
    /// Create a signal with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    pub fn connect(&self, handler: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.inner.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != id);
        handlers.len() != before
    }

    /// Invoke every handler
    ///
    /// The handler list is snapshotted first, so handlers may connect or
    /// disconnect while the signal is being raised.
    pub fn raise(&self) {
        let snapshot: Vec<Handler> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        tracing::trace!(handler_count = snapshot.len(), "can_execute_changed raised");
        for handler in snapshot {
            handler();
        }
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    /// Handle that does not keep the signal alive
    pub fn downgrade(&self) -> WeakCanExecuteChanged {
        WeakCanExecuteChanged {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Forward this signal into `target`
    ///
    /// The forwarding handler holds `target` weakly; once the target is
    /// dropped, raising this signal no longer reaches it.
    pub fn forward_to(&self, target: &CanExecuteChanged) -> SubscriptionId {
        let weak = target.downgrade();
        self.connect(move || {
            if let Some(target) = weak.upgrade() {
                target.raise();
            }
        })
    }
}

/// Weak counterpart of [`CanExecuteChanged`]
#[derive(Clone)]
pub struct WeakCanExecuteChanged {
    inner: Weak<SignalInner>,
}

impl WeakCanExecuteChanged {
    pub fn upgrade(&self) -> Option<CanExecuteChanged> {
        self.inner.upgrade().map(|inner| CanExecuteChanged { inner })
    }
}

impl std::fmt::Debug for CanExecuteChanged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanExecuteChanged")
            .field("handler_count", &self.handler_count())
            .finish()
    }
}
