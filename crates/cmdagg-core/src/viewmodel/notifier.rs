//! Property-changed broadcast with dependency fan-out
//!
//! One call to [`Notifier::notify_changed`] announces, in order:
//!
//! 1. the property itself
//! 2. each direct dependent from the type's [`DependencyMap`], alphabetically
//! 3. [`COMMANDS_PROPERTY`], when auto-trigger is enabled
//!
//! While suppression is on nothing is announced at all.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use super::dependency_map::DependencyMap;
use super::options::ViewModelOptions;
use crate::subscription::SubscriptionId;

/// Property name under which the command registry is announced
///
/// Bindings re-poll command eligibility when they see it.
pub const COMMANDS_PROPERTY: &str = "CmdAgg";

type Listener = Rc<dyn Fn(&str)>;

struct NotifierInner {
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    auto_trigger: Cell<bool>,
    suppressed: Cell<bool>,
    dependencies: Arc<DependencyMap>,
}

/// Shared handle onto a view model's change notifications
#[derive(Clone)]
pub struct Notifier {
    inner: Rc<NotifierInner>,
}

impl Notifier {
    pub fn new(dependencies: Arc<DependencyMap>, options: &ViewModelOptions) -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                listeners: RefCell::new(Vec::new()),
                auto_trigger: Cell::new(options.auto_trigger_command_notification),
                suppressed: Cell::new(options.suppress_notifications),
                dependencies,
            }),
        }
    }

    /// Register a listener receiving each announced property name
    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(registered, _)| *registered != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn clear_listeners(&self) {
        self.inner.listeners.borrow_mut().clear();
    }

    pub fn auto_trigger_command_notification(&self) -> bool {
        self.inner.auto_trigger.get()
    }

    pub fn set_auto_trigger_command_notification(&self, enabled: bool) {
        self.inner.auto_trigger.set(enabled);
    }

    pub fn suppress_notifications(&self) -> bool {
        self.inner.suppressed.get()
    }

    pub fn set_suppress_notifications(&self, suppressed: bool) {
        self.inner.suppressed.set(suppressed);
    }

    pub fn dependencies(&self) -> &Arc<DependencyMap> {
        &self.inner.dependencies
    }

    /// Names one change of `property` announces, in broadcast order
    pub fn broadcast_names(&self, property: &str) -> Vec<String> {
        let dependents = self.inner.dependencies.dependents_of(property);
        let mut names = Vec::with_capacity(dependents.len() + 2);
        names.push(property.to_string());
        names.extend(dependents.iter().cloned());
        if self.inner.auto_trigger.get() && property != COMMANDS_PROPERTY {
            names.push(COMMANDS_PROPERTY.to_string());
        }
        names
    }

    /// Announce a change of `property` to every listener
    pub fn notify_changed(&self, property: &str) {
        if self.inner.suppressed.get() {
            tracing::trace!(property, "notification suppressed");
            return;
        }

        // listeners may subscribe or unsubscribe while being called
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        let names = self.broadcast_names(property);
        tracing::trace!(
            property,
            names = names.len(),
            listener_count = snapshot.len(),
            "property changed"
        );

        for name in &names {
            for listener in &snapshot {
                listener(name);
            }
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("listener_count", &self.listener_count())
            .field("auto_trigger", &self.auto_trigger_command_notification())
            .field("suppressed", &self.suppress_notifications())
            .finish()
    }
}
