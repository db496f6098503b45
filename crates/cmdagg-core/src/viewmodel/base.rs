//! Base view model: property storage, change detection and command registry
//!
//! Concrete view models embed a [`BaseViewModel`] and implement
//! [`ViewModel`] to declare their derived properties and register their
//! commands.
//!
//! # Example
//!
//! ```
//! use cmdagg_core::viewmodel::{BaseViewModel, DependsOn, ViewModel};
//!
//! struct Calculator {
//!     base: BaseViewModel,
//! }
//!
//! impl ViewModel for Calculator {
//!     const DEPENDS_ON: &'static [DependsOn] = &[DependsOn::new("Square", "Input")];
//! }
//!
//! impl Calculator {
//!     fn new() -> cmdagg_core::Result<Self> {
//!         Ok(Self { base: BaseViewModel::new::<Self>()? })
//!     }
//!
//!     fn set_input(&self, value: i64) -> bool {
//!         self.base.set("Input", value)
//!     }
//!
//!     fn square(&self) -> i64 {
//!         let input: i64 = self.base.get("Input", 0);
//!         input * input
//!     }
//! }
//!
//! let calc = Calculator::new().unwrap();
//! assert!(calc.set_input(4));
//! assert!(!calc.set_input(4));
//! assert_eq!(calc.square(), 16);
//! ```

use std::any::Any;
use std::sync::Arc;

use super::dependency_map::{DependencyMap, DependsOn};
use super::notifier::Notifier;
use super::options::ViewModelOptions;
use super::property_store::PropertyStore;
use crate::aggregator::{AggregatorFactory, CommandAggregator, DefaultAggregatorFactory};
use crate::errors::Result;
use crate::subscription::SubscriptionId;

/// Declarations a concrete view model type provides to its base
pub trait ViewModel: 'static {
    /// Derived properties of this type
    const DEPENDS_ON: &'static [DependsOn] = &[];

    /// Register the type's commands
    ///
    /// Runs exactly once, while the base is being constructed. Closures
    /// that need state should capture [`BaseViewModel::properties`] or
    /// [`BaseViewModel::notifier`] handles.
    fn init_commands(_base: &mut BaseViewModel) -> Result<()> {
        Ok(())
    }
}

/// Shared machinery behind every view model
pub struct BaseViewModel {
    properties: PropertyStore,
    notifier: Notifier,
    commands: Box<dyn CommandAggregator>,
}

impl BaseViewModel {
    /// Base for `T` with default options and the built-in registry
    ///
    /// # Errors
    ///
    /// Whatever `T::init_commands` returns.
    pub fn new<T: ViewModel>() -> Result<Self> {
        Self::with_options::<T>(ViewModelOptions::default())
    }

    /// Base for `T` with explicit options
    ///
    /// # Errors
    ///
    /// Whatever `T::init_commands` returns.
    pub fn with_options<T: ViewModel>(options: ViewModelOptions) -> Result<Self> {
        Self::with_factory::<T>(options, &DefaultAggregatorFactory)
    }

    /// Base for `T` whose registry comes from `factory`
    ///
    /// # Errors
    ///
    /// Whatever `T::init_commands` returns.
    pub fn with_factory<T: ViewModel>(
        options: ViewModelOptions,
        factory: &dyn AggregatorFactory,
    ) -> Result<Self> {
        let dependencies = DependencyMap::for_type::<T>();
        let mut base = Self {
            properties: PropertyStore::new(),
            notifier: Notifier::new(dependencies, &options),
            commands: factory.create(),
        };
        T::init_commands(&mut base)?;
        tracing::debug!(
            view_model = std::any::type_name::<T>(),
            commands = base.commands.count(),
            auto_trigger = options.auto_trigger_command_notification,
            "view model initialized"
        );
        Ok(base)
    }

    /// Stored value of `name`, or `default`
    pub fn get<T: Any + Clone>(&self, name: &str, default: T) -> T {
        self.properties.get(name, default)
    }

    /// Store `value` under `name` and announce the change
    ///
    /// Returns `false` without notifying when the value is unchanged. The
    /// first write to a property always stores and notifies.
    pub fn set<T: Any + PartialEq>(&self, name: &str, value: T) -> bool {
        self.set_with_hooks(name, value, || {}, || {})
    }

    /// [`BaseViewModel::set`] with hooks around the storage update
    ///
    /// Hooks only run when the value changes. Notification follows `post`.
    pub fn set_with_hooks<T, Pre, Post>(&self, name: &str, value: T, pre: Pre, post: Post) -> bool
    where
        T: Any + PartialEq,
        Pre: FnOnce(),
        Post: FnOnce(),
    {
        if !self.properties.differs(name, &value) {
            tracing::trace!(property = name, "value unchanged");
            return false;
        }
        pre();
        self.properties.insert(name, value);
        post();
        self.notifier.notify_changed(name);
        true
    }

    /// Update a backing field owned by the concrete view model
    pub fn set_field<T: PartialEq>(&self, field: &mut T, value: T, name: &str) -> bool {
        self.set_field_with_hooks(field, value, name, || {}, || {})
    }

    pub fn set_field_with_hooks<T, Pre, Post>(
        &self,
        field: &mut T,
        value: T,
        name: &str,
        pre: Pre,
        post: Post,
    ) -> bool
    where
        T: PartialEq,
        Pre: FnOnce(),
        Post: FnOnce(),
    {
        if *field == value {
            tracing::trace!(property = name, "value unchanged");
            return false;
        }
        pre();
        *field = value;
        post();
        self.notifier.notify_changed(name);
        true
    }

    /// Announce `name`, its dependents and possibly the registry
    pub fn notify_changed(&self, name: &str) {
        self.notifier.notify_changed(name);
    }

    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn auto_trigger_command_notification(&self) -> bool {
        self.notifier.auto_trigger_command_notification()
    }

    pub fn set_auto_trigger_command_notification(&self, enabled: bool) {
        self.notifier.set_auto_trigger_command_notification(enabled);
    }

    pub fn suppress_notifications(&self) -> bool {
        self.notifier.suppress_notifications()
    }

    pub fn set_suppress_notifications(&self, suppressed: bool) {
        self.notifier.set_suppress_notifications(suppressed);
    }

    /// Handle onto the property storage
    pub fn properties(&self) -> PropertyStore {
        self.properties.clone()
    }

    /// Handle onto the change notifications
    pub fn notifier(&self) -> Notifier {
        self.notifier.clone()
    }

    pub fn commands(&self) -> &dyn CommandAggregator {
        self.commands.as_ref()
    }

    pub fn commands_mut(&mut self) -> &mut dyn CommandAggregator {
        self.commands.as_mut()
    }

    pub fn dependencies(&self) -> &Arc<DependencyMap> {
        self.notifier.dependencies()
    }

    /// Tear down stored values, listeners and commands
    pub fn clear(&mut self) {
        self.properties.clear();
        self.notifier.clear_listeners();
        self.commands.remove_all();
        tracing::debug!("view model cleared");
    }
}

impl std::fmt::Debug for BaseViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseViewModel")
            .field("properties", &self.properties)
            .field("notifier", &self.notifier)
            .field("commands", &self.commands.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Plain;

    impl ViewModel for Plain {}

    #[test]
    fn test_set_unchanged_skips_hooks() {
        let base = BaseViewModel::new::<Plain>().unwrap();
        let hooks = RefCell::new(Vec::new());

        assert!(base.set_with_hooks(
            "Name",
            "a".to_string(),
            || hooks.borrow_mut().push("pre"),
            || hooks.borrow_mut().push("post"),
        ));
        assert!(!base.set_with_hooks(
            "Name",
            "a".to_string(),
            || hooks.borrow_mut().push("pre"),
            || hooks.borrow_mut().push("post"),
        ));
        assert_eq!(*hooks.borrow(), vec!["pre", "post"]);
    }

    #[test]
    fn test_post_hook_sees_new_value() {
        let base = BaseViewModel::new::<Plain>().unwrap();
        let seen = Rc::new(RefCell::new(0));
        let store = base.properties();
        let sink = seen.clone();
        base.set_with_hooks("Count", 5_i32, || {}, move || {
            *sink.borrow_mut() = store.get("Count", 0_i32);
        });
        assert_eq!(*seen.borrow(), 5);
    }

    #[test]
    fn test_set_field() {
        let base = BaseViewModel::new::<Plain>().unwrap();
        let mut field = 1_u32;
        assert!(base.set_field(&mut field, 2, "Field"));
        assert!(!base.set_field(&mut field, 2, "Field"));
        assert_eq!(field, 2);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut base = BaseViewModel::new::<Plain>().unwrap();
        base.set("A", 1_i32);
        base.subscribe(|_| {});
        base.commands_mut()
            .add_or_set(
                "Noop",
                Rc::new(crate::commands::RelayCommand::new(|_| Ok(()))),
            )
            .unwrap();

        base.clear();
        assert_eq!(base.get("A", 0_i32), 0);
        assert_eq!(base.notifier().listener_count(), 0);
        assert!(!base.commands().has_any());
    }
}
