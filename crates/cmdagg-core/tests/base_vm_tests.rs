#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cmdagg_core::aggregator::{CommandAggregator, CommandAggregatorExt, CommandRegistry};
use cmdagg_core::errors::VmError;
use cmdagg_core::viewmodel::{
    BaseViewModel, DependsOn, ViewModel, ViewModelOptions, COMMANDS_PROPERTY,
};
use common::{record_notifications, TestViewModel};
use serde_json::Value;

#[test]
fn test_commands_created_by_construction() {
    let vm = TestViewModel::new();
    assert_eq!(vm.commands().count(), 1);
    assert!(vm.commands().exists("TestCommand"));
}

#[test]
fn test_set_property_with_hooks() {
    let mut vm = TestViewModel::new();
    let log = record_notifications(&vm.base);

    vm.base.set_auto_trigger_command_notification(true);
    assert!(vm.set_extended_test_property("something"));
    assert_eq!(*vm.test_tag.borrow(), "after");
    assert_eq!(log.borrow().last().map(String::as_str), Some(COMMANDS_PROPERTY));

    vm.base.set_auto_trigger_command_notification(false);
    assert!(vm.set_extended_test_property("somethingElse"));
    assert_eq!(*vm.test_tag.borrow(), "after");
    assert_eq!(
        log.borrow().last().map(String::as_str),
        Some("ExtendedTestProperty")
    );
}

#[test]
fn test_pre_hook_runs_before_storage() {
    let mut vm = TestViewModel::new();
    vm.test_tag.replace("untouched".to_string());

    let tags = Rc::new(RefCell::new(Vec::new()));
    let seen = tags.clone();
    let tag = &vm.test_tag;
    let mut field = String::new();
    vm.base.set_field_with_hooks(
        &mut field,
        "x".to_string(),
        "Local",
        || seen.borrow_mut().push(format!("pre:{}", tag.borrow())),
        || seen.borrow_mut().push("post".to_string()),
    );
    assert_eq!(*tags.borrow(), vec!["pre:untouched", "post"]);
    assert_eq!(field, "x");

    assert!(vm.set_test_property("Dummy"));
    assert_eq!(vm.test_property(), "Dummy");
}

#[test]
fn test_equal_value_is_silent() {
    let mut vm = TestViewModel::new();
    vm.set_extended_test_property("same");
    vm.test_tag.replace(String::new());
    let log = record_notifications(&vm.base);

    assert!(!vm.set_extended_test_property("same"));
    assert!(log.borrow().is_empty());
    assert_eq!(*vm.test_tag.borrow(), "");
}

#[test]
fn test_notify_changed_honours_auto_trigger() {
    let vm = TestViewModel::new();
    let log = record_notifications(&vm.base);

    vm.base.set_auto_trigger_command_notification(true);
    vm.base.notify_changed("TestProperty");
    assert_eq!(*log.borrow(), vec!["TestProperty", COMMANDS_PROPERTY]);

    log.borrow_mut().clear();
    vm.base.set_auto_trigger_command_notification(false);
    vm.base.notify_changed("TestProperty");
    assert_eq!(*log.borrow(), vec!["TestProperty"]);
}

#[test]
fn test_depends_on() {
    let mut vm = TestViewModel::new();
    let log = record_notifications(&vm.base);

    assert!(vm.set_input_value(4));
    assert_eq!(vm.square_value(), 16);
    assert_eq!(
        *log.borrow(),
        vec!["InputValue", "SquareValue", COMMANDS_PROPERTY]
    );
}

#[test]
fn test_suppress_notifications() {
    let mut vm = TestViewModel::new();
    let log = record_notifications(&vm.base);

    vm.base.set_suppress_notifications(false);
    vm.base.notify_changed("TestProperty");
    assert_eq!(log.borrow().last().map(String::as_str), Some(COMMANDS_PROPERTY));

    log.borrow_mut().clear();
    vm.base.set_suppress_notifications(true);
    vm.base.notify_changed("TestProperty");
    assert!(vm.set_input_value(3));
    assert!(log.borrow().is_empty());

    // storage and hooks are unaffected
    assert_eq!(vm.input_value(), 3);
    assert!(vm.set_extended_test_property("quiet"));
    assert_eq!(*vm.test_tag.borrow(), "after");
    assert!(log.borrow().is_empty());
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let vm = TestViewModel::new();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let id = vm.base.subscribe(move |_| counter.set(counter.get() + 1));

    vm.base.notify_changed("A");
    let after_first = hits.get();
    assert!(vm.base.unsubscribe(id));
    vm.base.notify_changed("A");
    assert_eq!(hits.get(), after_first);
}

#[test]
fn test_listener_may_read_state_reentrantly() {
    let vm = TestViewModel::new();
    let store = vm.base.properties();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    vm.base.subscribe(move |name| {
        if name == "Count" {
            sink.borrow_mut().push(store.get("Count", 0_i32));
        }
    });

    vm.base.set("Count", 3_i32);
    assert_eq!(*seen.borrow(), vec![3]);
}

struct Stored {
    base: BaseViewModel,
}

impl ViewModel for Stored {
    const DEPENDS_ON: &'static [DependsOn] = &[
        DependsOn::new("Length", "Text"),
        DependsOn::new("Summary", "Text"),
    ];
}

impl Stored {
    fn new(options: ViewModelOptions) -> Self {
        Self {
            base: BaseViewModel::with_options::<Self>(options).unwrap(),
        }
    }

    fn text(&self) -> String {
        self.base.get("Text", String::new())
    }

    fn set_text(&self, value: &str) -> bool {
        self.base.set("Text", value.to_string())
    }
}

#[test]
fn test_stored_property_reads_default_until_set() {
    let vm = Stored::new(ViewModelOptions::default());
    assert_eq!(vm.text(), "");
    assert_eq!(vm.base.get("Missing", 12_u8), 12);

    assert!(vm.set_text("hello"));
    assert_eq!(vm.text(), "hello");
}

#[test]
fn test_first_write_of_default_value_is_stored() {
    let vm = Stored::new(ViewModelOptions::default());
    let log = record_notifications(&vm.base);

    assert!(vm.base.set("Count", 0_i32));
    assert_eq!(vm.base.get("Count", 7_i32), 0);
    assert_eq!(*log.borrow(), vec!["Count"]);

    assert!(!vm.base.set("Count", 0_i32));
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_first_write_runs_hooks() {
    let vm = Stored::new(ViewModelOptions::default());
    let calls = RefCell::new(Vec::new());

    let changed = vm.base.set_with_hooks(
        "Flag",
        false,
        || calls.borrow_mut().push("pre"),
        || calls.borrow_mut().push("post"),
    );
    assert!(changed);
    assert_eq!(*calls.borrow(), vec!["pre", "post"]);
    assert!(!vm.base.get("Flag", true));
}

#[test]
fn test_stored_property_fan_out_is_alphabetical() {
    let vm = Stored::new(ViewModelOptions::default().with_auto_trigger(true));
    let log = record_notifications(&vm.base);

    vm.set_text("abc");
    assert_eq!(
        *log.borrow(),
        vec!["Text", "Length", "Summary", COMMANDS_PROPERTY]
    );
}

#[test]
fn test_options_seed_flags() {
    let options = ViewModelOptions::from_json(
        r#"{"auto_trigger_command_notification": true, "suppress_notifications": true}"#,
    )
    .unwrap();
    let vm = Stored::new(options);

    assert!(vm.base.auto_trigger_command_notification());
    assert!(vm.base.suppress_notifications());
}

#[test]
fn test_clear_tears_down_instance() {
    let mut vm = TestViewModel::new();
    vm.base.set("Stored", 1_i32);
    let log = record_notifications(&vm.base);

    vm.base.clear();
    vm.base.notify_changed("After");

    assert!(log.borrow().is_empty());
    assert_eq!(vm.base.get("Stored", 0_i32), 0);
    assert!(!vm.commands().has_any());
}

struct Failing;

impl ViewModel for Failing {
    fn init_commands(base: &mut BaseViewModel) -> cmdagg_core::Result<()> {
        base.commands_mut().add_or_set_fn(" ", |_| Ok(()))
    }
}

#[test]
fn test_init_commands_error_propagates() {
    let err = BaseViewModel::new::<Failing>().unwrap_err();
    assert!(matches!(err, VmError::InvalidArgument { .. }));
}

struct Injected;

impl ViewModel for Injected {
    fn init_commands(base: &mut BaseViewModel) -> cmdagg_core::Result<()> {
        let notifier = base.notifier();
        base.commands_mut().add_or_set_fn("Refresh", move |_| {
            notifier.notify_changed(COMMANDS_PROPERTY);
            Ok(())
        })
    }
}

#[test]
fn test_factory_injection() {
    let created = Rc::new(Cell::new(0));
    let count = created.clone();
    let factory = move || {
        count.set(count.get() + 1);
        let mut registry = CommandRegistry::new();
        registry
            .add_or_set_fn("Preinstalled", |_| Ok(()))
            .expect("valid key");
        Box::new(registry) as Box<dyn CommandAggregator>
    };

    let base =
        BaseViewModel::with_factory::<Injected>(ViewModelOptions::default(), &factory).unwrap();
    assert_eq!(created.get(), 1);
    assert_eq!(base.commands().keys(), vec!["Preinstalled", "Refresh"]);

    let log = record_notifications(&base);
    base.commands().execute("Refresh", &Value::Null).unwrap();
    assert_eq!(*log.borrow(), vec![COMMANDS_PROPERTY]);
}
