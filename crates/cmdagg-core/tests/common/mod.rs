#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cmdagg_core::commands::RelayCommand;
use cmdagg_core::viewmodel::{BaseViewModel, DependsOn, ViewModel, ViewModelOptions};
use cmdagg_core::{CommandAggregator, Result};

/// Shared, ordered log of labels written by test commands and listeners
pub type Trace = Rc<RefCell<Vec<String>>>;

#[allow(dead_code)]
pub fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

/// Record every property name `base` announces
#[allow(dead_code)]
pub fn record_notifications(base: &BaseViewModel) -> Trace {
    let log = trace();
    let sink = log.clone();
    base.subscribe(move |name| sink.borrow_mut().push(name.to_string()));
    log
}

/// Command that appends `label` to `log` when executed
#[allow(dead_code)]
pub fn tracing_command(log: &Trace, label: &str) -> Rc<RelayCommand> {
    let log = log.clone();
    let label = label.to_string();
    Rc::new(RelayCommand::new(move |_| {
        log.borrow_mut().push(label.clone());
        Ok(())
    }))
}

/// Command gated by `flag` that appends `label` to `log` when executed
#[allow(dead_code)]
pub fn gated_command(log: &Trace, label: &str, flag: Rc<Cell<bool>>) -> Rc<RelayCommand> {
    let log = log.clone();
    let label = label.to_string();
    Rc::new(RelayCommand::with_predicate(
        move |_| {
            log.borrow_mut().push(label.clone());
            Ok(())
        },
        move |_| flag.get(),
    ))
}

/// View model exercising stored, field-backed and derived properties
#[allow(dead_code)]
pub struct TestViewModel {
    pub base: BaseViewModel,
    pub test_tag: RefCell<String>,
    input_value: i32,
    test_property: String,
    extended_test_property: String,
}

impl ViewModel for TestViewModel {
    const DEPENDS_ON: &'static [DependsOn] = &[DependsOn::new("SquareValue", "InputValue")];

    fn init_commands(base: &mut BaseViewModel) -> Result<()> {
        base.commands_mut()
            .add_or_set("TestCommand", Rc::new(RelayCommand::new(|_| Ok(()))))
    }
}

#[allow(dead_code)]
impl TestViewModel {
    pub fn new() -> Self {
        let options = ViewModelOptions::default().with_auto_trigger(true);
        Self {
            base: BaseViewModel::with_options::<Self>(options).expect("init_commands"),
            test_tag: RefCell::new(String::new()),
            input_value: 0,
            test_property: String::new(),
            extended_test_property: String::new(),
        }
    }

    pub fn input_value(&self) -> i32 {
        self.input_value
    }

    pub fn set_input_value(&mut self, value: i32) -> bool {
        self.base.set_field(&mut self.input_value, value, "InputValue")
    }

    pub fn square_value(&self) -> i32 {
        self.input_value * self.input_value
    }

    pub fn test_property(&self) -> &str {
        &self.test_property
    }

    pub fn set_test_property(&mut self, value: &str) -> bool {
        self.base
            .set_field(&mut self.test_property, value.to_string(), "TestProperty")
    }

    pub fn set_extended_test_property(&mut self, value: &str) -> bool {
        let tag = &self.test_tag;
        self.base.set_field_with_hooks(
            &mut self.extended_test_property,
            value.to_string(),
            "ExtendedTestProperty",
            || *tag.borrow_mut() = "previous".to_string(),
            || *tag.borrow_mut() = "after".to_string(),
        )
    }

    pub fn commands(&self) -> &dyn CommandAggregator {
        self.base.commands()
    }
}
