//! Main-window view model driven from the console
//!
//! Run with `cargo run --example save_all_demo`. Set `RUST_LOG=cmdagg=trace`
//! to see the notification fan-out.

use std::rc::Rc;

use cmdagg_core::commands::{CanExecuteStrategy, ExecuteStrategy, HierarchyCommand, RelayCommand};
use cmdagg_core::logging_facility::{init, Profile};
use cmdagg_core::viewmodel::{BaseViewModel, DependsOn, ViewModel, ViewModelOptions};
use cmdagg_core::{CommandAggregator, Result, COMMANDS_PROPERTY};
use futures::executor::block_on;
use serde_json::{json, Value};

struct MainViewModel {
    base: BaseViewModel,
    string_input: String,
    can_save2: bool,
}

impl ViewModel for MainViewModel {
    const DEPENDS_ON: &'static [DependsOn] = &[DependsOn::new("StringOutput", "StringInput")];

    fn init_commands(base: &mut BaseViewModel) -> Result<()> {
        let properties = base.properties();

        let allowed = properties.clone();
        let hello = RelayCommand::builder()
            .execute_async(|name: Value| async move {
                println!("Hello, {}", name.as_str().unwrap_or("world"));
                Ok(())
            })
            .can_execute(move |_| allowed.get("IsAllowed", false))
            .build()?;
        base.commands_mut().add_or_set("HelloCommand", Rc::new(hello))?;

        let can_save1 = properties.clone();
        let save1 = Rc::new(RelayCommand::with_predicate(
            |_| {
                println!("Save 1 called");
                Ok(())
            },
            move |_| can_save1.get("CanSave1", false),
        ));
        let can_save2 = properties;
        let save2 = Rc::new(RelayCommand::with_predicate(
            |_| {
                println!("Save 2 called");
                Ok(())
            },
            move |_| can_save2.get("CanSave2", false),
        ));
        base.commands_mut().add_or_set("SaveCmd1", save1.clone())?;
        base.commands_mut().add_or_set("SaveCmd2", save2.clone())?;

        let save_all = HierarchyCommand::new(
            ExecuteStrategy::MasterOnly,
            CanExecuteStrategy::DependsOnAllChildren,
        )
        .with_execute(|_| {
            println!("Save All called");
            Ok(())
        });
        save_all.add_child(save1);
        save_all.add_child(save2);
        base.commands_mut().add_or_set("SaveAll", Rc::new(save_all))
    }
}

impl MainViewModel {
    fn new() -> Result<Self> {
        let options = ViewModelOptions::default().with_auto_trigger(true);
        Ok(Self {
            base: BaseViewModel::with_options::<Self>(options)?,
            string_input: String::new(),
            can_save2: false,
        })
    }

    fn set_is_allowed(&self, value: bool) {
        self.base.set("IsAllowed", value);
    }

    fn set_can_save1(&self, value: bool) {
        self.base.set("CanSave1", value);
    }

    // backing field kept here; the commands read the mirrored stored value
    fn set_can_save2(&mut self, value: bool) {
        let properties = self.base.properties();
        let notifier = self.base.notifier();
        self.base.set_field_with_hooks(
            &mut self.can_save2,
            value,
            "CanSave2",
            || {},
            move || {
                properties.insert("CanSave2", value);
                notifier.notify_changed(COMMANDS_PROPERTY);
            },
        );
    }

    fn set_string_input(&mut self, value: &str) {
        self.base
            .set_field(&mut self.string_input, value.to_string(), "StringInput");
    }

    fn string_output(&self) -> String {
        format!("Length: {}", self.string_input.chars().count())
    }

    fn report(&self) {
        for key in self.base.commands().keys() {
            let eligible = self
                .base
                .commands()
                .can_execute(&key, &Value::Null)
                .unwrap_or(false);
            println!("  {:<14} can_execute = {}", key, eligible);
        }
    }
}

fn main() -> Result<()> {
    init(Profile::Development);

    let mut vm = MainViewModel::new()?;
    vm.base.subscribe(|name| println!("  -> PropertyChanged({})", name));

    println!("Initial state:");
    vm.report();

    println!("\nAllow hello, enable Save 1:");
    vm.set_is_allowed(true);
    vm.set_can_save1(true);
    vm.report();
    block_on(vm.base.commands().execute_async("HelloCommand", &json!("demo")))?;

    println!("\nEnable Save 2:");
    vm.set_can_save2(true);
    vm.report();
    vm.base.commands().execute("SaveAll", &Value::Null)?;

    println!("\nType into the input box:");
    vm.set_string_input("cmdagg");
    println!("  {}", vm.string_output());

    Ok(())
}
