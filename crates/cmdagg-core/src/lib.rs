//! cmdagg core - command aggregation and view-model notifications
//!
//! This crate provides the building blocks of a reactive view model:
//! - Commands: [`RelayCommand`] leaves and [`HierarchyCommand`] composites
//!   with configurable execute and eligibility strategies
//! - A keyed command registry ([`CommandAggregator`], [`CommandRegistry`])
//!   with an aggregate eligibility-changed signal
//! - Per-type dependency maps announcing derived properties
//! - [`BaseViewModel`]: property storage, change detection, notification
//!   fan-out, auto-trigger and suppression
//!
//! Everything here is single-threaded; handles are `Rc`-based.

pub mod aggregator;
pub mod commands;
pub mod errors;
pub mod logging_facility;
pub mod subscription;
pub mod viewmodel;

pub use cmdagg_core_types::schema;

// Re-export commonly used types
pub use aggregator::{
    AggregatorFactory, CommandAggregator, CommandAggregatorExt, CommandRegistry,
    DefaultAggregatorFactory,
};
pub use commands::{
    CanExecuteChanged, CanExecuteStrategy, Command, ExecuteOperation, ExecuteStrategy,
    HierarchyCommand, RelayCommand,
};
pub use errors::{ExError, ExErrorKind, Result, VmError};
pub use subscription::SubscriptionId;
pub use viewmodel::{
    BaseViewModel, DependencyMap, DependsOn, ViewModel, ViewModelOptions, COMMANDS_PROPERTY,
};
