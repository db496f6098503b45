//! View-model engine
//!
//! - [`property_store`]: type-erased per-instance values
//! - [`dependency_map`]: per-type derived-property table
//! - [`notifier`]: change broadcast with dependency fan-out, auto-trigger
//!   and suppression
//! - [`base`]: [`BaseViewModel`] tying storage, notification and the command
//!   registry together

pub mod base;
pub mod dependency_map;
pub mod notifier;
pub mod options;
pub mod property_store;

pub use base::{BaseViewModel, ViewModel};
pub use dependency_map::{DependencyMap, DependsOn};
pub use notifier::{Notifier, COMMANDS_PROPERTY};
pub use options::ViewModelOptions;
pub use property_store::PropertyStore;
