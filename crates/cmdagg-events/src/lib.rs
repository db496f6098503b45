//! cmdagg events - type-keyed publish/subscribe bus
//!
//! Decouples view models that need to talk to each other without holding
//! references. Independent of the command and notification engine in
//! `cmdagg-core`; only the error facility and logging macros are shared.

pub mod aggregator;
pub mod errors;
pub mod event_type;

pub use aggregator::EventAggregator;
pub use errors::Result;
pub use event_type::EventType;
