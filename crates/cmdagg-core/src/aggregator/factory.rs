//! Selection of the aggregator implementation at composition time
//!
//! View models receive their aggregator from a factory passed to their
//! constructor. There is no process-wide registration of implementations.

use super::{CommandAggregator, CommandRegistry};

/// Produces a fresh, empty aggregator for each view model
pub trait AggregatorFactory {
    fn create(&self) -> Box<dyn CommandAggregator>;
}

/// Factory for the built-in [`CommandRegistry`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAggregatorFactory;

impl AggregatorFactory for DefaultAggregatorFactory {
    fn create(&self) -> Box<dyn CommandAggregator> {
        Box::new(CommandRegistry::new())
    }
}

/// Any closure returning an aggregator is a factory
impl<F> AggregatorFactory for F
where
    F: Fn() -> Box<dyn CommandAggregator>,
{
    fn create(&self) -> Box<dyn CommandAggregator> {
        self()
    }
}
