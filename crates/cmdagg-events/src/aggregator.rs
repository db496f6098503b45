//! Event aggregator keyed by event type
//!
//! ## Logging Ownership
//!
//! `publish` owns lifecycle logging (`log_op_start!` / `log_op_end!`).
//! Subscription changes are traced at debug level.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use cmdagg_core::{log_op_end, log_op_error, log_op_start};

use crate::errors::{self, Result};
use crate::event_type::EventType;

type Handler<P> = Rc<dyn Fn(&P)>;

struct Registration {
    subscriber: String,
    // Handler<E::Payload> behind Any, keyed by TypeId::of::<E>()
    handler: Rc<dyn Any>,
}

/// Type-keyed publish/subscribe bus
///
/// Each subscriber identifies itself with an explicit id; one subscriber
/// may register at most one handler per event type. Handlers run
/// synchronously, in subscription order, on the publishing thread.
#[derive(Default)]
pub struct EventAggregator {
    subscriptions: RefCell<HashMap<TypeId, Vec<Registration>>>,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `E` on behalf of `subscriber`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `subscriber` is empty
    /// - `DuplicateRegistration` if `subscriber` already handles `E`
    pub fn subscribe<E: EventType>(
        &self,
        subscriber: &str,
        handler: impl Fn(&E::Payload) + 'static,
    ) -> Result<()> {
        if subscriber.trim().is_empty() {
            return Err(errors::invalid_subscriber(
                "Subscriber id cannot be empty or whitespace-only",
            ));
        }

        let mut subscriptions = self.subscriptions.borrow_mut();
        let registrations = subscriptions.entry(TypeId::of::<E>()).or_default();
        if registrations.iter().any(|r| r.subscriber == subscriber) {
            return Err(errors::duplicate_registration(E::name(), subscriber));
        }

        let handler: Handler<E::Payload> = Rc::new(handler);
        registrations.push(Registration {
            subscriber: subscriber.to_string(),
            handler: Rc::new(handler),
        });
        tracing::debug!(event_type = E::name(), subscriber, "subscribed");
        Ok(())
    }

    /// Remove `subscriber`'s handler for `E`; returns whether one existed
    pub fn unsubscribe<E: EventType>(&self, subscriber: &str) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let Some(registrations) = subscriptions.get_mut(&TypeId::of::<E>()) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|r| r.subscriber != subscriber);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            subscriptions.remove(&TypeId::of::<E>());
        }
        if removed {
            tracing::debug!(event_type = E::name(), subscriber, "unsubscribed");
        }
        removed
    }

    /// Remove every registration for every event type
    pub fn clear_all(&self) {
        self.subscriptions.borrow_mut().clear();
        tracing::debug!("all subscriptions cleared");
    }

    /// Whether `subscriber` handles at least one event type
    pub fn has_registrations(&self, subscriber: &str) -> bool {
        self.subscriptions
            .borrow()
            .values()
            .flatten()
            .any(|r| r.subscriber == subscriber)
    }

    /// Number of handlers registered for `E`
    pub fn subscriber_count<E: EventType>(&self) -> usize {
        self.subscriptions
            .borrow()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Deliver `payload` to every handler of `E`
    ///
    /// Returns the number of handlers invoked. Handlers may subscribe,
    /// unsubscribe or publish while being called; changes apply to the
    /// next publication.
    ///
    /// # Errors
    ///
    /// `Internal` if a stored handler does not match the event's payload.
    pub fn publish<E: EventType>(&self, payload: &E::Payload) -> Result<usize> {
        log_op_start!("event_publish", event_type = E::name());
        let start = Instant::now();

        let snapshot: Vec<Rc<dyn Any>> = self
            .subscriptions
            .borrow()
            .get(&TypeId::of::<E>())
            .map(|registrations| registrations.iter().map(|r| r.handler.clone()).collect())
            .unwrap_or_default();

        for handler in &snapshot {
            let Some(handler) = handler.downcast_ref::<Handler<E::Payload>>() else {
                let err = errors::handler_type_mismatch(E::name());
                log_op_error!(
                    "event_publish",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    event_type = E::name()
                );
                return Err(err);
            };
            handler(payload);
        }

        log_op_end!(
            "event_publish",
            duration_ms = start.elapsed().as_millis() as u64,
            event_type = E::name(),
            handler_count = snapshot.len()
        );
        Ok(snapshot.len())
    }
}

impl Drop for EventAggregator {
    fn drop(&mut self) {
        self.subscriptions.get_mut().clear();
    }
}

impl std::fmt::Debug for EventAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventAggregator")
            .field("event_types", &self.subscriptions.borrow().len())
            .finish()
    }
}
