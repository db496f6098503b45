use std::cell::RefCell;
use std::rc::Rc;

use cmdagg_events::EventType;

/// Event carrying a text payload
pub struct TextChanged;

impl EventType for TextChanged {
    type Payload = String;
}

/// Second event with the same payload type, routed separately
pub struct TitleChanged;

impl EventType for TitleChanged {
    type Payload = String;
}

/// Shared log of `(subscriber, payload)` deliveries
pub type Deliveries = Rc<RefCell<Vec<(String, String)>>>;

#[allow(dead_code)]
pub fn deliveries() -> Deliveries {
    Rc::new(RefCell::new(Vec::new()))
}

/// Handler that records deliveries under `subscriber`
#[allow(dead_code)]
pub fn recorder(log: &Deliveries, subscriber: &str) -> impl Fn(&String) + 'static {
    let log = log.clone();
    let subscriber = subscriber.to_string();
    move |payload| {
        log.borrow_mut()
            .push((subscriber.clone(), payload.clone()))
    }
}
