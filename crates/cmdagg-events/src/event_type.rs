/// Marker for an event published on the bus
///
/// The implementing type is the routing key; `Payload` is what handlers
/// receive. Two event types with the same payload stay distinct.
///
/// ```
/// use cmdagg_events::EventType;
///
/// struct DocumentSaved;
///
/// impl EventType for DocumentSaved {
///     type Payload = String;
/// }
/// ```
pub trait EventType: 'static {
    type Payload: 'static;

    /// Name used in logs and error messages
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
