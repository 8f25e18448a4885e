//! htmx response headers.
//!
//! Notifications and view refreshes reach the browser as client-side events
//! named in the `HX-Trigger` response header.

use serde_json::{Map, Value};

use taskdeck_core::Notification;

/// Response header carrying client-side events.
pub const HX_TRIGGER: &str = "HX-Trigger";

/// Event that shows a toast. Its detail is a serialized [`Notification`].
pub const NOTIFY_EVENT: &str = "notify";

/// Event that makes the collection listing re-fetch itself.
pub const COLLECTIONS_CHANGED_EVENT: &str = "collections-changed";

/// Builder for the `HX-Trigger` header value.
#[derive(Debug, Default)]
pub struct HxTrigger {
    events: Map<String, Value>,
}

impl HxTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notification` as a toast.
    pub fn notify(&mut self, notification: &Notification) -> &mut Self {
        let detail = serde_json::to_value(notification).unwrap_or(Value::Null);
        self.events.insert(NOTIFY_EVENT.to_owned(), detail);
        self
    }

    /// Re-fetch the collection listing.
    pub fn refresh_collections(&mut self) -> &mut Self {
        self.events
            .insert(COLLECTIONS_CHANGED_EVENT.to_owned(), Value::Bool(true));
        self
    }

    /// The header value, or `None` when no event was added.
    #[must_use]
    pub fn header_value(&self) -> Option<String> {
        if self.events.is_empty() {
            None
        } else {
            Some(Value::Object(self.events.clone()).to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trigger_has_no_header() {
        assert!(HxTrigger::new().header_value().is_none());
    }

    #[test]
    fn test_notify_and_refresh() {
        let mut trigger = HxTrigger::new();
        trigger
            .notify(&Notification::collection_created())
            .refresh_collections();

        let header: Value = serde_json::from_str(&trigger.header_value().unwrap()).unwrap();
        assert_eq!(header["notify"]["title"], "Success");
        assert_eq!(header["notify"]["variant"], "default");
        assert_eq!(header["collections-changed"], true);
    }
}
