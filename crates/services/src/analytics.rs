//! Fire-and-forget analytics events emitted on screen changes.

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tracing::info;

pub const SCREEN_VIEW: &str = "screen_view";
pub const SIMULATION_START: &str = "simulation_start";
pub const SIMULATION_COMPLETE: &str = "simulation_complete";

/// Named event plus a flat property map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub properties: Map<String, Value>,
}

impl AnalyticsEvent {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Map::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn screen_view(screen_name: impl Into<String>) -> Self {
        Self::new(SCREEN_VIEW).with_property("screen_name", screen_name.into())
    }

    #[must_use]
    pub fn simulation_start(title: &str) -> Self {
        Self::new(SIMULATION_START).with_property("title", title)
    }

    #[must_use]
    pub fn simulation_complete(title: &str, score: u32) -> Self {
        Self::new(SIMULATION_COMPLETE)
            .with_property("title", title)
            .with_property("score", score)
    }

    /// Property as a string, if present and a string.
    #[must_use]
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Receiver of analytics events. Delivery is best-effort and never reports
/// failure back to the engine.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: &AnalyticsEvent) {}
}

/// Forwards events to the `tracing` subscriber at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        let properties = Value::Object(event.properties.clone());
        info!(target: "analytics", event = %event.name, %properties, "track");
    }
}

/// Keeps every event in memory; used by tests and replay tooling.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl RecordingAnalytics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Names of recorded events in emission order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|event| event.name).collect()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: &AnalyticsEvent) {
        // A poisoned lock only loses analytics.
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
