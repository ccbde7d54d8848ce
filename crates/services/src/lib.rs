#![forbid(unsafe_code)]

pub mod analytics;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod progression;
pub mod timer;

pub use sim_core::Clock;

pub use analytics::{
    AnalyticsEvent, AnalyticsSink, NoopAnalytics, RecordingAnalytics, TracingAnalytics,
};
pub use error::EngineError;
pub use evaluation::{Evaluation, StepFeedback};
pub use history::History;
pub use progression::{
    DeepLink, Event, ProgressSnapshot, ProgressState, Screen, SimulationEngine, SimulationReview,
    StepView,
};
pub use timer::SimTimer;
