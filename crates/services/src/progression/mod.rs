mod engine;
mod progress;
mod reducer;
mod state;
mod view;

// Public API of the progression subsystem.
pub use engine::SimulationEngine;
pub use progress::StepProgress;
pub use reducer::{
    CATALOG_RESULTS_SCREEN, Context, Effect, Event, NOT_FOUND_SCREEN, Transition, bootstrap,
    reduce,
};
pub use state::{Bridge, DeepLink, ProgressState, Screen};
pub use view::{
    CatalogResults, CompletedSimulation, ProgressSnapshot, STREAK_BADGE_MIN, SimulationReview,
    StepView,
};
