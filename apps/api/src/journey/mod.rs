// Soft-Skills Journey: 30-day gamified coaching curriculum.
// catalog, progress, gate and transition are pure (no I/O, no logging, `now` is always a parameter).
// store and service sit at the boundary and own persistence and tracing.

pub mod catalog;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod progress;
pub mod service;
pub mod store;
pub mod transition;

// Re-export the types shared with app state and the error boundary.
pub use catalog::Catalog;
pub use error::JourneyError;
pub use progress::JourneyRules;
