//! Scenario fixtures and a runner for exercising the power-dispatch protocol
//! end to end, outside of unit tests: builds the six literal scenarios from
//! the negotiation protocol's testable-properties catalogue as
//! [`power_dispatch::config::Scenario`] values, and drives a scenario to
//! quiescence through the real actor substrate.

pub mod fixtures;
pub mod runner;

pub use fixtures::{named_fixture, FIXTURE_NAMES};
pub use runner::run_to_quiescence;
