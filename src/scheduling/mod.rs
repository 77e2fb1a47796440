//! Personal training session scheduling.
//!
//! Split into a pure [`planner`] that decides which room a session gets and
//! a [`scheduler`] that runs that decision inside a write transaction.

pub mod planner;
pub mod scheduler;

pub use scheduler::Scheduler;
