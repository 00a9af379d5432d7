//! Core controller infrastructure
//!
//! Logging macros and the scheduler loop that ties the signal state
//! machine to its platform collaborators.

pub mod logging;
pub mod scheduler;
