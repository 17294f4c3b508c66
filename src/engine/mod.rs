//! Request-dispatch engine: admission control, request cycles, and the
//! dispatch loop that drives them.
mod admission;
mod dispatch;
mod drain;
mod executor;


pub use admission::{AdmissionController, Permit};
pub use dispatch::{DRAIN_GRACE_PERIOD, DispatchSummary, StopReason, run_dispatch_loop};
pub use drain::DrainTracker;
pub use executor::{CycleContext, CycleOutcome, execute_cycle};
