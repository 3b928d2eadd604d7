//! Acquisition rig: the camera loop and the state it shares with the UI.
//!
//! Overview
//! - [`hardware`] declares the [`Camera`] and [`FrameSink`] seams the loop
//!   runs against, so tests can script both sides.
//! - [`AcquisitionWorker`] owns the camera thread. Every frame is presented;
//!   detection runs on every Nth frame and feeds the shared tracker and
//!   overlay. Pause is a drain handshake the UI uses as a resize barrier,
//!   and the same handshake makes detection toggle-off a total cancellation.
//!
//! Modules
//! - `hardware`: collaborator traits.
//! - `worker`: the acquisition loop, its run-state machine and the handle.

pub mod hardware;
mod worker;

pub use hardware::{Camera, FrameSink};
pub use worker::{AcquisitionWorker, RigParams};
