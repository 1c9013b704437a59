//! Submission sequencing for the withdraw panel.
//!
//! This crate wires the pure basket core to the asynchronous transfer seam.
//! Consumers embed [`WithdrawPanel`] and feed it the panel's open/close signal
//! and the player's basket edits; the panel hands frozen baskets to a
//! [`SubmissionController`], which is the only place that awaits.
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the `Input -> Submitting -> Succeeded | Failed` machine
//! - [`panel`] owns one open session (basket + controller + defaults)
//! - [`provider`] defines the game-state and session-refresh collaborators
//! - [`error`] collects the errors surfaced to callers
pub mod controller;
pub mod error;
pub mod panel;
pub mod provider;

pub use controller::{FailureReason, SubmissionController, SubmissionOutcome, SubmissionPhase};
pub use error::{ControllerError, PanelError};
pub use panel::{PanelView, WithdrawPanel};
pub use provider::{GameStateProvider, SessionRefresh, StaticGameState};
