//! Error types surfaced by the submission controller and the panel session.
use thiserror::Error;
use withdraw_core::BasketError;

use crate::controller::SubmissionPhase;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// The requested action is not allowed from the current phase.
    ///
    /// A second `submit` while one is in flight lands here; it is rejected,
    /// never queued.
    #[error("cannot {action} while submission is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SubmissionPhase,
    },

    #[error("no frozen withdrawal to retry")]
    NothingToRetry,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("withdraw panel is closed")]
    Closed,

    #[error("basket is locked while submission is {0}")]
    Locked(SubmissionPhase),

    #[error(transparent)]
    Basket(#[from] BasketError),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}
