//! Admission-control error types.
//!
//! These are the structured rejections the gate reports to the calling
//! layer. Nothing in the core is fatal: malformed input degrades to "no
//! answer" and numerical edge cases degrade to clamped values, so this enum
//! covers only the cases a user or admin has to act on.

use thiserror::Error;

/// Why a submission was rejected by the gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The taker already has a stored attempt for this test. Only an admin
    /// edit of the test grants another attempt.
    #[error("test already submitted; a new attempt requires an admin edit of the test")]
    AlreadySubmitted,

    /// A Rasch-scored test cannot score real takers until every reference
    /// slot has submitted.
    #[error("reference panel incomplete: {have} of {need} reference submissions recorded")]
    ReferencePanelIncomplete { have: usize, need: usize },

    /// Reference submissions only make sense on Rasch-scored tests.
    #[error("reference submissions are only accepted for Rasch-scored tests")]
    ReferenceOnPlainTest,

    /// The reference slot index is outside the configured panel.
    #[error("reference slot {index} is out of range (expected 1..={panel})")]
    ReferenceSlotOutOfRange { index: u8, panel: u8 },
}

impl GateError {
    /// Returns `true` if the rejection clears on its own once the admin
    /// finishes entering the reference panel; the rest require a corrected
    /// request or an explicit admin edit.
    pub fn is_panel_pending(&self) -> bool {
        matches!(self, GateError::ReferencePanelIncomplete { .. })
    }
}
