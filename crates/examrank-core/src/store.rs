//! Persistence seam for submissions.
//!
//! The core never talks to a database; the surrounding application
//! implements [`SubmissionStore`] over whatever it persists with. The
//! in-memory [`MemoryStore`] serves tests and embedders that don't need
//! durability.

use std::collections::BTreeSet;

use crate::model::{AnswerSheet, Submission, Taker};

/// Storage operations the gate needs from the persistence collaborator.
///
/// Implementations must keep submissions in arrival order per test: the
/// matrix built from [`answer_sheets`](SubmissionStore::answer_sheets) relies
/// on it, and under normal operation the reference panel lands first.
pub trait SubmissionStore {
    /// Whether any submission exists for this taker and test.
    fn has_submission(&self, taker: Taker, test_id: i64) -> bool;

    /// Number of reference-panel submissions recorded for this test.
    fn reference_submission_count(&self, test_id: i64) -> usize;

    /// Reference slot indices that have submitted for this test, ascending.
    fn reference_slots_done(&self, test_id: i64) -> Vec<u8>;

    /// Every stored answer sheet for this test, in submission order.
    ///
    /// Sheets come back raw: correctness is always re-evaluated against the
    /// current answer key when a matrix is built, so an admin key edit
    /// retroactively changes what "correct" meant for old rows.
    fn answer_sheets(&self, test_id: i64) -> Vec<AnswerSheet>;

    /// Delete all submissions for this taker and test.
    fn delete_submissions(&mut self, taker: Taker, test_id: i64);

    /// Delete every real (non-reference) taker's submissions for this test.
    /// Implementations backed by the application should also drop the
    /// matching certificates.
    fn purge_real_submissions(&mut self, test_id: i64);

    /// Persist an accepted submission.
    fn insert(&mut self, submission: Submission);
}

/// In-memory store keeping submissions in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    submissions: Vec<Submission>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored submissions, in insertion order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// The most recent submission for a taker and test, if any.
    pub fn latest(&self, taker: Taker, test_id: i64) -> Option<&Submission> {
        self.submissions
            .iter()
            .rev()
            .find(|s| s.taker == taker && s.test_id == test_id)
    }
}

impl SubmissionStore for MemoryStore {
    fn has_submission(&self, taker: Taker, test_id: i64) -> bool {
        self.submissions
            .iter()
            .any(|s| s.taker == taker && s.test_id == test_id)
    }

    fn reference_submission_count(&self, test_id: i64) -> usize {
        self.submissions
            .iter()
            .filter(|s| s.test_id == test_id && s.taker.is_reference())
            .count()
    }

    fn reference_slots_done(&self, test_id: i64) -> Vec<u8> {
        self.submissions
            .iter()
            .filter(|s| s.test_id == test_id)
            .filter_map(|s| s.taker.reference_slot())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn answer_sheets(&self, test_id: i64) -> Vec<AnswerSheet> {
        self.submissions
            .iter()
            .filter(|s| s.test_id == test_id)
            .map(|s| s.answers.clone())
            .collect()
    }

    fn delete_submissions(&mut self, taker: Taker, test_id: i64) {
        self.submissions
            .retain(|s| !(s.taker == taker && s.test_id == test_id));
    }

    fn purge_real_submissions(&mut self, test_id: i64) {
        self.submissions
            .retain(|s| s.test_id != test_id || s.taker.is_reference());
    }

    fn insert(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }
}
