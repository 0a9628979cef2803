//! Submission admission control and score dispatch.
//!
//! The gate is the one entry point for scoring a submission: it enforces
//! the one-attempt rule and reference-panel completeness, then routes to
//! the plain-percentage or percentile path and hands the record to the
//! store.

use chrono::Utc;

use crate::check::{evaluate, CheckResult};
use crate::error::GateError;
use crate::model::{AnswerSheet, Submission, Taker, Test};
use crate::percentile::percentile_score;
use crate::rasch::CalibrationConfig;
use crate::store::SubmissionStore;

/// Scoring rules: panel size and calibration schedule. Production uses the
/// defaults; tests substitute smaller panels.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Number of reference takers that must submit before a Rasch test can
    /// score real takers.
    pub panel_size: u8,
    pub calibration: CalibrationConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            panel_size: 10,
            calibration: CalibrationConfig::default(),
        }
    }
}

/// What the caller gets back for an accepted submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub check: CheckResult,
    /// Percentage for plain tests, percentile for Rasch tests, 0 for
    /// reference takers.
    pub score: f64,
}

/// Completeness of the reference panel for one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStatus {
    /// Slot indices that have submitted, ascending.
    pub done: Vec<u8>,
    pub have: usize,
    pub need: usize,
}

impl PanelStatus {
    pub fn is_complete(&self) -> bool {
        self.have >= self.need
    }
}

/// Process one submission end to end.
///
/// Reference takers skip the duplicate and panel checks: a reference slot is
/// always resubmittable, and resubmission replaces the slot's prior record.
/// Their stored score is a placeholder 0 — a reference ability only matters
/// inside someone else's calibration run.
///
/// For Rasch tests the percentile is computed over every sheet recorded so
/// far, each re-evaluated against the current key, plus this one.
pub fn submit<S: SubmissionStore>(
    store: &mut S,
    test: &Test,
    key: &AnswerSheet,
    taker: Taker,
    answers: AnswerSheet,
    config: &ScoringConfig,
) -> Result<SubmissionOutcome, GateError> {
    match taker {
        Taker::Reference(index) => {
            if !test.is_rasch {
                return Err(GateError::ReferenceOnPlainTest);
            }
            if index == 0 || index > config.panel_size {
                return Err(GateError::ReferenceSlotOutOfRange {
                    index,
                    panel: config.panel_size,
                });
            }

            // Replace the slot's prior record, if any.
            store.delete_submissions(taker, test.id);

            let check = evaluate(&answers, key, test.num_questions);
            store.insert(Submission {
                taker,
                test_id: test.id,
                answers,
                raw_correct: check.raw_correct,
                total: check.total,
                score: 0.0,
                is_rasch: true,
                submitted_at: Utc::now(),
            });
            tracing::info!(test_id = test.id, slot = index, "reference submission stored");
            Ok(SubmissionOutcome { check, score: 0.0 })
        }
        Taker::Real(_) => {
            if store.has_submission(taker, test.id) {
                tracing::warn!(test_id = test.id, %taker, "duplicate submission rejected");
                return Err(GateError::AlreadySubmitted);
            }
            if test.is_rasch {
                let have = store.reference_submission_count(test.id);
                let need = config.panel_size as usize;
                if have < need {
                    tracing::warn!(
                        test_id = test.id,
                        have,
                        need,
                        "submission rejected, reference panel incomplete"
                    );
                    return Err(GateError::ReferencePanelIncomplete { have, need });
                }
            }

            let check = evaluate(&answers, key, test.num_questions);
            let score = if test.is_rasch {
                let rows = correctness_rows(store, test, key);
                percentile_score(&rows, &check.per_question, &config.calibration)
            } else {
                check.percentage
            };

            store.insert(Submission {
                taker,
                test_id: test.id,
                answers,
                raw_correct: check.raw_correct,
                total: check.total,
                score,
                is_rasch: test.is_rasch,
                submitted_at: Utc::now(),
            });
            tracing::info!(
                test_id = test.id,
                %taker,
                raw_correct = check.raw_correct,
                score,
                "submission scored"
            );
            Ok(SubmissionOutcome { check, score })
        }
    }
}

/// Panel completeness for a test, for the admin console and the pre-flight
/// check front ends show before letting a user start a Rasch test.
pub fn panel_status<S: SubmissionStore>(
    store: &S,
    test_id: i64,
    config: &ScoringConfig,
) -> PanelStatus {
    let done: Vec<u8> = store
        .reference_slots_done(test_id)
        .into_iter()
        .filter(|index| (1..=config.panel_size).contains(index))
        .collect();
    PanelStatus {
        have: done.len(),
        need: config.panel_size as usize,
        done,
    }
}

/// Handle an admin edit of a test's document or answer key: every real
/// taker's attempt (and, via the store, their certificates) is cleared so
/// they can submit again. The reference panel survives the edit.
pub fn reset_after_edit<S: SubmissionStore>(store: &mut S, test_id: i64) {
    store.purge_real_submissions(test_id);
    tracing::info!(test_id, "real submissions cleared after test edit");
}

/// Correctness rows for every sheet stored for this test, evaluated against
/// the current key, in submission order.
fn correctness_rows<S: SubmissionStore>(store: &S, test: &Test, key: &AnswerSheet) -> Vec<Vec<bool>> {
    store
        .answer_sheets(test.id)
        .iter()
        .map(|sheet| evaluate(sheet, key, test.num_questions).per_question)
        .collect()
}
