//! Shared data model types for the scoring core.
//!
//! `Test` and the answer key are read-only inputs owned by the exam catalog;
//! `Submission` is the record handed to the persistence collaborator.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answer::AnswerSpec;

/// One taker's answers, keyed by question number (1..=num_questions).
/// Doubles as the answer key type: the key is just the correct sheet.
pub type AnswerSheet = BTreeMap<u32, AnswerSpec>;

/// Exam metadata. `is_rasch` is fixed at creation per category and decides
/// which scoring path applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Test {
    pub id: i64,
    pub category: String,
    pub num_questions: u32,
    pub is_rasch: bool,
}

/// Who is submitting. Reference-panel membership is a type-level fact here,
/// not a sign convention on the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Taker {
    /// A real user, identified by the surrounding application's user id.
    Real(i64),
    /// One of the synthetic reference takers, indexed 1..=panel size.
    Reference(u8),
}

impl Taker {
    pub fn is_reference(&self) -> bool {
        matches!(self, Taker::Reference(_))
    }

    /// The reference slot index, if this is a reference taker.
    pub fn reference_slot(&self) -> Option<u8> {
        match self {
            Taker::Reference(index) => Some(*index),
            Taker::Real(_) => None,
        }
    }
}

impl fmt::Display for Taker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Taker::Real(id) => write!(f, "user {id}"),
            Taker::Reference(index) => write!(f, "reference slot {index}"),
        }
    }
}

/// A persisted scoring record: one per real taker per test under normal
/// operation, replaced wholesale for reference takers on resubmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub taker: Taker,
    pub test_id: i64,
    pub answers: AnswerSheet,
    pub raw_correct: u32,
    pub total: u32,
    /// Percentage for plain tests, percentile for Rasch tests, and a
    /// placeholder 0 for reference takers.
    pub score: f64,
    pub is_rasch: bool,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taker_classification() {
        assert!(Taker::Reference(3).is_reference());
        assert!(!Taker::Real(42).is_reference());
        assert_eq!(Taker::Reference(3).reference_slot(), Some(3));
        assert_eq!(Taker::Real(42).reference_slot(), None);
    }

    #[test]
    fn taker_display() {
        assert_eq!(Taker::Real(7).to_string(), "user 7");
        assert_eq!(Taker::Reference(2).to_string(), "reference slot 2");
    }

    #[test]
    fn taker_serde_round_trip() {
        let json = serde_json::to_string(&Taker::Reference(5)).unwrap();
        assert_eq!(json, r#"{"kind":"reference","id":5}"#);
        let back: Taker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Taker::Reference(5));
    }
}
