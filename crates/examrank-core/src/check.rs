//! Question-by-question correctness evaluation.

use serde::{Deserialize, Serialize};

use crate::answer::{equivalent, AnswerSpec};
use crate::model::AnswerSheet;

/// The result of checking one answer sheet against a key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub raw_correct: u32,
    pub total: u32,
    /// `raw_correct / total * 100`, the score for plain (non-Rasch) tests.
    pub percentage: f64,
    /// Exactly `total` entries, in question order.
    pub per_question: Vec<bool>,
}

/// Evaluate an answer sheet against the key over questions 1..=total.
///
/// Iterates question numbers rather than map keys, so missing answers (on
/// either side) count as incorrect instead of erroring. Pure function.
pub fn evaluate(answers: &AnswerSheet, key: &AnswerSheet, total: u32) -> CheckResult {
    let empty = AnswerSpec::default();
    let mut per_question = Vec::with_capacity(total as usize);
    let mut raw_correct = 0u32;

    for q in 1..=total {
        let submitted = answers.get(&q).unwrap_or(&empty);
        let correct = key.get(&q).unwrap_or(&empty);
        let ok = equivalent(submitted, correct);
        per_question.push(ok);
        if ok {
            raw_correct += 1;
        }
    }

    // The catalog guarantees total >= 1, but keep the guard.
    let percentage = f64::from(raw_correct) / f64::from(total.max(1)) * 100.0;

    CheckResult {
        raw_correct,
        total,
        percentage,
        per_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{normalize, RawAnswer};

    fn sheet(entries: &[(u32, &str)]) -> AnswerSheet {
        entries
            .iter()
            .map(|(q, a)| (*q, normalize(&RawAnswer::Text((*a).to_string()))))
            .collect()
    }

    #[test]
    fn counts_matches_and_computes_percentage() {
        let key = sheet(&[(1, "A"), (2, "B"), (3, "42")]);
        let answers = sheet(&[(1, "a"), (2, "C"), (3, " 42 ")]);
        let result = evaluate(&answers, &key, 3);
        assert_eq!(result.raw_correct, 2);
        assert_eq!(result.per_question, vec![true, false, true]);
        assert!((result.percentage - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn missing_answers_are_incorrect_not_errors() {
        let key = sheet(&[(1, "A"), (2, "B"), (3, "C"), (4, "D")]);
        let answers = sheet(&[(2, "B")]);
        let result = evaluate(&answers, &key, 4);
        assert_eq!(result.raw_correct, 1);
        assert_eq!(result.per_question.len(), 4);
    }

    #[test]
    fn per_question_length_matches_total_regardless_of_maps() {
        // answers and key both carry question numbers outside 1..=total
        let key = sheet(&[(7, "A"), (9, "B")]);
        let answers = sheet(&[(1, "A"), (7, "A")]);
        let result = evaluate(&answers, &key, 5);
        assert_eq!(result.per_question.len(), 5);
        assert_eq!(result.raw_correct, 0);
    }

    #[test]
    fn unkeyed_question_is_never_correct_even_when_both_blank() {
        let key = sheet(&[(1, "A")]);
        let answers = sheet(&[(1, "A")]);
        // question 2 has no key and no answer: both sides "no answer"
        let result = evaluate(&answers, &key, 2);
        assert_eq!(result.per_question, vec![true, false]);
    }

    #[test]
    fn zero_total_yields_zero_percentage() {
        let result = evaluate(&AnswerSheet::new(), &AnswerSheet::new(), 0);
        assert_eq!(result.raw_correct, 0);
        assert_eq!(result.percentage, 0.0);
        assert!(result.per_question.is_empty());
    }
}
