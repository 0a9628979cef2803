//! Multi-answer normalization and comparable keys.
//!
//! A submitted answer can be a bare letter choice, free text, a structured
//! payload carrying both, or a previously stored encoded string. Everything
//! funnels into [`AnswerSpec`], the one normalized representation both the
//! chat front end and the web form are compared through.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The fixed alphabet of letter choices. Anything outside it is dropped.
pub const CHOICE_ALPHABET: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Manual answers are truncated to this many characters after normalization.
const MANUAL_MAX_CHARS: usize = 256;

/// A raw answer as received from a front end, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    /// A bare string: a letter choice, free text, or a stored encoded value.
    Text(String),
    /// A structured payload with explicit choice and manual lists.
    Parts {
        choices: Vec<String>,
        manual: Vec<String>,
    },
    /// A flat token list; single letters become choices, the rest manual.
    Tokens(Vec<String>),
}

/// Normalized representation of one answer.
///
/// `choices` holds selected letter options (always within
/// [`CHOICE_ALPHABET`]); `manual` holds normalized free-text entries,
/// deduplicated with their first-seen order preserved.
///
/// An `AnswerSpec` with both collections empty is the canonical "no answer"
/// value. It is never correct against anything, including another empty spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpec {
    pub choices: BTreeSet<char>,
    pub manual: Vec<String>,
}

/// Storage form: compact JSON with short keys. Decoding is lenient and also
/// accepts the long keys some older payloads used.
#[derive(Debug, Serialize)]
struct StoredAnswer {
    #[serde(rename = "c")]
    choices: Vec<String>,
    #[serde(rename = "m")]
    manual: Vec<String>,
}

impl AnswerSpec {
    /// True for the canonical "no answer" value.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty() && self.manual.is_empty()
    }

    /// Decode a stored string back into a spec.
    ///
    /// The empty string is the legacy "no answer" sentinel; JSON payloads
    /// are extracted leniently; anything else is re-normalized as plain
    /// text.
    pub fn decode(stored: &str) -> Self {
        normalize(&RawAnswer::Text(stored.to_string()))
    }

    /// Encode for storage. Empty specs encode to `""` so old rows keep
    /// their meaning; everything else becomes compact JSON.
    pub fn encode(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let stored = StoredAnswer {
            choices: self.choices.iter().map(|c| c.to_string()).collect(),
            manual: self.manual.clone(),
        };
        serde_json::to_string(&stored).expect("answer payload serializes")
    }

    /// Deterministic comparison key.
    ///
    /// Empty spec → `""`. Otherwise choices are rendered as their sorted
    /// concatenation and manual entries are deduplicated, sorted, and
    /// pipe-joined; the combined shape depends on which parts are present.
    /// Callers must rely on exact-match equality only, never on the shape.
    pub fn comparable_key(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let c: String = self.choices.iter().collect();
        let m = self
            .manual
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>()
            .join("|");
        if m.is_empty() {
            format!("C:{c}")
        } else {
            format!("C:{c};M:{m}")
        }
    }
}

/// Normalize a raw answer into an [`AnswerSpec`]. Never fails: malformed or
/// out-of-alphabet input degrades to "no answer".
pub fn normalize(raw: &RawAnswer) -> AnswerSpec {
    match raw {
        RawAnswer::Text(s) => normalize_text(s),
        RawAnswer::Parts { choices, manual } => from_parts(choices, manual),
        RawAnswer::Tokens(tokens) => {
            let mut choices = Vec::new();
            let mut manual = Vec::new();
            for token in tokens {
                let t = token.trim();
                if t.chars().count() == 1 && is_choice_token(t) {
                    choices.push(t.to_string());
                } else {
                    manual.push(t.to_string());
                }
            }
            from_parts(&choices, &manual)
        }
    }
}

/// True iff `a` and `b` normalize to the same non-empty key. Two "no
/// answers" are never equivalent.
pub fn equivalent(a: &AnswerSpec, b: &AnswerSpec) -> bool {
    let key = a.comparable_key();
    !key.is_empty() && key == b.comparable_key()
}

fn normalize_text(s: &str) -> AnswerSpec {
    let s = s.trim();
    if s.is_empty() {
        return AnswerSpec::default();
    }

    // Stored JSON payload? Fall back to plain text if it doesn't parse.
    if s.starts_with('{') && s.ends_with('}') {
        if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str(s) {
            return from_json_object(&obj);
        }
    }

    if s.chars().count() == 1 && is_choice_token(s) {
        return from_parts(&[s.to_string()], &[]);
    }
    from_parts(&[], &[s.to_string()])
}

/// Lenient extraction from a stored or client-sent JSON object. Long keys
/// win over short ones; non-array values and non-string elements are
/// ignored rather than rejected.
fn from_json_object(obj: &serde_json::Map<String, serde_json::Value>) -> AnswerSpec {
    let pick = |long: &str, short: &str| -> Vec<String> {
        let value = if obj.contains_key(long) {
            obj.get(long)
        } else {
            obj.get(short)
        };
        match value {
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|x| x.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    };
    from_parts(&pick("choices", "c"), &pick("manual", "m"))
}

fn from_parts(choice_tokens: &[String], manual_tokens: &[String]) -> AnswerSpec {
    let mut choices = BTreeSet::new();
    for token in choice_tokens {
        let t = token.trim().to_uppercase();
        let mut chars = t.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if CHOICE_ALPHABET.contains(&ch) {
                choices.insert(ch);
            }
        }
    }

    let mut manual: Vec<String> = Vec::new();
    for token in manual_tokens {
        let m = normalize_manual(token);
        if !m.is_empty() && !manual.contains(&m) {
            manual.push(m);
        }
    }

    AnswerSpec { choices, manual }
}

fn is_choice_token(t: &str) -> bool {
    t.to_uppercase()
        .chars()
        .next()
        .is_some_and(|ch| CHOICE_ALPHABET.contains(&ch))
}

/// Manual-text normalization: trim, line breaks to spaces, decimal comma to
/// dot, strip all whitespace, lowercase, truncate. Keeps comparisons stable
/// across devices and input methods.
fn normalize_manual(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            continue;
        }
        let ch = if ch == ',' { '.' } else { ch };
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    if out.chars().count() > MANUAL_MAX_CHARS {
        out = out.chars().take(MANUAL_MAX_CHARS).collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> AnswerSpec {
        normalize(&RawAnswer::Text(s.to_string()))
    }

    #[test]
    fn bare_letter_is_a_choice() {
        let spec = text("b");
        assert_eq!(spec.choices.iter().collect::<String>(), "B");
        assert!(spec.manual.is_empty());
        assert_eq!(spec.comparable_key(), "C:B");
    }

    #[test]
    fn out_of_alphabet_letters_are_dropped() {
        let spec = normalize(&RawAnswer::Parts {
            choices: vec!["G".into(), "a".into(), "Z".into(), " c ".into()],
            manual: vec![],
        });
        assert_eq!(spec.choices.iter().collect::<String>(), "AC");
    }

    #[test]
    fn manual_normalization_rules() {
        let spec = text("  3,14\nkg  ");
        assert_eq!(spec.manual, vec!["3.14kg"]);
        assert_eq!(spec.comparable_key(), "C:;M:3.14kg");
    }

    #[test]
    fn manual_truncated_to_256_chars() {
        let long = "x".repeat(400);
        let spec = text(&long);
        assert_eq!(spec.manual[0].chars().count(), 256);
    }

    #[test]
    fn whitespace_only_is_no_answer() {
        assert!(text("   \n ").is_empty());
        assert_eq!(text("").comparable_key(), "");
    }

    #[test]
    fn manuals_dedup_preserving_first_seen_order() {
        let spec = normalize(&RawAnswer::Parts {
            choices: vec![],
            manual: vec!["Beta".into(), "alpha".into(), "BETA".into()],
        });
        assert_eq!(spec.manual, vec!["beta", "alpha"]);
        // key sorts them regardless of entry order
        assert_eq!(spec.comparable_key(), "C:;M:alpha|beta");
    }

    #[test]
    fn token_list_splits_choices_and_manual() {
        let spec = normalize(&RawAnswer::Tokens(vec![
            "a".into(),
            "AB".into(),
            "d".into(),
        ]));
        assert_eq!(spec.choices.iter().collect::<String>(), "AD");
        assert_eq!(spec.manual, vec!["ab"]);
    }

    #[test]
    fn empty_spec_encodes_to_legacy_sentinel() {
        assert_eq!(AnswerSpec::default().encode(), "");
        assert!(AnswerSpec::decode("").is_empty());
    }

    #[test]
    fn encode_decode_round_trip_is_stable() {
        let spec = normalize(&RawAnswer::Parts {
            choices: vec!["b".into(), "A".into()],
            manual: vec!["12,5".into()],
        });
        let encoded = spec.encode();
        assert_eq!(encoded, r#"{"c":["A","B"],"m":["12.5"]}"#);
        let decoded = AnswerSpec::decode(&encoded);
        assert_eq!(decoded, spec);
        // idempotent through a second round trip
        assert_eq!(
            AnswerSpec::decode(&decoded.encode()).comparable_key(),
            spec.comparable_key()
        );
    }

    #[test]
    fn decoder_accepts_long_keys() {
        let spec = AnswerSpec::decode(r#"{"choices":["C"],"manual":["ten"]}"#);
        assert_eq!(spec.comparable_key(), "C:C;M:ten");
    }

    #[test]
    fn malformed_json_falls_back_to_manual_text() {
        let spec = AnswerSpec::decode("{not json");
        assert_eq!(spec.manual, vec!["{notjson"]);
    }

    #[test]
    fn json_with_wrong_value_types_degrades_to_no_answer() {
        assert!(AnswerSpec::decode(r#"{"c":5,"m":"x"}"#).is_empty());
        assert!(AnswerSpec::decode(r#"{"other":true}"#).is_empty());
        // non-string array elements are skipped, not fatal
        let spec = AnswerSpec::decode(r#"{"c":["A",7],"m":[null,"ok"]}"#);
        assert_eq!(spec.comparable_key(), "C:A;M:ok");
    }

    #[test]
    fn no_answer_is_never_self_equivalent() {
        let empty = AnswerSpec::default();
        assert!(!equivalent(&empty, &empty));
        assert!(!equivalent(&empty, &text("A")));
        assert!(!equivalent(&text("A"), &empty));
    }

    #[test]
    fn equivalence_ignores_entry_order_and_case() {
        let a = normalize(&RawAnswer::Parts {
            choices: vec!["B".into(), "a".into()],
            manual: vec!["Ten".into(), "twenty".into()],
        });
        let b = normalize(&RawAnswer::Parts {
            choices: vec!["A".into(), "b".into()],
            manual: vec!["TWENTY".into(), "ten".into()],
        });
        assert!(equivalent(&a, &b));
    }

    #[test]
    fn choices_only_and_manual_only_never_collide() {
        // a lone letter with stray spacing is still a choice
        assert!(equivalent(&text("A"), &text(" a ")));
        // but a longer token is manual text, in a different key shape
        assert!(!equivalent(&text("A"), &text("ax")));
        assert_eq!(text("ax").comparable_key(), "C:;M:ax");
    }
}
