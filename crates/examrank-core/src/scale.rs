//! Public score scales derived from a percentile.
//!
//! Pure mappings only; which scale a certificate shows is decided by the
//! test's category in the surrounding application.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Map a percentile onto the 200–800 numeric scale.
///
/// Input is clamped to `[0, 100]`, so the output is always in `[200, 800]`.
pub fn scaled_score(percentile: f64) -> u32 {
    let p = if percentile.is_finite() {
        percentile.clamp(0.0, 100.0)
    } else {
        0.0
    };
    (200.0 + 6.0 * p).round() as u32
}

/// Lettered tier with fixed percentage bands. Below 50 is unranked.
///
/// Bands are half-open, inclusive at the lower edge: `[50,60)` → C,
/// `[60,70)` → C+, `[70,80)` → B, `[80,90)` → B+, `[90,95)` → A,
/// `[95,100]` → A+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Unranked,
    C,
    CPlus,
    B,
    BPlus,
    A,
    APlus,
}

impl Tier {
    pub fn from_percentile(percentile: f64) -> Tier {
        if !percentile.is_finite() || percentile < 50.0 {
            Tier::Unranked
        } else if percentile < 60.0 {
            Tier::C
        } else if percentile < 70.0 {
            Tier::CPlus
        } else if percentile < 80.0 {
            Tier::B
        } else if percentile < 90.0 {
            Tier::BPlus
        } else if percentile < 95.0 {
            Tier::A
        } else {
            Tier::APlus
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Unranked => "-",
            Tier::C => "C",
            Tier::CPlus => "C+",
            Tier::B => "B",
            Tier::BPlus => "B+",
            Tier::A => "A",
            Tier::APlus => "A+",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" => Ok(Tier::Unranked),
            "C" => Ok(Tier::C),
            "C+" => Ok(Tier::CPlus),
            "B" => Ok(Tier::B),
            "B+" => Ok(Tier::BPlus),
            "A" => Ok(Tier::A),
            "A+" => Ok(Tier::APlus),
            other => Err(format!("unknown tier label: {other}")),
        }
    }
}
