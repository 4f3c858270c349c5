use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BITS: f64 = 64.0;

/// Outcome classification of one test relative to its start/target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusTag {
    #[serde(rename = "imp-start")]
    ImpStart,
    #[serde(rename = "apx-start")]
    ApxStart,
    #[serde(rename = "uni-start")]
    UniStart,
    #[serde(rename = "ex-start")]
    ExStart,
    #[serde(rename = "eq-start")]
    EqStart,
    #[serde(rename = "lt-start")]
    LtStart,
    #[serde(rename = "gt-start")]
    GtStart,
    #[serde(rename = "gt-target")]
    GtTarget,
    #[serde(rename = "eq-target")]
    EqTarget,
    #[serde(rename = "lt-target")]
    LtTarget,
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "timeout")]
    Timeout,
    #[serde(rename = "crash")]
    Crash,
}

impl StatusTag {
    pub fn all() -> [StatusTag; 13] {
        [
            StatusTag::ImpStart,
            StatusTag::ApxStart,
            StatusTag::UniStart,
            StatusTag::ExStart,
            StatusTag::EqStart,
            StatusTag::LtStart,
            StatusTag::GtStart,
            StatusTag::GtTarget,
            StatusTag::EqTarget,
            StatusTag::LtTarget,
            StatusTag::Error,
            StatusTag::Timeout,
            StatusTag::Crash,
        ]
    }

    /// The tag as it appears in the JSON and as a CSS class.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImpStart => "imp-start",
            Self::ApxStart => "apx-start",
            Self::UniStart => "uni-start",
            Self::ExStart => "ex-start",
            Self::EqStart => "eq-start",
            Self::LtStart => "lt-start",
            Self::GtStart => "gt-start",
            Self::GtTarget => "gt-target",
            Self::EqTarget => "eq-target",
            Self::LtTarget => "lt-target",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Crash => "crash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ImpStart => "Improved start",
            Self::ApxStart => "Approximate start",
            Self::UniStart => "Regressed from start",
            Self::ExStart => "Exact start",
            Self::EqStart => "Equal start",
            Self::LtStart => "Less than start",
            Self::GtStart => "Greater than start",
            Self::GtTarget => "Greater than target",
            Self::EqTarget => "Equal target",
            Self::LtTarget => "Less than target",
            Self::Error => "Error",
            Self::Timeout => "Timeout",
            Self::Crash => "Crash",
        }
    }

    /// Crashes and timeouts count as bad runs.
    pub fn is_bad_run(&self) -> bool {
        matches!(self, Self::Crash | Self::Timeout)
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusTag {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusTag::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReportError::UnknownStatus(s.to_string()))
    }
}

/// Wall-clock time of a run: milliseconds, or an already formatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunTime {
    Millis(f64),
    Display(String),
}

impl RunTime {
    pub fn millis(&self) -> Option<f64> {
        match self {
            RunTime::Millis(ms) => Some(*ms),
            RunTime::Display(_) => None,
        }
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTime::Millis(ms) => f.write_str(&format_time(*ms)),
            RunTime::Display(s) => f.write_str(s),
        }
    }
}

/// Human-readable duration for a millisecond count.
pub fn format_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else if ms < 60_000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else if ms < 3_600_000.0 {
        format!("{:.1}min", ms / 60_000.0)
    } else {
        format!("{:.1}hr", ms / 3_600_000.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub status: StatusTag,
    pub start: Option<f64>,
    pub end: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    pub time: RunTime,
    pub link: String,
    #[serde(default)]
    pub bits: Option<f64>,
}

impl TestRecord {
    /// Path of the per-test detail page.
    pub fn detail_href(&self) -> String {
        format!("{}/graph.html", self.link)
    }

    /// Score scale of this test; `bits` in the JSON wins over the fallback.
    pub fn max_score(&self, fallback: f64) -> f64 {
        self.bits.unwrap_or(fallback)
    }

    /// Fraction of the score scale that is accurate, `1 - score / max`.
    pub fn accuracy(score: f64, max: f64) -> f64 {
        if max <= 0.0 {
            return 0.0;
        }
        1.0 - score / max
    }
}

/// `[cost multiplier, accuracy fraction]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostPoint(pub f64, pub f64);

impl CostPoint {
    pub fn cost(&self) -> f64 {
        self.0
    }

    pub fn accuracy(&self) -> f64 {
        self.1
    }
}

/// Initial program plus the merged improvement frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAccuracy(pub CostPoint, pub Vec<CostPoint>);

impl CostAccuracy {
    pub fn initial(&self) -> CostPoint {
        self.0
    }

    pub fn frontier(&self) -> &[CostPoint] {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub tests: Vec<TestRecord>,
    #[serde(rename = "merged-cost-accuracy")]
    pub merged_cost_accuracy: CostAccuracy,
}

impl ResultsDocument {
    pub fn from_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn count_status(&self, tag: StatusTag) -> usize {
        self.tests.iter().filter(|t| t.status == tag).count()
    }
}
