use std::{collections::HashMap, fmt};

use serde::Serialize;

/// The score of a facility with no detected defects.
pub const BASELINE_SCORE: u8 = 100;

/// Deduction applied to a label the penalty table doesn't know about.
pub const DEFAULT_PENALTY: u32 = 5;

const DEFAULT_PENALTIES: [(&str, u32); 9] = [
    ("clogged_sink", 15),
    ("dirt-floor", 10),
    ("dirty", 20),
    ("mold_or_mildew", 10),
    ("tissue_trash", 5),
    ("urine_stain", 15),
    ("bottle", 10),
    ("cup", 8),
    ("trash", 15),
];

/// Letter grade of a cleanliness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Thresholds are inclusive at the lower end, checked from the top.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            75.. => Grade::B,
            60.. => Grade::C,
            40.. => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score together with the grade derived from it.
///
/// The only way to build one is from a score, so the two can never disagree.
/// Serializes as `{"score": .., "grade": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    score: u8,
    grade: Grade,
}

impl Rating {
    /// Scores above 100 are capped.
    pub fn from_score(score: u8) -> Self {
        let score = score.min(BASELINE_SCORE);

        Self {
            score,
            grade: Grade::from_score(score),
        }
    }

    /// Rating of a freshly created facility.
    pub fn perfect() -> Self {
        Self::from_score(BASELINE_SCORE)
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::perfect()
    }
}

/// Label → deduction mapping used to turn detections into a score.
///
/// Penalties are stored as positive deductions from [`BASELINE_SCORE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyTable {
    penalties: HashMap<String, u32>,
    default_penalty: u32,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_PENALTIES
                .iter()
                .map(|(label, penalty)| (label.to_string(), *penalty)),
            DEFAULT_PENALTY,
        )
    }
}

impl PenaltyTable {
    pub fn new(penalties: impl IntoIterator<Item = (String, u32)>, default_penalty: u32) -> Self {
        Self {
            penalties: penalties.into_iter().collect(),
            default_penalty,
        }
    }

    /// Add or replace entries, keeping everything else.
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, u32)>) -> Self {
        self.penalties.extend(overrides);
        self
    }

    pub fn with_default_penalty(mut self, default_penalty: u32) -> Self {
        self.default_penalty = default_penalty;
        self
    }

    pub fn default_penalty(&self) -> u32 {
        self.default_penalty
    }

    pub fn penalty_for(&self, label: &str) -> u32 {
        self.penalties
            .get(label)
            .copied()
            .unwrap_or(self.default_penalty)
    }

    /// Deduct the penalty of every label from the baseline, floored at 0.
    pub fn score<I, S>(&self, labels: I) -> Rating
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let total = labels
            .into_iter()
            .map(|label| self.penalty_for(label.as_ref()))
            .fold(0u32, u32::saturating_add);

        let remaining = u32::from(BASELINE_SCORE).saturating_sub(total);

        // remaining <= BASELINE_SCORE, fits in u8
        Rating::from_score(remaining as u8)
    }
}

/// Score labels against the built-in penalty table.
pub fn score<I, S>(labels: I) -> Rating
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    PenaltyTable::default().score(labels)
}
