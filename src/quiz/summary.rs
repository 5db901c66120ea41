use std::fmt;

/// Feedback tier for a finished run. Checked in declaration order, each
/// threshold being an inclusive lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Rounds to 100%.
    Perfect,
    /// At least 80%.
    Strong,
    /// At least 60%.
    Pass,
    NeedsReview,
}

impl Band {
    pub fn for_score(score: usize, total: usize) -> Self {
        // The top tier goes by the rounded percentage, the rest by the raw
        // score in integer form (`score >= 0.8 * total`).
        if percentage(score, total) == 100 {
            Band::Perfect
        } else if 5 * score >= 4 * total {
            Band::Strong
        } else if 5 * score >= 3 * total {
            Band::Pass
        } else {
            Band::NeedsReview
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Band::Perfect => "Perfect score! You have mastered this section.",
            Band::Strong => "Excellent work! You have a strong understanding of this section.",
            Band::Pass => "Good effort! You have passed, but review the topics you missed.",
            Band::NeedsReview => "Keep studying. Review the section material and try again.",
        }
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    pub percentage: u8,
    pub band: Band,
    /// Pass mark configured for the quiz, in percent. Display only.
    pub passing_score: Option<u8>,
}

impl Summary {
    pub fn new(score: usize, total: usize, passing_score: Option<u8>) -> Self {
        Self {
            score,
            total,
            percentage: percentage(score, total),
            band: Band::for_score(score, total),
            passing_score,
        }
    }

    pub fn meets_passing_score(&self) -> Option<bool> {
        self.passing_score.map(|mark| self.percentage >= mark)
    }
}

/// `round(100 * score / total)`, halves rounded up.
pub fn percentage(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * score + total) / (2 * total)) as u8
}

/// Score against the questions resolved so far; `0/0` before the first answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningScore {
    pub score: usize,
    pub resolved: usize,
}

impl fmt::Display for RunningScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.resolved)
    }
}
