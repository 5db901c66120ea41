use log::debug;

use crate::quiz::summary::{RunningScore, Summary};
use crate::quiz::{self, OptionMark, Question};

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Question `index` is on screen and unanswered.
    Presenting { index: usize },
    /// Question `index` has been answered with `selected`.
    Revealed { index: usize, selected: usize },
    Complete,
}

/// Outcome of a successful [`QuizRun::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    /// Returned once per run, when the last question is left behind.
    Completed(Summary),
}

/// One traversal of an end-of-section quiz.
///
/// Every question is scored at most once per run. Calls that don't fit the
/// current phase are ignored and return `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRun {
    title: String,
    questions: Vec<Question>,
    passing_score: Option<u8>,
    score: usize,
    phase: Phase,
}

impl QuizRun {
    /// `questions` must not be empty.
    pub fn new(
        title: impl Into<String>,
        questions: Vec<Question>,
        passing_score: Option<u8>,
    ) -> Self {
        debug_assert!(!questions.is_empty(), "a quiz needs at least one question");
        Self {
            title: title.into(),
            questions,
            passing_score,
            score: 0,
            phase: Phase::Presenting { index: 0 },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn passing_score(&self) -> Option<u8> {
        self.passing_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    /// Equals `total()` once complete.
    pub fn current_index(&self) -> usize {
        match self.phase {
            Phase::Presenting { index } | Phase::Revealed { index, .. } => index,
            Phase::Complete => self.total(),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index())
    }

    /// Records the answer to question `question` and returns whether it was
    /// correct. Only effective while that question is presented unanswered.
    pub fn select_answer(&mut self, question: usize, choice: usize) -> Option<bool> {
        let Phase::Presenting { index } = self.phase else {
            debug!("quiz {:?}: answer ignored in {:?}", self.title, self.phase);
            return None;
        };
        if index != question {
            debug!(
                "quiz {:?}: stale answer for question {}, presenting {}",
                self.title, question, index
            );
            return None;
        }
        let current = &self.questions[index];
        if choice >= current.options.len() {
            return None;
        }

        let correct = current.is_correct(choice);
        if correct {
            self.score += 1;
        }
        self.phase = Phase::Revealed {
            index,
            selected: choice,
        };
        debug!(
            "quiz {:?}: question {} answered, correct = {}, score = {}",
            self.title, index, correct, self.score
        );
        Some(correct)
    }

    /// Moves past a revealed question.
    pub fn advance(&mut self) -> Option<Advance> {
        let Phase::Revealed { index, .. } = self.phase else {
            debug!("quiz {:?}: advance ignored in {:?}", self.title, self.phase);
            return None;
        };
        let next = index + 1;
        if next < self.total() {
            self.phase = Phase::Presenting { index: next };
            Some(Advance::Next(next))
        } else {
            self.phase = Phase::Complete;
            let summary = self.summary_unchecked();
            debug!(
                "quiz {:?}: complete, {}/{}",
                self.title, summary.score, summary.total
            );
            Some(Advance::Completed(summary))
        }
    }

    /// Starts over from the first question with a zero score. Safe in any phase.
    pub fn restart(&mut self) {
        self.score = 0;
        self.phase = Phase::Presenting { index: 0 };
        debug!("quiz {:?}: restarted", self.title);
    }

    /// `(position, total)` with a 1-based position, while not complete.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.phase {
            Phase::Complete => None,
            _ => Some((self.current_index() + 1, self.total())),
        }
    }

    /// Score against the questions resolved so far: the current question
    /// only counts once it has been revealed.
    pub fn running_score(&self) -> RunningScore {
        let resolved = match self.phase {
            Phase::Presenting { index } => index,
            Phase::Revealed { index, .. } => index + 1,
            Phase::Complete => self.total(),
        };
        RunningScore {
            score: self.score,
            resolved,
        }
    }

    /// Marks for the current question's options.
    pub fn marks(&self) -> Vec<OptionMark> {
        match self.phase {
            Phase::Presenting { index } => {
                let q = &self.questions[index];
                quiz::mark_options(q.options.len(), None, q.correct_index)
            }
            Phase::Revealed { index, selected } => {
                let q = &self.questions[index];
                quiz::mark_options(q.options.len(), Some(selected), q.correct_index)
            }
            Phase::Complete => Vec::new(),
        }
    }

    /// Whether the revealed answer was correct.
    pub fn revealed_correct(&self) -> Option<bool> {
        match self.phase {
            Phase::Revealed { index, selected } => Some(self.questions[index].is_correct(selected)),
            _ => None,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self.phase {
            Phase::Revealed { index, .. } => Some(self.questions[index].explanation.as_str()),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        self.is_complete().then(|| self.summary_unchecked())
    }

    fn summary_unchecked(&self) -> Summary {
        Summary::new(self.score, self.total(), self.passing_score)
    }
}
