use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::quiz::{self, OptionMark, QuestionId};

/// The choices an inline check offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    /// Fixed `True`/`False` pair.
    TrueFalse { correct: bool },
    Options {
        options: Vec<String>,
        correct_index: usize,
    },
}

/// A user's answer to an inline check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Bool(bool),
    Index(usize),
}

/// Question embedded in a section's reading content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCheck", into = "RawCheck")]
pub struct CheckQuestion {
    pub id: QuestionId,
    pub text: String,
    pub choices: Choices,
    pub explanation: String,
}

/// On-disk shape: `correctAnswer` is a bool for the True/False form and an
/// index otherwise.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheck {
    id: QuestionId,
    #[serde(alias = "question", alias = "prompt")]
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(rename = "correctAnswer", alias = "correctIndex")]
    correct: RawCorrect,
    explanation: String,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCorrect {
    Flag(bool),
    Index(usize),
}

impl TryFrom<RawCheck> for CheckQuestion {
    type Error = String;

    fn try_from(raw: RawCheck) -> Result<Self, Self::Error> {
        let choices = match raw.correct {
            RawCorrect::Flag(correct) if raw.options.is_empty() => Choices::TrueFalse { correct },
            RawCorrect::Flag(_) => {
                return Err(format!(
                    "check {}: a boolean answer can't be combined with options",
                    raw.id
                ))
            }
            RawCorrect::Index(correct_index) => Choices::Options {
                options: raw.options,
                correct_index,
            },
        };
        Ok(Self {
            id: raw.id,
            text: raw.text,
            choices,
            explanation: raw.explanation,
        })
    }
}

impl From<CheckQuestion> for RawCheck {
    fn from(check: CheckQuestion) -> Self {
        let (options, correct) = match check.choices {
            Choices::TrueFalse { correct } => (Vec::new(), RawCorrect::Flag(correct)),
            Choices::Options {
                options,
                correct_index,
            } => (options, RawCorrect::Index(correct_index)),
        };
        Self {
            id: check.id,
            text: check.text,
            options,
            correct,
            explanation: check.explanation,
        }
    }
}

impl CheckQuestion {
    pub fn true_false(
        id: QuestionId,
        text: impl Into<String>,
        correct: bool,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            choices: Choices::TrueFalse { correct },
            explanation: explanation.into(),
        }
    }

    pub fn multiple_choice(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            choices: Choices::Options {
                options,
                correct_index,
            },
            explanation: explanation.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        quiz::check_text(&self.id, &self.text, &self.explanation)?;
        match &self.choices {
            Choices::TrueFalse { .. } => Ok(()),
            Choices::Options {
                options,
                correct_index,
            } => quiz::check_options(&self.id, options, *correct_index),
        }
    }

    /// Option labels in display order. `True`/`False` for the binary form.
    pub fn labels(&self) -> Vec<String> {
        match &self.choices {
            Choices::TrueFalse { .. } => vec!["True".to_string(), "False".to_string()],
            Choices::Options { options, .. } => options.clone(),
        }
    }

    /// `None` when the choice doesn't fit this question.
    fn judge(&self, choice: Choice) -> Option<bool> {
        match (&self.choices, choice) {
            (Choices::TrueFalse { correct }, Choice::Bool(value)) => Some(value == *correct),
            (
                Choices::Options {
                    options,
                    correct_index,
                },
                Choice::Index(index),
            ) if index < options.len() => Some(index == *correct_index),
            _ => None,
        }
    }
}

/// Map a choice onto its position in [`CheckQuestion::labels`].
fn choice_position(choice: Choice) -> usize {
    match choice {
        Choice::Bool(true) => 0,
        Choice::Bool(false) => 1,
        Choice::Index(index) => index,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unanswered,
    Answered { choice: Choice, correct: bool },
}

/// Single-shot check: one answer, then the explanation, no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCheck {
    question: CheckQuestion,
    state: CheckState,
}

impl InlineCheck {
    pub fn new(question: CheckQuestion) -> Self {
        Self {
            question,
            state: CheckState::Unanswered,
        }
    }

    pub fn question(&self) -> &CheckQuestion {
        &self.question
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.state, CheckState::Answered { .. })
    }

    /// Records the answer and returns whether it was correct. Returns `None`
    /// and leaves the check untouched if it was already answered or the
    /// choice doesn't belong to this question.
    pub fn submit(&mut self, choice: Choice) -> Option<bool> {
        if self.is_answered() {
            debug!("check {}: ignoring repeat answer", self.question.id);
            return None;
        }
        let correct = self.question.judge(choice)?;
        self.state = CheckState::Answered { choice, correct };
        debug!("check {}: answered, correct = {}", self.question.id, correct);
        Some(correct)
    }

    pub fn explanation(&self) -> Option<&str> {
        self.is_answered()
            .then_some(self.question.explanation.as_str())
    }

    pub fn marks(&self) -> Vec<OptionMark> {
        let (count, correct) = match &self.question.choices {
            Choices::TrueFalse { correct } => (2, choice_position(Choice::Bool(*correct))),
            Choices::Options {
                options,
                correct_index,
            } => (options.len(), *correct_index),
        };
        let selected = match self.state {
            CheckState::Unanswered => None,
            CheckState::Answered { choice, .. } => Some(choice_position(choice)),
        };
        quiz::mark_options(count, selected, correct)
    }
}
