pub mod accordion;
pub mod inline_check;
pub mod run;
pub mod summary;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Option buttons are labelled `A`..`Z`, so a question can't carry more than this.
pub const MAX_OPTIONS: usize = 26;

/// Stable identifier a page uses to key a question. Course content uses
/// both numeric ids (`1`, `2`, ...) and slugs (`"coshh-stands-for"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

/// A multiple-choice question as used by the end-of-section quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(alias = "question", alias = "prompt")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(alias = "correctAnswer")]
    pub correct_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            options,
            correct_index,
            explanation: explanation.into(),
        }
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct_index
    }

    /// Checks the authoring invariants: non-empty prompt and explanation,
    /// at least two non-empty options, and an in-range correct index.
    pub fn validate(&self) -> Result<(), ContentError> {
        check_text(&self.id, &self.text, &self.explanation)?;
        check_options(&self.id, &self.options, self.correct_index)
    }
}

/// How an option is displayed once its question has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    Correct,
    Incorrect,
}

/// Marks for `count` options. Nothing is marked until an answer exists; after
/// that the correct option is marked, plus the chosen one if it was wrong.
pub fn mark_options(count: usize, selected: Option<usize>, correct: usize) -> Vec<OptionMark> {
    (0..count)
        .map(|i| match selected {
            None => OptionMark::Neutral,
            Some(_) if i == correct => OptionMark::Correct,
            Some(chosen) if i == chosen => OptionMark::Incorrect,
            Some(_) => OptionMark::Neutral,
        })
        .collect()
}

/// `0 -> 'A'`, `1 -> 'B'`, ...
pub fn option_letter(index: usize) -> char {
    debug_assert!(index < MAX_OPTIONS);
    (b'A' + index as u8) as char
}

/// Inverse of [`option_letter`], bounded by the number of options on offer.
pub fn option_index(letter: char, count: usize) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    if !upper.is_ascii_uppercase() {
        return None;
    }
    let index = (upper as u8 - b'A') as usize;
    (index < count).then_some(index)
}

fn invalid(id: &QuestionId, reason: impl Into<String>) -> ContentError {
    ContentError::InvalidQuestion {
        id: id.to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn check_text(
    id: &QuestionId,
    text: &str,
    explanation: &str,
) -> Result<(), ContentError> {
    if text.trim().is_empty() {
        return Err(invalid(id, "prompt is empty"));
    }
    if explanation.trim().is_empty() {
        return Err(invalid(id, "explanation is empty"));
    }
    Ok(())
}

pub(crate) fn check_options(
    id: &QuestionId,
    options: &[String],
    correct_index: usize,
) -> Result<(), ContentError> {
    if options.len() < 2 {
        return Err(invalid(
            id,
            format!("needs at least 2 options, has {}", options.len()),
        ));
    }
    if options.len() > MAX_OPTIONS {
        return Err(invalid(
            id,
            format!("has {} options, at most {} are supported", options.len(), MAX_OPTIONS),
        ));
    }
    if let Some(pos) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(invalid(id, format!("option {} is empty", option_letter(pos))));
    }
    if correct_index >= options.len() {
        return Err(invalid(
            id,
            format!(
                "correct index {} is out of range for {} options",
                correct_index,
                options.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct_index: usize) -> Question {
        Question::new(
            QuestionId::Number(1),
            "Which regulation covers initial verification?",
            options.iter().map(|o| o.to_string()).collect(),
            correct_index,
            "Regulation 643.1 covers initial verification.",
        )
    }

    #[test]
    fn accepts_well_formed_question() {
        assert!(question(&["643.1", "411.3.3"], 0).validate().is_ok());
    }

    #[test]
    fn rejects_single_option() {
        let err = question(&["643.1"], 0).validate().unwrap_err();
        assert!(err.to_string().contains("at least 2 options"));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = question(&["643.1", "411.3.3"], 2).validate().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn rejects_blank_option_and_blank_explanation() {
        assert!(question(&["643.1", "  "], 0).validate().is_err());

        let mut q = question(&["643.1", "411.3.3"], 0);
        q.explanation = String::new();
        assert!(q.validate().is_err());
    }

    #[test]
    fn parses_page_shape_with_aliases() {
        let q: Question = serde_json::from_str(
            r#"{
                "id": 3,
                "question": "True or False: Resin-filled joints can be reopened.",
                "options": ["True", "False"],
                "correctAnswer": 1,
                "explanation": "Resin joints are permanent."
            }"#,
        )
        .unwrap();
        assert_eq!(q.id, QuestionId::Number(3));
        assert_eq!(q.correct_index, 1);

        let q: Question = serde_json::from_str(
            r#"{"id": "coshh", "prompt": "p", "options": ["a", "b"], "correctIndex": 0, "explanation": "e"}"#,
        )
        .unwrap();
        assert_eq!(q.id, QuestionId::Text("coshh".into()));
    }

    #[test]
    fn marks_follow_selection_and_correct_index() {
        use OptionMark::*;
        assert_eq!(mark_options(3, None, 1), vec![Neutral, Neutral, Neutral]);
        assert_eq!(mark_options(3, Some(1), 1), vec![Neutral, Correct, Neutral]);
        assert_eq!(mark_options(3, Some(2), 1), vec![Neutral, Correct, Incorrect]);
    }

    #[test]
    fn letters_round_trip_within_bounds() {
        assert_eq!(option_letter(0), 'A');
        assert_eq!(option_letter(3), 'D');
        assert_eq!(option_index('c', 4), Some(2));
        assert_eq!(option_index('E', 4), None);
        assert_eq!(option_index('1', 4), None);
    }
}
