//! Chat renderings of the knowledge-check widgets.
//!
//! Everything here is plain text plus reply-button rows; the bot turns a
//! [`Screen`] into a Telegram message. Text is Telegram HTML.

use teloxide::utils::html::{bold, escape, italic};

use crate::quiz::accordion::Accordion;
use crate::quiz::inline_check::{CheckState, Choice, Choices, InlineCheck};
use crate::quiz::run::{Advance, Phase, QuizRun};
use crate::quiz::summary::Summary;
use crate::quiz::{self, OptionMark};
use crate::section::{Library, Section};

pub const CONTINUE: &str = "Continue";
pub const START_QUIZ: &str = "Start the quiz";
pub const NEXT_QUESTION: &str = "Next question";
pub const SEE_RESULTS: &str = "See results";
pub const RETAKE: &str = "Retake quiz";
pub const BACK_TO_SECTIONS: &str = "Back to sections";

/// A message body and the reply buttons to offer with it, row by row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub text: String,
    pub buttons: Vec<Vec<String>>,
}

impl Screen {
    fn new(text: String) -> Self {
        Self {
            text,
            buttons: Vec::new(),
        }
    }

    fn with_rows(mut self, rows: impl IntoIterator<Item = String>) -> Self {
        self.buttons.extend(rows.into_iter().map(|label| vec![label]));
        self
    }
}

const GREETING_TEXT: &str =
    "Hi! I run the knowledge checks for your course sections. Pick a section to begin.";

pub fn section_menu(library: &Library) -> Screen {
    Screen::new(GREETING_TEXT.to_string())
        .with_rows(library.sections().iter().map(|s| s.title.clone()))
}

pub fn section_intro(section: &Section) -> Screen {
    let mut text = bold(&escape(&section.title));
    if let Some(summary) = &section.summary {
        text.push_str("\n\n");
        text.push_str(&escape(summary));
    }
    Screen::new(text)
}

pub fn option_button(index: usize, option: &str) -> String {
    format!("{}) {}", quiz::option_letter(index), option)
}

/// Resolves a reply to an option index. Accepts the button label, the bare
/// letter, or the option text itself.
pub fn parse_option_reply(reply: &str, options: &[String]) -> Option<usize> {
    let reply = reply.trim();
    if let Some(index) = options.iter().position(|o| o.trim() == reply) {
        return Some(index);
    }
    let mut chars = reply.chars();
    let letter = chars.next()?;
    let rest = chars.as_str();
    if rest.is_empty() || rest.starts_with(')') {
        return quiz::option_index(letter, options.len());
    }
    None
}

pub fn parse_check_reply(reply: &str, check: &InlineCheck) -> Option<Choice> {
    match &check.question().choices {
        Choices::TrueFalse { .. } => match reply.trim().to_ascii_lowercase().as_str() {
            "true" => Some(Choice::Bool(true)),
            "false" => Some(Choice::Bool(false)),
            _ => None,
        },
        Choices::Options { options, .. } => parse_option_reply(reply, options).map(Choice::Index),
    }
}

fn mark_symbol(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::Neutral => "▫️",
        OptionMark::Correct => "✅",
        OptionMark::Incorrect => "❌",
    }
}

fn option_lines(options: &[String], marks: &[OptionMark], revealed: bool) -> String {
    options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let line = escape(&option_button(i, option));
            if revealed {
                format!("{} {}", mark_symbol(marks[i]), line)
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn verdict(correct: bool) -> &'static str {
    if correct {
        "✅ Correct!"
    } else {
        "❌ Not quite."
    }
}

/// `position` is zero-based.
pub fn inline_check(check: &InlineCheck, position: usize, total: usize) -> Screen {
    let question = check.question();
    let header = italic(&format!("Quick check {} of {}", position + 1, total));
    let prompt = bold(&escape(&question.text));

    match check.state() {
        CheckState::Unanswered => {
            let buttons = match &question.choices {
                Choices::TrueFalse { .. } => vec![question.labels()],
                Choices::Options { options, .. } => options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| vec![option_button(i, o)])
                    .collect(),
            };
            let mut text = format!("{}\n\n{}", header, prompt);
            if let Choices::Options { options, .. } = &question.choices {
                text.push_str("\n\n");
                text.push_str(&option_lines(options, &[], false));
            }
            Screen { text, buttons }
        }
        CheckState::Answered { correct, .. } => {
            let marks = check.marks();
            let body = match &question.choices {
                Choices::TrueFalse { .. } => question
                    .labels()
                    .iter()
                    .zip(&marks)
                    .map(|(label, mark)| format!("{} {}", mark_symbol(*mark), label))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Choices::Options { options, .. } => option_lines(options, &marks, true),
            };
            let text = format!(
                "{}\n\n{}\n\n{}\n\n{}",
                verdict(correct),
                prompt,
                body,
                escape(&question.explanation)
            );
            Screen::new(text).with_rows([CONTINUE.to_string()])
        }
    }
}

pub fn faq(section: &Section, accordion: &Accordion) -> Screen {
    let mut text = bold("Frequently asked questions");
    for (i, item) in section.faqs.iter().enumerate() {
        text.push_str("\n\n");
        if accordion.is_open(i) {
            let question = bold(&escape(&item.question));
            text.push_str(&format!("▾ {}\n{}", question, escape(&item.answer)));
        } else {
            text.push_str(&format!("▸ {}", escape(&item.question)));
        }
    }
    Screen::new(text)
        .with_rows(section.faqs.iter().map(|f| f.question.clone()))
        .with_rows([START_QUIZ.to_string()])
}

pub fn parse_faq_reply(reply: &str, section: &Section) -> Option<usize> {
    let reply = reply.trim();
    section.faqs.iter().position(|f| f.question.trim() == reply)
}

/// What a reply did to an inline check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckReply {
    /// The check was answered, correctly or not.
    Answered(bool),
    /// The learner moved past an answered check.
    Continue,
    Unrecognised,
}

/// Applies a chat reply to an inline check. An answered check only accepts
/// [`CONTINUE`]; anything unrecognised leaves it as it was.
pub fn apply_check_reply(check: &mut InlineCheck, reply: &str) -> CheckReply {
    if check.is_answered() {
        return if reply.trim() == CONTINUE {
            CheckReply::Continue
        } else {
            CheckReply::Unrecognised
        };
    }
    parse_check_reply(reply, check)
        .and_then(|choice| check.submit(choice))
        .map_or(CheckReply::Unrecognised, CheckReply::Answered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqReply {
    Toggled(usize),
    StartQuiz,
    Unrecognised,
}

pub fn apply_faq_reply(accordion: &mut Accordion, section: &Section, reply: &str) -> FaqReply {
    if reply.trim() == START_QUIZ {
        return FaqReply::StartQuiz;
    }
    match parse_faq_reply(reply, section) {
        Some(panel) => {
            accordion.toggle(panel);
            FaqReply::Toggled(panel)
        }
        None => FaqReply::Unrecognised,
    }
}

/// The transition a quiz reply caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizReply {
    Answered(bool),
    Advanced(Advance),
    Restarted,
}

/// Applies a chat reply to a quiz run. Options are only accepted while a
/// question is presented, [`NEXT_QUESTION`]/[`SEE_RESULTS`] only once it is
/// revealed, and [`RETAKE`] only after completion. `None` means the run was
/// left untouched.
pub fn apply_quiz_reply(run: &mut QuizRun, reply: &str) -> Option<QuizReply> {
    let reply = reply.trim();
    match run.phase() {
        Phase::Presenting { index } => {
            let choice = run
                .current_question()
                .and_then(|q| parse_option_reply(reply, &q.options))?;
            run.select_answer(index, choice).map(QuizReply::Answered)
        }
        Phase::Revealed { .. } if reply == NEXT_QUESTION || reply == SEE_RESULTS => {
            run.advance().map(QuizReply::Advanced)
        }
        Phase::Complete if reply == RETAKE => {
            run.restart();
            Some(QuizReply::Restarted)
        }
        _ => None,
    }
}

pub fn quiz_run(run: &QuizRun) -> Screen {
    match (run.phase(), run.current_question()) {
        (Phase::Presenting { index }, Some(question)) => {
            let text = format!(
                "{}\n{}\n\n{}\n\n{}\n\n{}",
                bold(&escape(run.title())),
                italic(&format!("Question {} of {}", index + 1, run.total())),
                bold(&escape(&question.text)),
                option_lines(&question.options, &[], false),
                italic(&format!("Score: {}", run.running_score()))
            );
            Screen {
                text,
                buttons: question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| vec![option_button(i, o)])
                    .collect(),
            }
        }
        (Phase::Revealed { index, .. }, Some(question)) => {
            let correct = run.revealed_correct().unwrap_or(false);
            let explanation = run.explanation().unwrap_or_default();
            let text = format!(
                "{}\n\n{}\n\n{}\n\n{}\n\n{}",
                verdict(correct),
                bold(&escape(&question.text)),
                option_lines(&question.options, &run.marks(), true),
                escape(explanation),
                italic(&format!("Score: {}", run.running_score()))
            );
            let next = if index + 1 < run.total() {
                NEXT_QUESTION
            } else {
                SEE_RESULTS
            };
            Screen::new(text).with_rows([next.to_string()])
        }
        _ => match run.summary() {
            Some(summary) => quiz_summary(run.title(), &summary),
            None => Screen::default(),
        },
    }
}

pub fn quiz_summary(title: &str, summary: &Summary) -> Screen {
    let mut text = format!(
        "{}\n\nYou scored {} out of {} ({}%).\n\n{}",
        bold(&format!("{} complete", escape(title))),
        summary.score,
        summary.total,
        summary.percentage,
        escape(summary.band.message())
    );
    if let (Some(mark), Some(met)) = (summary.passing_score, summary.meets_passing_score()) {
        let status = if met { "reached" } else { "not reached yet" };
        text.push_str(&format!("\n\n{}", italic(&format!("Pass mark: {}% ({})", mark, status))));
    }
    Screen::new(text).with_rows([RETAKE.to_string(), BACK_TO_SECTIONS.to_string()])
}
