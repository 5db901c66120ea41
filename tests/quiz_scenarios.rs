use knowledge_check::quiz::inline_check::{CheckQuestion, CheckState, Choice, InlineCheck};
use knowledge_check::quiz::run::{Advance, Phase, QuizRun};
use knowledge_check::quiz::summary::{Band, Summary};
use knowledge_check::quiz::{Question, QuestionId};

const OPTIONS: usize = 3;

fn quiz(correct: &[usize]) -> QuizRun {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Question::new(
                QuestionId::Number(i as u64 + 1),
                format!("Question {}", i + 1),
                (0..OPTIONS).map(|o| format!("Option {}", o)).collect(),
                c,
                format!("Option {} is right.", c),
            )
        })
        .collect();
    QuizRun::new("Section Knowledge Check", questions, None)
}

/// Answers every question with the given choices, advancing after each, and
/// returns the completion summary.
fn play(run: &mut QuizRun, answers: &[usize]) -> Summary {
    let mut completed = None;
    for (i, &choice) in answers.iter().enumerate() {
        run.select_answer(i, choice).expect("question should accept an answer");
        if let Some(Advance::Completed(summary)) = run.advance() {
            completed = Some(summary);
        }
    }
    completed.expect("run should complete")
}

#[test]
fn end_to_end_three_question_run() {
    let mut run = quiz(&[1, 0, 2]);

    assert_eq!(run.select_answer(0, 1), Some(true));
    assert_eq!(run.score(), 1);
    assert_eq!(run.advance(), Some(Advance::Next(1)));

    assert_eq!(run.select_answer(1, 1), Some(false));
    assert_eq!(run.score(), 1);
    assert_eq!(run.advance(), Some(Advance::Next(2)));

    assert_eq!(run.select_answer(2, 2), Some(true));
    assert_eq!(run.score(), 2);

    let Some(Advance::Completed(summary)) = run.advance() else {
        panic!("third advance should complete the run");
    };
    assert_eq!(run.phase(), Phase::Complete);
    assert_eq!(summary.percentage, 67);
    assert_eq!(summary.band, Band::Pass);
}

#[test]
fn ten_questions_seven_right_is_seventy_percent() {
    let correct = [0; 10];
    let answers = [0, 0, 0, 0, 0, 0, 0, 1, 1, 1];
    let summary = play(&mut quiz(&correct), &answers);
    assert_eq!((summary.score, summary.total), (7, 10));
    assert_eq!(summary.percentage, 70);
}

#[test]
fn five_question_bands() {
    let expected = [
        (5, Band::Perfect),
        (4, Band::Strong),
        (3, Band::Pass),
        (2, Band::NeedsReview),
    ];
    for (right, band) in expected {
        let answers: Vec<usize> = (0..5).map(|i| if i < right { 0 } else { 1 }).collect();
        let summary = play(&mut quiz(&[0; 5]), &answers);
        assert_eq!(summary.score, right);
        assert_eq!(summary.band, band, "{} of 5", right);
    }
}

#[test]
fn reselecting_a_revealed_question_changes_nothing() {
    let mut run = quiz(&[2, 0]);
    run.select_answer(0, 2);
    let revealed = run.clone();
    for choice in 0..OPTIONS {
        assert_eq!(run.select_answer(0, choice), None);
        assert_eq!(run, revealed);
    }
}

#[test]
fn advance_before_answering_is_a_no_op() {
    let mut run = quiz(&[0, 0]);
    let fresh = run.clone();
    assert_eq!(run.advance(), None);
    assert_eq!(run, fresh);
}

#[test]
fn restart_after_completion_matches_fresh_mount() {
    let fresh = quiz(&[0, 1, 2]);
    let mut run = fresh.clone();
    let summary = play(&mut run, &[0, 1, 0]);
    assert!(summary.score > 0);

    run.restart();
    assert_eq!(run, fresh);
    assert_eq!(run.current_index(), 0);
    assert_eq!(run.score(), 0);
    assert_eq!(run.phase(), Phase::Presenting { index: 0 });
    assert_eq!(run.explanation(), None);
}

#[test]
fn inline_true_false_is_single_shot() {
    let mut check = InlineCheck::new(CheckQuestion::true_false(
        QuestionId::Text("resin-reopen".into()),
        "Resin-filled joints can be reopened for maintenance.",
        false,
        "Once cured, resin-filled joints are permanent.",
    ));
    assert_eq!(check.submit(Choice::Bool(true)), Some(false));
    assert!(check.explanation().is_some());
    assert_eq!(check.submit(Choice::Bool(false)), None);
    assert_eq!(
        check.state(),
        CheckState::Answered {
            choice: Choice::Bool(true),
            correct: false
        }
    );
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Select(usize, usize),
    Advance,
    Restart,
}

fn actions(total: usize) -> Vec<Action> {
    let mut all = vec![Action::Advance, Action::Restart];
    for q in 0..total {
        for c in 0..OPTIONS {
            all.push(Action::Select(q, c));
        }
    }
    all
}

fn check_bounds(run: &QuizRun) {
    let revealed = matches!(run.phase(), Phase::Revealed { .. }) as usize;
    assert!(run.score() <= run.current_index() + revealed, "{:?}", run);
    assert!(run.score() <= run.total());
    assert!(run.current_index() <= run.total());
    assert_eq!(run.is_complete(), run.current_index() == run.total());
    assert_eq!(run.running_score().resolved, run.current_index() + revealed);
}

fn walk(run: &QuizRun, depth: usize, all: &[Action], completions: &mut usize) {
    check_bounds(run);
    if depth == 0 {
        return;
    }
    for &action in all {
        let mut next = run.clone();
        match action {
            Action::Select(q, c) => {
                let before = next.score();
                let outcome = next.select_answer(q, c);
                let gained = next.score() - before;
                assert_eq!(gained, usize::from(outcome == Some(true)));
                if outcome.is_none() {
                    assert_eq!(&next, run, "rejected select must not change state");
                }
            }
            Action::Advance => {
                let was_complete = run.is_complete();
                match next.advance() {
                    Some(Advance::Completed(summary)) => {
                        assert!(!was_complete);
                        assert_eq!(summary.score, next.score());
                        *completions += 1;
                    }
                    Some(Advance::Next(i)) => {
                        assert_eq!(next.phase(), Phase::Presenting { index: i })
                    }
                    None => assert_eq!(&next, run, "rejected advance must not change state"),
                }
            }
            Action::Restart => {
                next.restart();
                assert_eq!(next.score(), 0);
                assert_eq!(next.phase(), Phase::Presenting { index: 0 });
            }
        }
        walk(&next, depth - 1, all, completions);
    }
}

#[test]
fn score_bounds_hold_for_every_short_action_sequence() {
    let run = quiz(&[1, 0]);
    let all = actions(run.total());
    let mut completions = 0;
    walk(&run, 5, &all, &mut completions);
    assert!(completions > 0, "walk should reach completion");
}
