// tests/scoring_tests.rs
//
// The scorer is a pure function, so these run without a database.

use std::collections::HashMap;

use quizforge::error::AppError;
use quizforge::models::attempt::AnswerPair;
use quizforge::scoring::{AnswerKey, score_submission};

fn key(correct: &[(i64, i64)]) -> AnswerKey {
    AnswerKey {
        total_questions: correct.len() as i64,
        correct_options: correct.iter().copied().collect::<HashMap<_, _>>(),
    }
}

fn pair(question_id: i64, option_id: i64) -> AnswerPair {
    AnswerPair {
        question_id: Some(question_id),
        option_id: Some(option_id),
    }
}

#[test]
fn all_correct_answers_score_total() {
    let key = key(&[(1, 10), (2, 20), (3, 30)]);
    let answers = vec![pair(1, 10), pair(2, 20), pair(3, 30)];

    let scored = score_submission(&answers, &key).unwrap();

    assert_eq!(scored.score, 3);
    assert_eq!(scored.answers.len(), 3);
}

#[test]
fn no_correct_answers_score_zero() {
    let key = key(&[(1, 10), (2, 20)]);
    let answers = vec![pair(1, 11), pair(2, 21)];

    let scored = score_submission(&answers, &key).unwrap();

    assert_eq!(scored.score, 0);
}

#[test]
fn one_correct_one_wrong_scores_one_of_two() {
    let key = key(&[(1, 10), (2, 20)]);
    let answers = vec![pair(1, 10), pair(2, 21)];

    let scored = score_submission(&answers, &key).unwrap();

    assert_eq!(scored.score, 1);
}

#[test]
fn fewer_answers_than_questions_is_rejected() {
    let key = key(&[(1, 10), (2, 20), (3, 30)]);
    let answers = vec![pair(1, 10), pair(2, 20)];

    let err = score_submission(&answers, &key).unwrap_err();

    assert!(matches!(err, AppError::IncompleteSubmission(_)));
}

#[test]
fn empty_answer_list_is_rejected() {
    let key = key(&[(1, 10)]);

    let err = score_submission(&[], &key).unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn pair_missing_option_id_is_rejected() {
    let key = key(&[(1, 10)]);
    let answers = vec![AnswerPair {
        question_id: Some(1),
        option_id: None,
    }];

    let err = score_submission(&answers, &key).unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn pair_missing_question_id_is_rejected() {
    let key = key(&[(1, 10)]);
    let answers = vec![AnswerPair {
        question_id: None,
        option_id: Some(10),
    }];

    let err = score_submission(&answers, &key).unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[test]
fn answer_to_unknown_question_never_matches() {
    let key = key(&[(1, 10)]);
    let answers = vec![pair(99, 10)];

    let scored = score_submission(&answers, &key).unwrap();

    assert_eq!(scored.score, 0);
}

// Duplicate pairs for one question satisfy the length check and are each
// scored on their own, so other questions can go unanswered and the score can
// exceed the number of distinct questions answered. This mirrors the original
// system's behavior; the assertions pin it down rather than endorse it.
#[test]
fn duplicate_question_answers_are_each_scored() {
    let key = key(&[(1, 10), (2, 20)]);
    let answers = vec![pair(1, 10), pair(1, 10)];

    let scored = score_submission(&answers, &key).unwrap();

    assert_eq!(scored.score, 2);
}
