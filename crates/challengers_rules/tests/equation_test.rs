//! Tests for the equation generator and answer checking.

use challengers_rules::{AnswerVerdict, Equation, MAX_OPERAND, MIN_OPERAND, Operator};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_division_always_has_integer_answer() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut divisions = 0;
    for _ in 0..10_000 {
        let equation = Equation::generate(&mut rng);
        if equation.operator() == Operator::Divide {
            divisions += 1;
            let parts: Vec<i64> = equation
                .display_text()
                .split(" / ")
                .map(|n| n.parse().expect("operand"))
                .collect();
            assert_eq!(parts[0] % parts[1], 0, "{} is not exact", equation);
            assert_eq!(parts[0] / parts[1], equation.answer());
        }
    }
    assert!(divisions > 0, "10k draws should include divisions");
}

#[test]
fn test_operands_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..2_000 {
        let equation = Equation::generate(&mut rng);
        let symbol = format!(" {} ", equation.operator().symbol());
        for operand in equation.display_text().split(symbol.as_str()) {
            let value: i64 = operand.parse().expect("operand");
            assert!((MIN_OPERAND..=MAX_OPERAND).contains(&value));
        }
    }
}

#[test]
fn test_from_parts_rejects_inexact_division() {
    assert!(Equation::from_parts(7, Operator::Divide, 2).is_none());
    let eq = Equation::from_parts(8, Operator::Divide, 4).expect("exact");
    assert_eq!(eq.answer(), 2);
    assert_eq!(eq.display_text(), "8 / 4");
}

#[test]
fn test_subtraction_may_be_negative() {
    let eq = Equation::from_parts(3, Operator::Subtract, 9).expect("valid");
    assert_eq!(eq.answer(), -6);
    assert_eq!(eq.check("-6"), AnswerVerdict::Correct);
}

#[test]
fn test_check_verdicts() {
    let eq = Equation::from_parts(6, Operator::Multiply, 7).expect("valid");
    assert_eq!(eq.check("42"), AnswerVerdict::Correct);
    assert_eq!(eq.check(" 42.0 "), AnswerVerdict::Correct);
    assert_eq!(eq.check("41"), AnswerVerdict::Incorrect);
    assert_eq!(eq.check("forty-two"), AnswerVerdict::Unparseable);
    assert_eq!(eq.check(""), AnswerVerdict::Unparseable);
    assert_eq!(eq.check("NaN"), AnswerVerdict::Unparseable);
}
