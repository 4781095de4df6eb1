//! Randomized arithmetic challenges.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tracing::{debug, instrument};

/// Smallest operand an equation uses.
pub const MIN_OPERAND: i64 = 1;
/// Largest operand an equation uses.
pub const MAX_OPERAND: i64 = 10;

/// Arithmetic operator of an equation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, only emitted when `b` divides `a`.
    Divide,
}

impl Operator {
    /// Symbol shown to players.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => left / right,
        }
    }
}

/// How a submitted answer compares to the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerVerdict {
    /// Numerically equal to the answer.
    Correct,
    /// A number, but the wrong one.
    Incorrect,
    /// Not a number at all.
    Unparseable,
}

/// An arithmetic challenge with an integer answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equation {
    left: i64,
    operator: Operator,
    right: i64,
    display_text: String,
    answer: i64,
}

impl Equation {
    /// Builds an equation from its parts.
    ///
    /// Returns `None` for a division that would not produce an integer.
    pub fn from_parts(left: i64, operator: Operator, right: i64) -> Option<Self> {
        if operator == Operator::Divide && (right == 0 || left % right != 0) {
            return None;
        }
        Some(Self {
            left,
            operator,
            right,
            display_text: format!("{} {} {}", left, operator.symbol(), right),
            answer: operator.apply(left, right),
        })
    }

    /// Generates a random equation with operands in `[1, 10]`.
    ///
    /// Division operands are redrawn until they divide evenly, so the answer
    /// is always an integer.
    #[instrument(skip(rng))]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let operator = Operator::iter()
            .nth(rng.gen_range(0..Operator::COUNT))
            .unwrap_or(Operator::Add);
        loop {
            let left = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
            let right = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
            if let Some(equation) = Self::from_parts(left, operator, right) {
                debug!(equation = %equation.display_text, "Generated equation");
                return equation;
            }
        }
    }

    /// Text shown to the player, e.g. `"8 / 4"`.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// The expected answer.
    pub fn answer(&self) -> i64 {
        self.answer
    }

    /// The operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Judges a raw answer typed by a player.
    #[instrument(skip(self), fields(equation = %self.display_text))]
    pub fn check(&self, raw: &str) -> AnswerVerdict {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_nan() => AnswerVerdict::Unparseable,
            Ok(value) if value == self.answer as f64 => AnswerVerdict::Correct,
            Ok(_) => AnswerVerdict::Incorrect,
            Err(_) => AnswerVerdict::Unparseable,
        }
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text)
    }
}
