//! Tests for square resolution precedence.

use challengers_rules::{
    BoardLayout, BoardState, Player, PlayerColor, Property, SafeReason, SquareOutcome,
    resolve_square,
};

fn roster() -> Vec<Player> {
    vec![
        Player::new("p1", "Ada", PlayerColor::Red, 5000),
        Player::new("p2", "Bo", PlayerColor::Blue, 5000),
    ]
}

#[test]
fn test_own_color_without_property_offers_build() {
    let players = roster();
    let outcome = resolve_square(
        &BoardLayout::uniform(20),
        &players[0],
        10,
        &players,
        &BoardState::new(),
    );
    assert_eq!(outcome, SquareOutcome::BuildOffer { square: 10 });
}

#[test]
fn test_own_color_with_property_is_safe() {
    let players = roster();
    let mut board = BoardState::new();
    board.insert(
        5,
        Property {
            owner_id: "p1".into(),
            rent: 300,
        },
    );
    let outcome = resolve_square(&BoardLayout::uniform(20), &players[0], 5, &players, &board);
    assert_eq!(
        outcome,
        SquareOutcome::SafeZone {
            square: 5,
            reason: SafeReason::OwnProperty
        }
    );
}

#[test]
fn test_other_players_property_charges_rent() {
    let players = roster();
    let mut board = BoardState::new();
    board.insert(
        12,
        Property {
            owner_id: "p2".into(),
            rent: 300,
        },
    );
    let outcome = resolve_square(&BoardLayout::uniform(20), &players[0], 12, &players, &board);
    assert_eq!(
        outcome,
        SquareOutcome::Rent {
            square: 12,
            owner_id: "p2".into(),
            amount: 300
        }
    );
    assert!(outcome.needs_decision());
}

#[test]
fn test_other_players_unbuilt_color_is_challenge() {
    let players = roster();
    let outcome = resolve_square(
        &BoardLayout::uniform(20),
        &players[0],
        7,
        &players,
        &BoardState::new(),
    );
    assert_eq!(
        outcome,
        SquareOutcome::EquationChallenge {
            square: 7,
            setter_id: "p2".into()
        }
    );
}

#[test]
fn test_unseated_color_is_safe() {
    let players = roster();
    let outcome = resolve_square(
        &BoardLayout::uniform(20),
        &players[0],
        3,
        &players,
        &BoardState::new(),
    );
    assert_eq!(
        outcome,
        SquareOutcome::SafeZone {
            square: 3,
            reason: SafeReason::Unclaimed
        }
    );
    assert!(!outcome.needs_decision());
}

#[test]
fn test_explicit_layout_overrides_modulus() {
    let players = roster();
    let layout = BoardLayout::from_colors(vec![PlayerColor::Blue; 4]).expect("layout");
    let outcome = resolve_square(&layout, &players[0], 0, &players, &BoardState::new());
    assert!(matches!(outcome, SquareOutcome::EquationChallenge { .. }));
    assert!(BoardLayout::from_colors(Vec::new()).is_err());
}
