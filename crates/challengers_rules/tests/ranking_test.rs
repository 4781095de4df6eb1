//! Tests for end-of-game ranking and game document helpers.

use challengers_rules::{
    FieldUpdate, Game, GameRules, GameUpdate, Player, PlayerColor, co_winners, winner_message,
};

fn player(id: &str, properties: u32, money: i64) -> Player {
    let mut p = Player::new(id, id.to_uppercase(), PlayerColor::Red, money);
    p.property_count = properties;
    p
}

#[test]
fn test_properties_beat_money() {
    let players = vec![player("a", 1, 9000), player("b", 2, 100)];
    let winners = co_winners(&players);
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].user_id, "b");
    assert_eq!(winner_message(&winners), "Winner: B with 2 properties and $100!");
}

#[test]
fn test_money_breaks_property_ties() {
    let players = vec![player("a", 2, 4000), player("b", 2, 4500), player("c", 0, 9999)];
    let winners = co_winners(&players);
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].user_id, "b");
}

#[test]
fn test_full_ties_are_co_winners() {
    let players = vec![player("a", 1, 4000), player("b", 0, 8000), player("c", 1, 4000)];
    let winners = co_winners(&players);
    let ids: Vec<_> = winners.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(winner_message(&winners), "It's a tie! Winners by money: A, C");
}

#[test]
fn test_next_player_wraps_and_falls_back() {
    let rules = GameRules::default();
    let mut game = Game::new("g".into(), player("a", 0, 0), &rules);
    game.players.push(player("b", 0, 0));
    game.players.push(player("c", 0, 0));

    game.current_player_id = "c".into();
    assert_eq!(game.next_player_id().as_deref(), Some("a"));

    game.current_player_id = "gone".into();
    assert_eq!(game.next_player_id().as_deref(), Some("a"));
}

#[test]
fn test_identity_keyed_updates_touch_one_player() {
    let rules = GameRules::default();
    let mut game = Game::new("g".into(), player("a", 0, 10), &rules);
    game.players.push(player("b", 0, 20));

    let mut richer = game.players[1].clone();
    richer.money = 99;
    let update = GameUpdate::new()
        .with(FieldUpdate::UpsertPlayer { player: richer })
        .with(FieldUpdate::RemovePlayer {
            user_id: "a".into(),
        })
        .with(FieldUpdate::TurnCount { turn_count: 3 });
    let game = game.applied(&update);

    assert_eq!(game.players.len(), 1);
    assert_eq!(game.players[0].money, 99);
    assert_eq!(game.turn_count, 3);
}
