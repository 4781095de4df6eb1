//! Tests for end-of-game evaluation.

use std::sync::Arc;

use equation_challengers::{
    CannedCompletion, EngineConfig, Game, GameEngine, GameRules, GameStatus, GameStore,
    MemoryStore, Player, PlayerColor, ProfileStore, Reward, SUMMARY_FALLBACK, ScriptedRandom,
    TurnEnd, summary_prompt,
};

const GAME: &str = "final";

/// Running game one turn short of the limit; Ada holds the turn on square 0.
fn last_turn(ada_properties: u32, bo_properties: u32) -> Game {
    let mut ada = Player::new("p1", "Ada", PlayerColor::Red, 5000);
    ada.property_count = ada_properties;
    let mut bo = Player::new("p2", "Bo", PlayerColor::Blue, 5000);
    bo.property_count = bo_properties;
    let mut game = Game::new(GAME.to_string(), ada.clone(), &GameRules::default());
    game.players = vec![ada, bo];
    game.status = GameStatus::InProgress;
    game.turn_count = 24;
    game
}

async fn setup(game: Game) -> (GameEngine, MemoryStore) {
    let (engine, store) = GameEngine::in_memory(EngineConfig::default());
    // Square 3 is green and unclaimed, so the roll ends the turn outright.
    let engine = engine.with_random(ScriptedRandom::new(1).with_rolls([3]));
    for (id, name) in [("p1", "Ada"), ("p2", "Bo")] {
        engine.register_profile(id, name).await.expect("register");
        store
            .set_current_room(id, Some(GAME.to_string()))
            .await
            .expect("point room");
    }
    store.set(game).await.expect("seed game");
    (engine, store)
}

#[tokio::test]
async fn test_turn_limit_finishes_game_and_clears_back_references() {
    let (engine, store) = setup(last_turn(1, 0)).await;

    let roll = engine
        .roll_dice("p1", GAME)
        .await
        .expect("roll")
        .expect("roll applied");
    let Some(TurnEnd::Finished {
        winners, winner, ..
    }) = roll.turn_end
    else {
        panic!("expected the game to finish, got {:?}", roll.turn_end);
    };
    assert_eq!(winners, vec!["p1".to_string()]);
    assert_eq!(winner, "Winner: Ada with 1 properties and $5000!");

    let game = store.get(GAME).await.expect("get").expect("game exists");
    assert_eq!(game.status, GameStatus::Finished);
    assert_eq!(game.turn_count, 25);
    assert_eq!(game.winner.as_deref(), Some(winner.as_str()));
    assert_eq!(game.final_summary.as_deref(), Some(SUMMARY_FALLBACK));

    for id in ["p1", "p2"] {
        let profile = store.profile(id).await.expect("read").expect("exists");
        assert_eq!(profile.current_room_id, None, "{} still points at the game", id);
    }
    let ada = store.profile("p1").await.expect("read").expect("exists");
    assert!(ada.rewards.contains(&Reward::GameChampion));
    let bo = store.profile("p2").await.expect("read").expect("exists");
    assert!(!bo.rewards.contains(&Reward::GameChampion));
}

#[tokio::test]
async fn test_money_breaks_property_ties() {
    let mut game = last_turn(2, 2);
    game.players[1].money = 7000;
    let (engine, store) = setup(game).await;

    engine.roll_dice("p1", GAME).await.expect("roll");
    let game = store.get(GAME).await.expect("get").expect("game exists");
    assert_eq!(game.winners, vec!["p2".to_string()]);
}

#[tokio::test]
async fn test_full_tie_crowns_every_co_winner() {
    let (engine, store) = setup(last_turn(0, 0)).await;

    engine.roll_dice("p1", GAME).await.expect("roll");
    let game = store.get(GAME).await.expect("get").expect("game exists");
    assert_eq!(game.winners, vec!["p1".to_string(), "p2".to_string()]);
    assert_eq!(
        game.winner.as_deref(),
        Some("It's a tie! Winners by money: Ada, Bo")
    );
    for id in ["p1", "p2"] {
        let profile = store.profile(id).await.expect("read").expect("exists");
        assert!(profile.rewards.contains(&Reward::GameChampion));
    }
}

#[tokio::test]
async fn test_summary_comes_from_completion_service() {
    let (engine, store) = setup(last_turn(1, 0)).await;
    let engine = engine.with_completion(Arc::new(CannedCompletion::new("What a game!")));

    engine.roll_dice("p1", GAME).await.expect("roll");
    let game = store.get(GAME).await.expect("get").expect("game exists");
    assert_eq!(game.final_summary.as_deref(), Some("What a game!"));
}

#[tokio::test]
async fn test_finished_game_ignores_further_rolls() {
    let (engine, store) = setup(last_turn(1, 0)).await;

    engine.roll_dice("p1", GAME).await.expect("roll");
    let finished = store.get(GAME).await.expect("get").expect("game exists");
    assert_eq!(engine.roll_dice("p2", GAME).await, Ok(None));
    assert_eq!(
        store.get(GAME).await.expect("get").expect("game exists"),
        finished
    );
}

#[test]
fn test_summary_prompt_lists_every_player() {
    let game = last_turn(1, 0);
    let prompt = summary_prompt(&game, "Winner: Ada with 1 properties and $5000!");
    assert!(prompt.contains("Equation Challengers"));
    assert!(prompt.contains("Ada (Money: $5000, Properties: 1)"));
    assert!(prompt.contains("Bo (Money: $5000, Properties: 0)"));
    assert!(prompt.contains("Winner: Ada"));
}
