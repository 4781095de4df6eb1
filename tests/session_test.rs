//! Tests for signed-in client sessions.

use std::time::Duration;

use equation_challengers::{
    ClientSession, EngineConfig, GameEngine, GameError, GameEvent, GameStatus, GameStore,
    InvitationResponse, LeaveOutcome, MemoryStore, Player, PlayerColor, Precondition, ProfileStore,
    ScriptedRandom,
};

async fn setup() -> (GameEngine, MemoryStore) {
    let (engine, store) = GameEngine::in_memory(EngineConfig::default());
    let engine = engine.with_random(ScriptedRandom::new(3).with_rolls([1]));
    for (id, name) in [("p1", "Ada"), ("p2", "Bo"), ("p3", "Cy")] {
        engine.register_profile(id, name).await.expect("register");
    }
    (engine, store)
}

async fn room_of(store: &MemoryStore, user_id: &str) -> Option<String> {
    store
        .profile(user_id)
        .await
        .expect("read")
        .expect("exists")
        .current_room_id
}

/// Polls until the profile points at `expected`.
async fn wait_for_room(store: &MemoryStore, user_id: &str, expected: Option<&str>) {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if room_of(store, user_id).await.as_deref() == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "{} never pointed at {:?}", user_id, expected);
}

#[tokio::test]
async fn test_sign_in_requires_account() {
    let (engine, _store) = setup().await;
    assert_eq!(
        ClientSession::sign_in(engine, "ghost").await.map(|_| ()),
        Err(GameError::UnknownUser("ghost".to_string()))
    );
}

#[tokio::test]
async fn test_operations_need_a_room() {
    let (engine, _store) = setup().await;
    let session = ClientSession::sign_in(engine, "p1").await.expect("sign in");
    assert_eq!(session.current_room().await, Ok(None));
    assert_eq!(
        session.roll_dice().await.map(|_| ()),
        Err(GameError::NotInRoom("p1".to_string()))
    );
    assert_eq!(
        session.leave_game().await.map(|_| ()),
        Err(GameError::NotInRoom("p1".to_string()))
    );
}

#[tokio::test]
async fn test_session_plays_in_its_room() {
    let (engine, store) = setup().await;
    let ada = ClientSession::sign_in(engine.clone(), "p1").await.expect("sign in");
    let bo = ClientSession::sign_in(engine, "p2").await.expect("sign in");

    let game_id = ada.create_game().await.expect("create");
    assert_eq!(ada.current_room().await, Ok(Some(game_id.clone())));

    let invitation = ada.invite_player("p2").await.expect("invite");
    let inbox = bo.pending_invitations().await.expect("inbox");
    assert_eq!(inbox.len(), 1);
    let response = bo
        .respond_invitation(&invitation.id, true)
        .await
        .expect("accept");
    assert!(matches!(response, InvitationResponse::Accepted { .. }));

    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert_eq!(game.status, GameStatus::InProgress);

    assert!(matches!(
        bo.roll_dice().await,
        Err(GameError::NotYourTurn(_))
    ));
    let roll = ada.roll_dice().await.expect("roll").expect("applied");
    assert_eq!((roll.from, roll.to), (0, 1));

    let left = bo.leave_game().await.expect("leave");
    assert!(matches!(left, LeaveOutcome::Left { .. }));
    assert_eq!(bo.current_room().await, Ok(None));
}

#[tokio::test]
async fn test_reconcile_repoints_and_clears() {
    let (engine, store) = setup().await;
    let ada = ClientSession::sign_in(engine.clone(), "p1").await.expect("sign in");
    let game_id = ada.create_game().await.expect("create");

    // A stale pointer is restored from the roster.
    store.set_current_room("p1", None).await.expect("clear");
    let game = store.get(&game_id).await.expect("get").expect("exists");
    ada.reconcile(&GameEvent::Snapshot(game.clone()))
        .await
        .expect("reconcile");
    assert_eq!(room_of(&store, "p1").await, Some(game_id.clone()));

    // A finished game releases its players.
    let mut finished = game.clone();
    finished.status = GameStatus::Finished;
    ada.reconcile(&GameEvent::Snapshot(finished))
        .await
        .expect("reconcile");
    assert_eq!(room_of(&store, "p1").await, None);

    // Deletion of the pointed-at game clears the pointer.
    store
        .set_current_room("p1", Some(game_id.clone()))
        .await
        .expect("point");
    ada.reconcile(&GameEvent::Deleted(game_id.clone()))
        .await
        .expect("reconcile");
    assert_eq!(room_of(&store, "p1").await, None);

    // Deletion of some other game leaves the pointer alone.
    store
        .set_current_room("p1", Some(game_id.clone()))
        .await
        .expect("point");
    ada.reconcile(&GameEvent::Deleted("other".to_string()))
        .await
        .expect("reconcile");
    assert_eq!(room_of(&store, "p1").await, Some(game_id));
}

#[tokio::test]
async fn test_reconcile_starts_ready_game() {
    let (engine, store) = setup().await;
    let ada = ClientSession::sign_in(engine.clone(), "p1").await.expect("sign in");
    let game_id = ada.create_game().await.expect("create");

    // A second player seated by a write that skipped the start.
    let mut game = store.get(&game_id).await.expect("get").expect("exists");
    game.players.push(Player::new(
        "p2",
        "Bo",
        PlayerColor::Yellow,
        5000,
    ));
    let game = store.set(game).await.expect("seat");
    assert_eq!(game.status, GameStatus::Waiting);

    ada.reconcile(&GameEvent::Snapshot(game)).await.expect("reconcile");
    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert_eq!(game.status, GameStatus::InProgress);
}

#[tokio::test]
async fn test_watch_follows_roster_changes() {
    let (engine, store) = setup().await;
    let ada = ClientSession::sign_in(engine.clone(), "p1").await.expect("sign in");
    let bo = ClientSession::sign_in(engine, "p2").await.expect("sign in");
    let game_id = ada.create_game().await.expect("create");
    bo.join_game(&game_id).await.expect("join");

    let handle = bo.watch().await.expect("watch");

    // Bo is removed from the roster by another client.
    let mut game = store.get(&game_id).await.expect("get").expect("exists");
    game.players.retain(|p| p.user_id != "p2");
    store.set(game).await.expect("kick");
    wait_for_room(&store, "p2", None).await;

    // Bo is seated again; the watcher repoints.
    let mut game = store.get(&game_id).await.expect("get").expect("exists");
    game.players.push(Player::new(
        "p2",
        "Bo",
        PlayerColor::Yellow,
        5000,
    ));
    store.set(game).await.expect("reseat");
    wait_for_room(&store, "p2", Some(&game_id)).await;

    store
        .delete(&game_id, Precondition::None)
        .await
        .expect("delete");
    wait_for_room(&store, "p2", None).await;
    tokio::time::timeout(Duration::from_secs(2), async {
        while !handle.is_finished() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("watcher stops after deletion");
}
