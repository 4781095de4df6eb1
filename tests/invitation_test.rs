//! Tests for the invitation subsystem.

use chrono::Utc;
use equation_challengers::{
    EngineConfig, Game, GameEngine, GameError, GameStatus, GameStore, Invitation,
    InvitationResponse, InvitationStatus, JoinOutcome, MemoryStore, Player, PlayerColor,
    ProfileStore, prune_resolved,
};

async fn setup(config: EngineConfig) -> (GameEngine, MemoryStore, String) {
    let (engine, store) = GameEngine::in_memory(config);
    for (id, name) in [
        ("p1", "Ada"),
        ("p2", "Bo"),
        ("p3", "Cy"),
        ("p4", "Dee"),
        ("p5", "Eve"),
        ("p6", "Fay"),
    ] {
        engine.register_profile(id, name).await.expect("register");
    }
    let game_id = engine.create_game("p1").await.expect("create");
    (engine, store, game_id)
}

fn invitation(id: &str, status: InvitationStatus) -> Invitation {
    Invitation {
        id: id.to_string(),
        sender_id: "p1".to_string(),
        recipient_id: format!("{}-recipient", id),
        game_id: "g".to_string(),
        status,
        timestamp: Utc::now(),
        sender_display_name: "Ada".to_string(),
    }
}

#[tokio::test]
async fn test_accepted_invitation_joins_and_starts_game() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;

    let sent = engine.invite_player("p1", "p2").await.expect("invite");
    assert_eq!(sent.status, InvitationStatus::Pending);
    assert_eq!(sent.sender_display_name, "Ada");
    assert_eq!(sent.game_id, game_id);

    let inbox = engine.pending_invitations("p2").await.expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, sent.id);

    let response = engine
        .respond_invitation("p2", &sent.id, true)
        .await
        .expect("respond");
    assert_eq!(
        response,
        InvitationResponse::Accepted {
            game_id: game_id.clone(),
            join: JoinOutcome::Joined {
                color: PlayerColor::Yellow
            }
        }
    );

    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert!(game.is_member("p2"));
    assert_eq!(game.status, GameStatus::InProgress);
    assert_eq!(
        game.invitation(&sent.id).map(|i| i.status),
        Some(InvitationStatus::Accepted)
    );
}

#[tokio::test]
async fn test_declined_invitation_is_recorded() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    let sent = engine.invite_player("p1", "p2").await.expect("invite");

    let response = engine
        .respond_invitation("p2", &sent.id, false)
        .await
        .expect("respond");
    assert_eq!(
        response,
        InvitationResponse::Declined {
            game_id: game_id.clone()
        }
    );
    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert!(!game.is_member("p2"));
    assert_eq!(
        game.invitation(&sent.id).map(|i| i.status),
        Some(InvitationStatus::Declined)
    );
    assert!(engine.pending_invitations("p2").await.expect("inbox").is_empty());
}

#[tokio::test]
async fn test_invite_validation() {
    let (engine, _store, _game_id) = setup(EngineConfig::default()).await;

    assert_eq!(
        engine.invite_player("p1", "ghost").await,
        Err(GameError::RecipientNotFound("ghost".to_string()))
    );
    assert_eq!(
        engine.invite_player("p1", "p1").await,
        Err(GameError::SelfInvite)
    );
    engine.invite_player("p1", "p2").await.expect("first invite");
    assert_eq!(
        engine.invite_player("p1", "p2").await,
        Err(GameError::DuplicateInvite("p2".to_string()))
    );
    assert_eq!(
        engine.invite_player("p3", "p2").await,
        Err(GameError::NotInRoom("p3".to_string()))
    );
}

#[tokio::test]
async fn test_invite_into_full_game_is_rejected() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    let mut game = store.get(&game_id).await.expect("get").expect("exists");
    for (id, color) in [
        ("p2", PlayerColor::Yellow),
        ("p3", PlayerColor::Blue),
        ("p4", PlayerColor::Green),
        ("p5", PlayerColor::Orange),
    ] {
        game.players.push(Player::new(id, id, color, 5000));
    }
    store.set(game).await.expect("seed");

    assert_eq!(
        engine.invite_player("p1", "p6").await,
        Err(GameError::Full(game_id, 5))
    );
}

#[tokio::test]
async fn test_invite_into_running_game_is_rejected() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    engine.join_game("p2", &game_id).await.expect("join");

    assert_eq!(
        engine.invite_player("p1", "p3").await,
        Err(GameError::AlreadyInProgress(game_id.clone()))
    );
    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert!(game.invitations.is_empty());
}

#[tokio::test]
async fn test_failed_join_leaves_invitation_pending() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    let sent = engine.invite_player("p1", "p6").await.expect("invite");

    // Fill the game behind the recipient's back.
    let mut game = store.get(&game_id).await.expect("get").expect("exists");
    for (id, color) in [
        ("p2", PlayerColor::Yellow),
        ("p3", PlayerColor::Blue),
        ("p4", PlayerColor::Green),
        ("p5", PlayerColor::Orange),
    ] {
        game.players.push(Player::new(id, id, color, 5000));
    }
    store.set(game).await.expect("seed");

    assert_eq!(
        engine.respond_invitation("p6", &sent.id, true).await,
        Err(GameError::Full(game_id.clone(), 5))
    );
    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert_eq!(
        game.invitation(&sent.id).map(|i| i.status),
        Some(InvitationStatus::Pending)
    );
}

#[tokio::test]
async fn test_unknown_invitation_is_not_found() {
    let (engine, _store, _game_id) = setup(EngineConfig::default()).await;
    let sent = engine.invite_player("p1", "p2").await.expect("invite");

    assert_eq!(
        engine.respond_invitation("p3", &sent.id, true).await,
        Err(GameError::InvitationNotFound(sent.id.clone()))
    );
    assert_eq!(
        engine.respond_invitation("p2", "nope", true).await,
        Err(GameError::InvitationNotFound("nope".to_string()))
    );
}

#[tokio::test]
async fn test_invitations_only_listed_from_waiting_games() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    engine.invite_player("p1", "p3").await.expect("invite");
    engine.join_game("p2", &game_id).await.expect("join");

    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert_eq!(game.status, GameStatus::InProgress);
    assert!(engine.pending_invitations("p3").await.expect("inbox").is_empty());
}

#[tokio::test]
async fn test_retention_prunes_oldest_resolved_invitations() {
    let (engine, store, game_id) =
        setup(EngineConfig::default().with_invitation_retention(1)).await;

    let first = engine.invite_player("p1", "p2").await.expect("invite");
    engine
        .respond_invitation("p2", &first.id, false)
        .await
        .expect("decline");
    let second = engine.invite_player("p1", "p3").await.expect("invite");
    engine
        .respond_invitation("p3", &second.id, false)
        .await
        .expect("decline");
    let third = engine.invite_player("p1", "p4").await.expect("invite");

    let game = store.get(&game_id).await.expect("get").expect("exists");
    let ids: Vec<&str> = game.invitations.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), third.id.as_str()]);
}

#[tokio::test]
async fn test_invitations_accumulate_without_retention() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    for recipient in ["p2", "p3"] {
        let sent = engine.invite_player("p1", recipient).await.expect("invite");
        engine
            .respond_invitation(recipient, &sent.id, false)
            .await
            .expect("decline");
    }
    let game = store.get(&game_id).await.expect("get").expect("exists");
    assert_eq!(game.invitations.len(), 2);
}

#[test]
fn test_prune_resolved_keeps_pending() {
    let log = vec![
        invitation("a", InvitationStatus::Declined),
        invitation("b", InvitationStatus::Pending),
        invitation("c", InvitationStatus::Accepted),
        invitation("d", InvitationStatus::Declined),
    ];
    let kept: Vec<String> = prune_resolved(&log, 1).into_iter().map(|i| i.id).collect();
    assert_eq!(kept, vec!["b", "d"]);

    let all: Vec<String> = prune_resolved(&log, 10).into_iter().map(|i| i.id).collect();
    assert_eq!(all, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn test_accepting_while_seated_counts_as_success() {
    let (engine, store, game_id) = setup(EngineConfig::default()).await;
    let sent = engine.invite_player("p1", "p2").await.expect("invite");
    let mut game: Game = store.get(&game_id).await.expect("get").expect("exists");
    game.players.push(Player::new("p2", "Bo", PlayerColor::Yellow, 5000));
    store.set(game).await.expect("seed");
    store
        .set_current_room("p2", None)
        .await
        .expect("clear pointer");

    let response = engine
        .respond_invitation("p2", &sent.id, true)
        .await
        .expect("respond");
    assert!(matches!(
        response,
        InvitationResponse::Accepted {
            join: JoinOutcome::AlreadyJoined,
            ..
        }
    ));
    let profile = store.profile("p2").await.expect("read").expect("exists");
    assert_eq!(profile.current_room_id, Some(game_id));
}
