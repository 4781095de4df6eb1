//! End-of-game ranking.

use tracing::instrument;

use crate::Player;

/// Players tied for first place.
///
/// Most properties wins, ties broken by money; players still tied are all
/// co-winners. Roster order is preserved.
#[instrument(skip(players), fields(roster = players.len()))]
pub fn co_winners(players: &[Player]) -> Vec<&Player> {
    let Some(best) = players.iter().map(|p| (p.property_count, p.money)).max() else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|p| (p.property_count, p.money) == best)
        .collect()
}

/// Announcement line for the winners.
pub fn winner_message(winners: &[&Player]) -> String {
    match winners {
        [] => "No winner.".to_string(),
        [winner] => format!(
            "Winner: {} with {} properties and ${}!",
            winner.display_name, winner.property_count, winner.money
        ),
        tied => format!(
            "It's a tie! Winners by money: {}",
            tied.iter()
                .map(|p| p.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
