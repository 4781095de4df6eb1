//! Board layout and built properties.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{PALETTE_SIZE, PlayerColor, UserId};

/// A property built on a square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Player who built it.
    pub owner_id: UserId,
    /// Rent charged to other players landing here.
    pub rent: i64,
}

/// Built properties keyed by square index.
///
/// Holds an entry only for squares where a property was actually built.
pub type BoardState = BTreeMap<usize, Property>;

/// Error building a board layout.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    /// A board needs at least one square.
    #[display("Board layout has no squares")]
    Empty,
}

/// Maps each square of the track to the palette color that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PlayerColor>", into = "Vec<PlayerColor>")]
pub struct BoardLayout {
    squares: Vec<PlayerColor>,
}

impl BoardLayout {
    /// The classic layout: square `i` belongs to palette color `i mod 5`.
    #[instrument]
    pub fn uniform(size: usize) -> Self {
        let squares = (0..size.max(1))
            .filter_map(|square| PlayerColor::from_index(square % PALETTE_SIZE))
            .collect();
        Self { squares }
    }

    /// A layout with an explicit color for every square.
    pub fn from_colors(squares: Vec<PlayerColor>) -> Result<Self, LayoutError> {
        if squares.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(Self { squares })
    }

    /// Number of squares.
    pub fn size(&self) -> usize {
        self.squares.len()
    }

    /// Color owning the given square; positions wrap around the track.
    pub fn color_at(&self, position: usize) -> PlayerColor {
        self.squares[position % self.squares.len()]
    }

    /// Position reached by moving `steps` squares forward from `position`.
    pub fn advance(&self, position: usize, steps: u32) -> usize {
        (position + steps as usize) % self.squares.len()
    }
}

impl TryFrom<Vec<PlayerColor>> for BoardLayout {
    type Error = LayoutError;

    fn try_from(squares: Vec<PlayerColor>) -> Result<Self, Self::Error> {
        Self::from_colors(squares)
    }
}

impl From<BoardLayout> for Vec<PlayerColor> {
    fn from(layout: BoardLayout) -> Self {
        layout.squares
    }
}
