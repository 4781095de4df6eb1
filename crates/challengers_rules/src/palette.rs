//! The fixed player palette.
//!
//! The palette bounds the roster size and, through the board layout,
//! decides which squares belong to which color.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tracing::instrument;

/// A player color, in fixed assignment order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    /// First color, always held by the game creator.
    #[display("red")]
    Red,
    /// Second color.
    #[display("yellow")]
    Yellow,
    /// Third color.
    #[display("blue")]
    Blue,
    /// Fourth color.
    #[display("green")]
    Green,
    /// Fifth color.
    #[display("orange")]
    Orange,
}

/// Number of colors in the palette, which is also the roster capacity.
pub const PALETTE_SIZE: usize = PlayerColor::COUNT;

impl PlayerColor {
    /// Position of this color in the palette.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks a color up by palette index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Hex code used by clients to paint the color.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#FF0000",
            Self::Yellow => "#FFFF00",
            Self::Blue => "#0000FF",
            Self::Green => "#008000",
            Self::Orange => "#FFA500",
        }
    }

    /// First palette color not present in `taken`, in palette order.
    #[instrument(skip(taken))]
    pub fn first_unused<'a>(taken: impl IntoIterator<Item = &'a PlayerColor>) -> Option<Self> {
        let taken: Vec<PlayerColor> = taken.into_iter().copied().collect();
        Self::iter().find(|color| !taken.contains(color))
    }
}
