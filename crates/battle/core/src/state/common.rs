//! Identifiers and small shared enums.

use core::fmt;

/// Index of a unit in the battle arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Index of a mask in the battle arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskId(pub u32);

impl MaskId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mask#{}", self.0)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::Player => 0,
            Team::Enemy => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Horizontal lane a unit fights in. Splash damage spreads to adjacent lanes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lane {
    Up,
    Middle,
    Bottom,
}

impl Lane {
    const fn rank(self) -> u8 {
        match self {
            Lane::Up => 0,
            Lane::Middle => 1,
            Lane::Bottom => 2,
        }
    }

    /// Up↔Middle and Middle↔Bottom are adjacent; a lane is not adjacent to itself.
    pub const fn is_adjacent(self, other: Lane) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }
}

/// Per-team storage indexed by [`Team`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerTeam<T> {
    slots: [T; 2],
}

impl<T> PerTeam<T> {
    pub fn new(player: T, enemy: T) -> Self {
        Self {
            slots: [player, enemy],
        }
    }

    #[inline]
    pub fn get(&self, team: Team) -> &T {
        &self.slots[team.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, team: Team) -> &mut T {
        &mut self.slots[team.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_adjacency_is_symmetric_and_excludes_self() {
        assert!(Lane::Up.is_adjacent(Lane::Middle));
        assert!(Lane::Middle.is_adjacent(Lane::Up));
        assert!(Lane::Middle.is_adjacent(Lane::Bottom));
        assert!(!Lane::Up.is_adjacent(Lane::Bottom));
        assert!(!Lane::Middle.is_adjacent(Lane::Middle));
    }

    #[test]
    fn opponent_flips_team() {
        assert_eq!(Team::Player.opponent(), Team::Enemy);
        assert_eq!(Team::Enemy.opponent(), Team::Player);
    }
}
