//! Deck / hand / discard economy for one team.
//!
//! The deck only moves [`MaskId`]s between piles. The engine owns the masks
//! themselves and updates their location (and restores reshuffled masks).

use crate::error::{ErrorSeverity, GameError};
use crate::rng::RngOracle;
use crate::state::MaskId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeckError {
    #[error("hand is full (limit: {limit})")]
    HandFull { limit: usize },

    #[error("{mask} is not in hand")]
    NotInHand { mask: MaskId },

    #[error("team has no deck")]
    NoDeck,
}

impl GameError for DeckError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            DeckError::HandFull { .. } => ErrorSeverity::Recoverable,
            DeckError::NotInHand { .. } | DeckError::NoDeck => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DeckError::HandFull { .. } => "DECK_HAND_FULL",
            DeckError::NotInHand { .. } => "DECK_NOT_IN_HAND",
            DeckError::NoDeck => "DECK_NO_DECK",
        }
    }
}

/// A successful draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    pub mask: MaskId,
    /// Masks moved from discard back into the draw pile before drawing.
    pub reshuffled: Vec<MaskId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    /// Top of the pile is the last element.
    draw_pile: Vec<MaskId>,
    hand: Vec<MaskId>,
    discard: Vec<MaskId>,
}

impl Deck {
    pub fn new(cards: Vec<MaskId>) -> Self {
        Self {
            draw_pile: cards,
            hand: Vec::new(),
            discard: Vec::new(),
        }
    }

    pub fn draw_pile(&self) -> &[MaskId] {
        &self.draw_pile
    }

    pub fn hand(&self) -> &[MaskId] {
        &self.hand
    }

    pub fn discard_pile(&self) -> &[MaskId] {
        &self.discard
    }

    pub fn in_hand(&self, mask: MaskId) -> bool {
        self.hand.contains(&mask)
    }

    /// Nothing left to draw, even after a reshuffle. A terminal state, not an error.
    pub fn is_exhausted(&self) -> bool {
        self.draw_pile.is_empty() && self.discard.is_empty()
    }

    pub fn shuffle(&mut self, rng: &impl RngOracle, seed: u64) {
        rng.shuffle(seed, &mut self.draw_pile);
    }

    /// Moves the whole discard pile under the draw pile and shuffles it.
    pub fn reshuffle(&mut self, rng: &impl RngOracle, seed: u64) -> Vec<MaskId> {
        let moved = core::mem::take(&mut self.discard);
        self.draw_pile.extend_from_slice(&moved);
        rng.shuffle(seed, &mut self.draw_pile);
        moved
    }

    /// Draws the top mask into hand, reshuffling the discard pile first when
    /// the draw pile is empty. Returns `None` once both piles are empty.
    pub fn draw(&mut self, rng: &impl RngOracle, seed: u64) -> Option<Draw> {
        let reshuffled = if self.draw_pile.is_empty() {
            self.reshuffle(rng, seed)
        } else {
            Vec::new()
        };
        let mask = self.draw_pile.pop()?;
        self.hand.push(mask);
        Some(Draw { mask, reshuffled })
    }

    /// Takes a mask out of hand (to equip it).
    pub fn take_from_hand(&mut self, mask: MaskId) -> Result<(), DeckError> {
        let index = self
            .hand
            .iter()
            .position(|m| *m == mask)
            .ok_or(DeckError::NotInHand { mask })?;
        self.hand.remove(index);
        Ok(())
    }

    /// Moves a mask from hand to the discard pile.
    pub fn discard(&mut self, mask: MaskId) -> Result<(), DeckError> {
        self.take_from_hand(mask)?;
        self.discard.push(mask);
        Ok(())
    }

    /// Puts a mask that left play (destroyed or unequipped) on the discard pile.
    pub fn push_discard(&mut self, mask: MaskId) {
        self.discard.push(mask);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    fn deck(n: u32) -> Deck {
        Deck::new((0..n).map(MaskId).collect())
    }

    #[test]
    fn exhausted_deck_draws_nothing_until_a_discard() {
        let mut deck = deck(3);
        for _ in 0..3 {
            assert!(deck.draw(&PcgRng, 1).is_some());
        }
        assert_eq!(deck.draw(&PcgRng, 1), None);
        assert!(deck.is_exhausted());

        let first = deck.hand()[0];
        deck.discard(first).unwrap();
        let draw = deck.draw(&PcgRng, 2).unwrap();
        assert_eq!(draw.mask, first);
        assert_eq!(draw.reshuffled, vec![first]);
    }

    #[test]
    fn discarding_unknown_mask_is_rejected() {
        let mut deck = deck(2);
        assert_eq!(
            deck.discard(MaskId(0)),
            Err(DeckError::NotInHand { mask: MaskId(0) })
        );
    }

    #[test]
    fn draw_takes_top_of_pile() {
        let mut deck = deck(3);
        let draw = deck.draw(&PcgRng, 0).unwrap();
        assert_eq!(draw.mask, MaskId(2));
        assert!(draw.reshuffled.is_empty());
        assert_eq!(deck.hand(), &[MaskId(2)]);
    }
}
