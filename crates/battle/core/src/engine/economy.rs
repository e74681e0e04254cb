//! Deck economy: drawing and discarding masks for action points.

use tracing::{debug, info, warn};

use super::{BattleEngine, EngineError};
use crate::events::BattleEvent;
use crate::rng::{SeedContext, compute_seed};
use crate::state::{DeckError, MaskId, MaskLocation, ResourceKind, Team};

impl BattleEngine {
    /// Draws one mask into `team`'s hand for `draw_cost` action points.
    ///
    /// Returns `Ok(None)` without charging anything when the deck is
    /// exhausted (draw pile and discard both empty).
    pub fn draw_mask(&mut self, team: Team) -> Result<Option<MaskId>, EngineError> {
        self.require_active_team(team)?;

        let limit = self.state.config.hand_limit;
        let deck = self.state.deck(team).ok_or(DeckError::NoDeck)?;
        if deck.hand().len() >= limit {
            return Err(DeckError::HandFull { limit }.into());
        }
        if deck.is_exhausted() {
            debug!(target: "battle::economy", %team, "deck exhausted; nothing drawn");
            return Ok(None);
        }

        let cost = self.state.config.draw_cost;
        let pool = self.state.pools.get_mut(team);
        let available = pool.get(ResourceKind::ActionPoint);
        if !pool.spend(ResourceKind::ActionPoint, cost) {
            return Err(EngineError::InsufficientActionPoints {
                required: cost,
                available,
            });
        }

        Ok(self.draw_into_hand(team))
    }

    /// Moves a mask from `team`'s hand to its discard pile.
    pub fn discard_mask(&mut self, team: Team, mask: MaskId) -> Result<(), EngineError> {
        self.require_active_team(team)?;
        self.state
            .deck_mut(team)
            .ok_or(DeckError::NoDeck)?
            .discard(mask)?;
        if let Some(record) = self.state.mask_mut(mask) {
            record.location = MaskLocation::Discard;
        }
        debug!(target: "battle::economy", %team, mask = %mask, "mask discarded from hand");
        self.emit(BattleEvent::MaskDiscarded { team, mask });
        Ok(())
    }

    /// Draws without paying. Reshuffled masks come back fully restored.
    pub(super) fn draw_into_hand(&mut self, team: Team) -> Option<MaskId> {
        let seed = compute_seed(
            self.state.config.game_seed,
            u64::from(self.shuffles) + 1,
            team.index() as u32,
            SeedContext::Shuffle as u32,
        );
        let draw = self.state.deck_mut(team)?.draw(&self.rng, seed)?;

        if !draw.reshuffled.is_empty() {
            self.shuffles += 1;
            for id in &draw.reshuffled {
                if let Some(mask) = self.state.mask_mut(*id) {
                    mask.restore();
                    mask.location = MaskLocation::Deck;
                }
            }
            info!(
                target: "battle::economy",
                %team,
                count = draw.reshuffled.len(),
                "discard pile reshuffled"
            );
            self.emit(BattleEvent::DeckReshuffled {
                team,
                count: draw.reshuffled.len(),
            });
        }

        if let Some(mask) = self.state.mask_mut(draw.mask) {
            mask.location = MaskLocation::Hand;
        }
        debug!(target: "battle::economy", %team, mask = %draw.mask, "mask drawn");
        self.emit(BattleEvent::MaskDrawn {
            team,
            mask: draw.mask,
        });
        Some(draw.mask)
    }

    fn require_active_team(&self, team: Team) -> Result<(), EngineError> {
        match self.state.active_team() {
            Some(active) if active == team => Ok(()),
            Some(_) => {
                warn!(target: "battle::economy", %team, "deck action outside the team's round");
                Err(EngineError::NotActiveTeam { team })
            }
            None => Err(EngineError::NotActive),
        }
    }
}
