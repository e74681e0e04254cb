//! Greedy player policy for headless runs.

use async_trait::async_trait;
use battle_core::{ActionCommand, ActionKind, BattleState, UnitId};

use crate::api::{ActionProvider, Result};

/// Picks from the commands the unit could legally issue right now.
///
/// Preference order: attack the weakest opponent, put on a mask if bare,
/// activate the worn mask. Anything else passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPlayerProvider;

impl AutoPlayerProvider {
    pub fn choose(state: &BattleState, unit: UnitId) -> Option<ActionCommand> {
        let controller = state.controller(unit)?;
        let options = controller.available_actions(state);

        let weakest_attack = options
            .iter()
            .filter(|c| matches!(c.kind, ActionKind::Attack(_)))
            .filter_map(|c| {
                let target = state.unit(c.target?)?;
                Some((target.current_health, target.id, *c))
            })
            .min_by_key(|(health, id, _)| (*health, *id))
            .map(|(_, _, command)| command);
        if weakest_attack.is_some() {
            return weakest_attack;
        }

        let bare = state.unit(unit).is_some_and(|u| u.mask.is_none());
        if bare
            && let Some(switch) = options
                .iter()
                .find(|c| matches!(c.kind, ActionKind::SwitchMask { .. }))
        {
            return Some(*switch);
        }

        options
            .into_iter()
            .find(|c| matches!(c.kind, ActionKind::ActivateMask { .. }))
    }
}

#[async_trait]
impl ActionProvider for AutoPlayerProvider {
    async fn provide_action(
        &self,
        unit: UnitId,
        state: &BattleState,
    ) -> Result<Option<ActionCommand>> {
        Ok(Self::choose(state, unit))
    }
}
