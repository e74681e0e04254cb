//! Battle events: an append-only journal plus synchronous observers.
//!
//! Every observable state change is emitted as a [`BattleEvent`]. Events are
//! pushed to a journal that collaborators drain (the runtime forwards them to
//! its broadcast bus) and handed to registered observers in subscription
//! order. Observers are removed by the [`SubscriptionId`] returned on
//! subscription, so unsubscribing never affects anyone else.

use crate::action::{AbilityKind, ActionCommand, CommandError, ResolutionStep};
use crate::state::{MaskId, StatusKind, Team, UnitId};

/// Coarse grouping used for topic routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventCategory {
    /// Round lifecycle, resource grants, battle over.
    Round,
    /// Health, death, statuses.
    Unit,
    /// Mask lifecycle and the deck economy.
    Mask,
    /// Command lifecycle, steps, previews, input requests.
    Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    BattleStarted {
        player_units: Vec<UnitId>,
        enemy_units: Vec<UnitId>,
    },
    RoundStarted {
        team: Team,
        round: u32,
    },
    RoundEnded {
        team: Team,
        round: u32,
    },
    TeamSwitched {
        from: Team,
        to: Team,
    },
    ActionPointsGranted {
        team: Team,
        amount: u32,
    },
    BattleOver {
        winner: Team,
        winner_is_player: bool,
    },

    InputRequested {
        unit: UnitId,
    },
    EnemyActionPreview {
        unit: UnitId,
        command: ActionCommand,
    },
    ActionQueued {
        command: ActionCommand,
    },
    ActionStarted {
        command: ActionCommand,
    },
    ActionRejected {
        command: ActionCommand,
        error: CommandError,
    },
    StepResolved {
        step: ResolutionStep,
    },
    ActionResolved {
        command: ActionCommand,
    },
    AbilityUsed {
        unit: UnitId,
        ability: AbilityKind,
    },

    UnitHealthChanged {
        unit: UnitId,
        delta: i32,
        current: u32,
    },
    UnitDied {
        unit: UnitId,
    },
    StatusApplied {
        unit: UnitId,
        kind: StatusKind,
        stacks: u8,
        duration: i32,
    },
    StatusRemoved {
        unit: UnitId,
        kind: StatusKind,
    },

    MaskEquipped {
        unit: UnitId,
        mask: MaskId,
    },
    MaskUnequipped {
        unit: UnitId,
        mask: MaskId,
    },
    MaskDestroyed {
        mask: MaskId,
        wielder: Option<UnitId>,
    },
    MaskDurabilityChanged {
        mask: MaskId,
        current: u32,
    },
    MaskActivated {
        unit: UnitId,
        mask: MaskId,
    },
    MaskDrawn {
        team: Team,
        mask: MaskId,
    },
    MaskDiscarded {
        team: Team,
        mask: MaskId,
    },
    DeckReshuffled {
        team: Team,
        count: usize,
    },
}

impl BattleEvent {
    pub fn category(&self) -> EventCategory {
        use BattleEvent::*;
        match self {
            BattleStarted { .. }
            | RoundStarted { .. }
            | RoundEnded { .. }
            | TeamSwitched { .. }
            | ActionPointsGranted { .. }
            | BattleOver { .. } => EventCategory::Round,
            InputRequested { .. }
            | EnemyActionPreview { .. }
            | ActionQueued { .. }
            | ActionStarted { .. }
            | ActionRejected { .. }
            | StepResolved { .. }
            | ActionResolved { .. }
            | AbilityUsed { .. } => EventCategory::Action,
            UnitHealthChanged { .. }
            | UnitDied { .. }
            | StatusApplied { .. }
            | StatusRemoved { .. } => EventCategory::Unit,
            MaskEquipped { .. }
            | MaskUnequipped { .. }
            | MaskDestroyed { .. }
            | MaskDurabilityChanged { .. }
            | MaskActivated { .. }
            | MaskDrawn { .. }
            | MaskDiscarded { .. }
            | DeckReshuffled { .. } => EventCategory::Mask,
        }
    }
}

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&BattleEvent) + Send>;

/// Fans events out to observers and journals them until drained.
///
/// The journal only shrinks through [`drain`](Self::drain).
#[derive(Default)]
pub struct EventDispatcher {
    journal: Vec<BattleEvent>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u64,
}

impl core::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("journal", &self.journal.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&BattleEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes exactly the observer registered under `id`.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Observers see the event first, then it is journaled.
    pub fn emit(&mut self, event: BattleEvent) {
        for (_, observer) in &mut self.observers {
            observer(&event);
        }
        self.journal.push(event);
    }

    pub fn journal(&self) -> &[BattleEvent] {
        &self.journal
    }

    pub fn drain(&mut self) -> Vec<BattleEvent> {
        core::mem::take(&mut self.journal)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn observers_run_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(move |_| seen.lock().unwrap().push(tag));
        }

        dispatcher.emit(BattleEvent::UnitDied { unit: UnitId(0) });
        assert_eq!(*seen.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_observer() {
        let count = Arc::new(Mutex::new((0, 0)));
        let mut dispatcher = EventDispatcher::new();
        let a = {
            let count = Arc::clone(&count);
            dispatcher.subscribe(move |_| count.lock().unwrap().0 += 1)
        };
        {
            let count = Arc::clone(&count);
            dispatcher.subscribe(move |_| count.lock().unwrap().1 += 1);
        }

        assert!(dispatcher.unsubscribe(a));
        assert!(!dispatcher.unsubscribe(a));
        dispatcher.emit(BattleEvent::UnitDied { unit: UnitId(1) });
        assert_eq!(*count.lock().unwrap(), (0, 1));
    }

    #[test]
    fn drain_empties_the_journal() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.emit(BattleEvent::TeamSwitched {
            from: Team::Player,
            to: Team::Enemy,
        });
        assert_eq!(dispatcher.drain().len(), 1);
        assert!(dispatcher.journal().is_empty());
    }

    #[test]
    fn categories_route_by_concern() {
        assert_eq!(
            BattleEvent::MaskDrawn {
                team: Team::Player,
                mask: MaskId(0)
            }
            .category(),
            EventCategory::Mask
        );
        assert_eq!(
            BattleEvent::UnitDied { unit: UnitId(0) }.category(),
            EventCategory::Unit
        );
    }
}
