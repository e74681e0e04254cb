//! Integer resource pools indexed by a closed enum.

use strum::EnumCount;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    /// Per-unit attack allowance; attacks and abilities spend it.
    Attack,
    /// Team-wide action points; mask switches, activations and draws spend it.
    ActionPoint,
}

impl ResourceKind {
    #[inline]
    const fn slot(self) -> usize {
        match self {
            ResourceKind::Attack => 0,
            ResourceKind::ActionPoint => 1,
        }
    }
}

/// Counters that never go negative and never exceed their maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    current: [u32; ResourceKind::COUNT],
    max: [u32; ResourceKind::COUNT],
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cap for `kind`, clamping the current value into it.
    pub fn with_max(mut self, kind: ResourceKind, max: u32) -> Self {
        self.set_max(kind, max);
        self
    }

    pub fn set_max(&mut self, kind: ResourceKind, max: u32) {
        let slot = kind.slot();
        self.max[slot] = max;
        self.current[slot] = self.current[slot].min(max);
    }

    #[inline]
    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.current[kind.slot()]
    }

    #[inline]
    pub fn max(&self, kind: ResourceKind) -> u32 {
        self.max[kind.slot()]
    }

    pub fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.get(kind) >= amount
    }

    /// Flat reset to `value` (capped), discarding whatever was left.
    pub fn reset_to(&mut self, kind: ResourceKind, value: u32) {
        let slot = kind.slot();
        self.current[slot] = value.min(self.max[slot]);
    }

    pub fn refill(&mut self, kind: ResourceKind) {
        let slot = kind.slot();
        self.current[slot] = self.max[slot];
    }

    /// Adds up to the cap and returns the amount actually gained.
    pub fn gain(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let slot = kind.slot();
        let before = self.current[slot];
        self.current[slot] = before.saturating_add(amount).min(self.max[slot]);
        self.current[slot] - before
    }

    /// Debits `amount` when available. Returns false and leaves the pool
    /// untouched otherwise.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> bool {
        let slot = kind.slot();
        match self.current[slot].checked_sub(amount) {
            Some(rest) => {
                self.current[slot] = rest;
                true
            }
            None => false,
        }
    }
}
