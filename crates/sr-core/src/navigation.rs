//! Per-slot navigation state
//!
//! The state has one entry per slot. A transition never mutates it: every
//! navigation builds the next value and the router swaps it in whole.

use std::cmp::Ordering;

use crate::types::{QueryParams, SlotPosition, UrlParams, ViewKey};

/// A view occupying a slot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "camelCase"))]
pub struct ActiveView<V> {
    pub key: ViewKey,
    pub view: V,
    pub url_params: UrlParams,
    pub query_params: QueryParams,
}

/// What a navigation did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A route matched and its slot was replaced
    Matched(SlotPosition),
    /// Nothing matched and the not-found view took slot 0
    NotFound,
    /// Nothing matched and no view was produced
    Unchanged,
}

impl Transition {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Slot assignment array.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct NavigationState<V> {
    slots: Vec<Option<ActiveView<V>>>,
}

impl<V> NavigationState<V> {
    /// All slots empty.
    pub fn empty(slot_count: usize) -> Self {
        Self {
            slots: (0..slot_count).map(|_| None).collect(),
        }
    }

    /// Not-found view in slot 0, every other slot empty.
    pub fn not_found(slot_count: usize, view: V) -> Self {
        let mut state = Self::empty(slot_count.max(1));
        state.slots[0] = Some(ActiveView {
            key: ViewKey::NotFound,
            view,
            url_params: UrlParams::new(),
            query_params: QueryParams::new(),
        });
        state
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, slot: usize) -> Option<&ActiveView<V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<ActiveView<V>>] {
        &self.slots
    }

    /// Occupied slots, in slot order.
    pub fn active_views(&self) -> impl Iterator<Item = &ActiveView<V>> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Next state after a match at `position`.
    ///
    /// Slots before the matched slot are kept, the matched slot takes `view`
    /// and later slots are cleared.
    pub fn with_match(&self, position: SlotPosition, view: ActiveView<V>) -> Self
    where
        V: Clone,
    {
        let mut view = Some(view);
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(slot, entry)| match slot.cmp(&position.slot) {
                Ordering::Less => entry.clone(),
                Ordering::Equal => view.take(),
                Ordering::Greater => None,
            })
            .collect();
        Self { slots }
    }
}
