// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Last-known stock per item and transition classification.

use std::collections::HashMap;

use stockwatch_core::ItemKey;

use crate::summary::brand_of;

/// An item found on a target page, with what notifications show about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedItem {
    pub key: ItemKey,
    pub title: String,
    /// Target page, used as the buy link.
    pub url: String,
    pub brand: String,
}

impl TrackedItem {
    pub fn new(target_url: &str, title: &str) -> Self {
        Self {
            key: ItemKey::new(target_url, title),
            title: title.to_string(),
            url: target_url.to_string(),
            brand: brand_of(target_url),
        }
    }
}

/// What an observation means relative to the previous one for the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// First sighting, or no change.
    None,
    /// Stock went from zero to positive.
    Restocked { previous: u32, current: u32 },
    /// Stock went from positive to zero.
    SoldOut { previous: u32 },
    /// Stock changed between two positive values.
    InStockChanged { previous: u32, current: u32 },
}

impl Transition {
    /// Classifies `current` against the previously cached value.
    pub fn classify(previous: Option<u32>, current: u32) -> Self {
        match previous {
            None => Self::None,
            Some(0) if current > 0 => Self::Restocked {
                previous: 0,
                current,
            },
            Some(previous) if previous > 0 && current == 0 => Self::SoldOut { previous },
            Some(previous) if previous != current => Self::InStockChanged { previous, current },
            Some(_) => Self::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ItemState {
    last_stock: Option<u32>,
    in_stock_notified: bool,
}

/// Per-item state keyed by [`ItemKey`].
///
/// State lives in memory only and starts empty on every process start.
#[derive(Debug, Default)]
pub struct ItemTracker {
    items: HashMap<ItemKey, ItemState>,
}

impl ItemTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `stock` for `key` and returns the transition it represents.
    ///
    /// The cached value is overwritten whatever the classification.
    pub fn observe(&mut self, key: &ItemKey, stock: u32) -> Transition {
        let state = self.items.entry(key.clone()).or_default();
        let transition = Transition::classify(state.last_stock, stock);
        state.last_stock = Some(stock);
        transition
    }

    pub fn last_stock(&self, key: &ItemKey) -> Option<u32> {
        self.items.get(key).and_then(|s| s.last_stock)
    }

    /// Whether a restock notification already went out for the current in-stock run.
    pub fn in_stock_notified(&self, key: &ItemKey) -> bool {
        self.items.get(key).is_some_and(|s| s.in_stock_notified)
    }

    pub fn set_in_stock_notified(&mut self, key: &ItemKey, notified: bool) {
        self.items.entry(key.clone()).or_default().in_stock_notified = notified;
    }

    /// Number of items seen so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
