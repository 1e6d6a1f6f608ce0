use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{ItemClass, ItemTraits};

/// Ordered, bounded list of carried items.
///
/// The configured capacity never exceeds [`GameConfig::MAX_INVENTORY_SLOTS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    items: ArrayVec<Arc<ItemTraits>, { GameConfig::MAX_INVENTORY_SLOTS }>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_INVENTORY_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: ArrayVec::new(),
            capacity: capacity.clamp(1, GameConfig::MAX_INVENTORY_SLOTS),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, slot: usize) -> Option<&Arc<ItemTraits>> {
        self.items.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemTraits>> {
        self.items.iter()
    }

    /// Whether an item of the same class is already carried.
    pub fn contains_class(&self, class: ItemClass) -> bool {
        self.items.iter().any(|item| item.class() == class)
    }

    /// Append `item`. Hands it back when the inventory is full.
    ///
    /// # Errors
    ///
    /// Returns the item unchanged when no slot is free.
    pub fn push(&mut self, item: Arc<ItemTraits>) -> Result<usize, Arc<ItemTraits>> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Put `item` in `slot`, returning what was there.
    pub fn replace(&mut self, slot: usize, item: Arc<ItemTraits>) -> Option<Arc<ItemTraits>> {
        let current = self.items.get_mut(slot)?;
        Some(std::mem::replace(current, item))
    }

    /// Take the item out of `slot`, shifting later items down.
    pub fn remove(&mut self, slot: usize) -> Option<Arc<ItemTraits>> {
        if slot >= self.items.len() {
            return None;
        }
        Some(self.items.remove(slot))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }

    /// Numbered listing for the `inventory` command.
    pub fn describe(&self) -> Vec<String> {
        if self.items.is_empty() {
            return vec!["Your inventory is empty.".to_owned()];
        }
        let mut lines = vec![format!(
            "Inventory ({}/{}):",
            self.items.len(),
            self.capacity
        )];
        lines.extend(
            self.items
                .iter()
                .enumerate()
                .map(|(slot, item)| format!("{}. {}", slot + 1, item.name)),
        );
        lines
    }
}
