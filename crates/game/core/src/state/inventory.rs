//! Item inventory.

use crate::config::GameConfig;
use crate::env::ItemDefinition;

/// One inventory slot. `quantity` is always at least one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item: ItemDefinition,
    pub quantity: u32,
}

/// Ordered inventory slots.
///
/// Stackable items share one slot per id; every unit of a non-stackable item
/// occupies its own slot. At most [`GameConfig::MAX_INVENTORY_SLOTS`] slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryState {
    entries: Vec<InventoryEntry>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds up to `quantity` units and returns a confirmation line.
    ///
    /// A zero quantity is a no-op. Units that need a new slot when the
    /// inventory is full are dropped.
    pub fn add(&mut self, item: &ItemDefinition, quantity: u32) -> String {
        if quantity == 0 {
            return format!("Received no {}.", item.name);
        }

        let free = GameConfig::MAX_INVENTORY_SLOTS.saturating_sub(self.entries.len());
        let added = if item.stackable {
            if let Some(entry) = self.entries.iter_mut().find(|e| e.item.id == item.id) {
                entry.quantity = entry.quantity.saturating_add(quantity);
                quantity
            } else if free > 0 {
                self.entries.push(InventoryEntry {
                    item: item.clone(),
                    quantity,
                });
                quantity
            } else {
                0
            }
        } else {
            let added = quantity.min(u32::try_from(free).unwrap_or(u32::MAX));
            self.entries.extend((0..added).map(|_| InventoryEntry {
                item: item.clone(),
                quantity: 1,
            }));
            added
        };

        if added < quantity {
            tracing::warn!(item = %item.id, quantity, added, "inventory full");
        }
        match added {
            0 => format!("No room for {}.", item.name),
            1 => format!("Received {}.", item.name),
            _ => format!("Received {} x{}.", item.name, added),
        }
    }

    /// Takes one unit from the slot at `index`, removing the slot when it empties.
    pub fn consume(&mut self, index: usize) -> Option<ItemDefinition> {
        let entry = self.entries.get_mut(index)?;
        entry.quantity -= 1;
        if entry.quantity == 0 {
            Some(self.entries.remove(index).item)
        } else {
            Some(entry.item.clone())
        }
    }

    pub fn get(&self, index: usize) -> Option<&InventoryEntry> {
        self.entries.get(index)
    }

    /// Total units held of `id` across all slots.
    pub fn count(&self, id: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.item.id == id)
            .map(|e| e.quantity)
            .sum()
    }

    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EventOutcome;

    fn item(id: &str, stackable: bool) -> ItemDefinition {
        ItemDefinition {
            id: id.into(),
            name: id.to_uppercase(),
            stackable,
            effect: EventOutcome::default(),
        }
    }

    #[test]
    fn stackables_merge() {
        let mut inventory = InventoryState::new();
        inventory.add(&item("potion", true), 2);
        let line = inventory.add(&item("potion", true), 3);
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.count("potion"), 5);
        assert_eq!(line, "Received POTION x3.");
    }

    #[test]
    fn non_stackables_take_separate_slots() {
        let mut inventory = InventoryState::new();
        inventory.add(&item("lantern", false), 3);
        assert_eq!(inventory.len(), 3);
        assert!(inventory.entries().iter().all(|e| e.quantity == 1));
    }

    #[test]
    fn full_inventory_drops_excess() {
        let mut inventory = InventoryState::new();
        let line = inventory.add(&item("lantern", false), u32::MAX);
        assert_eq!(inventory.len(), GameConfig::MAX_INVENTORY_SLOTS);
        assert_eq!(line, format!("Received LANTERN x{}.", GameConfig::MAX_INVENTORY_SLOTS));

        assert_eq!(inventory.add(&item("potion", true), 2), "No room for POTION.");
        assert_eq!(inventory.count("potion"), 0);
    }

    #[test]
    fn consume_removes_empty_slot() {
        let mut inventory = InventoryState::new();
        inventory.add(&item("potion", true), 2);
        inventory.add(&item("lantern", false), 1);

        assert_eq!(inventory.consume(0).map(|i| i.id), Some("potion".into()));
        assert_eq!(inventory.count("potion"), 1);
        assert_eq!(inventory.consume(0).map(|i| i.id), Some("potion".into()));
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.get(0).map(|e| e.item.id.as_str()), Some("lantern"));
        assert_eq!(inventory.consume(5), None);
    }
}
