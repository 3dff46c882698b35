//! Registry owning the food items scattered across the arena.

use forage_core::{Arena, FoodId, FoodSnapshot, Position, RandomSource};

/// Live food items in spawn order.
#[derive(Clone, Debug, Default)]
pub struct FoodRegistry {
    items: Vec<FoodSnapshot>,
    next_id: u32,
}

impl FoodRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live set with `count` items at uniformly random positions.
    pub fn spawn_batch(&mut self, count: u32, arena: &Arena, rng: &mut dyn RandomSource) {
        self.items.clear();
        for _ in 0..count {
            let position = arena.random_position(rng);
            self.push(position);
        }
    }

    /// Replaces the live set with items at the provided positions.
    pub fn spawn_at(&mut self, positions: &[Position]) {
        self.items.clear();
        for position in positions {
            self.push(*position);
        }
    }

    /// Removes the item with the provided identity, returning it when present.
    pub fn remove(&mut self, id: FoodId) -> Option<FoodSnapshot> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Number of live items.
    #[must_use]
    pub fn count(&self) -> u32 {
        crate::count_u32(self.items.len())
    }

    /// Reports whether every item has been eaten.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Live items in spawn order.
    #[must_use]
    pub fn as_slice(&self) -> &[FoodSnapshot] {
        &self.items
    }

    fn push(&mut self, position: Position) {
        let id = FoodId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(FoodSnapshot { id, position });
    }
}
