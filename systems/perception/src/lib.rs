#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the food item a creature should chase.

use forage_core::{FoodId, FoodSnapshot, Position, DEFAULT_EAT_RADIUS};

/// Food item selected as a creature's target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    /// Identity of the selected item.
    pub food: FoodId,
    /// Location of the selected item.
    pub position: Position,
    /// Distance between the creature and the item.
    pub distance: f32,
    /// Facing that points the creature straight at the item.
    pub bearing: f32,
    /// Whether the item is close enough to be eaten this tick.
    pub within_reach: bool,
}

/// Perception system that reuses a scratch buffer between creatures.
#[derive(Debug)]
pub struct Perception {
    eat_radius: f32,
    in_view: Vec<Candidate>,
}

impl Default for Perception {
    fn default() -> Self {
        Self::new(DEFAULT_EAT_RADIUS)
    }
}

impl Perception {
    /// Creates a perception system that eats within `eat_radius`.
    #[must_use]
    pub fn new(eat_radius: f32) -> Self {
        Self {
            eat_radius,
            in_view: Vec::new(),
        }
    }

    /// Distance at which a target counts as within reach.
    #[must_use]
    pub const fn eat_radius(&self) -> f32 {
        self.eat_radius
    }

    /// Selects the nearest food item strictly inside `view_radius`.
    ///
    /// Items are scanned in registry order and an item replaces the current
    /// best only when strictly closer, so ties keep the earlier item. Returns
    /// `None` when nothing is in view.
    pub fn handle(
        &mut self,
        position: Position,
        view_radius: f32,
        food: &[FoodSnapshot],
    ) -> Option<Target> {
        self.in_view.clear();
        self.in_view.extend(food.iter().filter_map(|item| {
            let distance = position.distance(item.position);
            (distance < view_radius).then_some(Candidate {
                food: item.id,
                position: item.position,
                distance,
            })
        }));

        let mut candidates = self.in_view.iter().copied();
        let first = candidates.next()?;
        let nearest = candidates.fold(first, |best, candidate| {
            if candidate.distance < best.distance {
                candidate
            } else {
                best
            }
        });

        Some(Target {
            food: nearest.food,
            position: nearest.position,
            distance: nearest.distance,
            bearing: position.bearing_to(nearest.position),
            within_reach: nearest.distance <= self.eat_radius,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    food: FoodId,
    position: Position,
    distance: f32,
}
