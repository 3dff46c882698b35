#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes the next generation at the end of a round.
//!
//! Creatures that ate at least once survive and age by one round. Survivors
//! that ate enough to reproduce are followed by exactly one offspring placed
//! at a fresh random location with slightly mutated traits. Everyone else
//! starves and is left out of the next generation.

use forage_core::{
    random_facing, Arena, CreatureSeed, CreatureSnapshot, RandomSource, Traits, MIN_SPEED,
    MIN_VIEW_RADIUS,
};

/// Full width of the uniform speed mutation, centred on the parent's value.
pub const SPEED_MUTATION_SPAN: f32 = 0.01;
/// Full width of the uniform view radius mutation, centred on the parent's value.
pub const VIEW_RADIUS_MUTATION_SPAN: f32 = 0.5;

/// Counts describing a single turnover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnoverSummary {
    /// Creatures alive when the round ended.
    pub population_before: u32,
    /// Creatures carried over into the next round.
    pub survivors: u32,
    /// Offspring appended to the next round.
    pub offspring: u32,
    /// Creatures discarded because they never ate.
    pub perished: u32,
}

impl TurnoverSummary {
    /// Size of the next generation.
    #[must_use]
    pub const fn next_population(&self) -> u32 {
        self.survivors + self.offspring
    }
}

/// Turnover system placing offspring inside the configured arena.
#[derive(Clone, Copy, Debug)]
pub struct Turnover {
    arena: Arena,
}

impl Turnover {
    /// Creates a turnover system for the provided arena.
    #[must_use]
    pub const fn new(arena: Arena) -> Self {
        Self { arena }
    }

    /// Writes the seeds of the next generation into `out`, in order.
    ///
    /// `out` is cleared first. Each offspring directly follows its parent.
    /// Offspring draw, in order: x, z, facing, speed delta, view radius delta.
    pub fn handle<I>(
        &self,
        creatures: I,
        rng: &mut dyn RandomSource,
        out: &mut Vec<CreatureSeed>,
    ) -> TurnoverSummary
    where
        I: IntoIterator<Item = CreatureSnapshot>,
    {
        out.clear();
        let mut summary = TurnoverSummary::default();

        for creature in creatures {
            summary.population_before += 1;
            if !creature.status.will_survive {
                summary.perished += 1;
                continue;
            }

            summary.survivors += 1;
            out.push(CreatureSeed {
                id: Some(creature.id),
                parent: creature.parent,
                position: creature.position,
                facing: creature.facing,
                traits: creature.traits,
                age: creature.age + 1,
            });

            if creature.status.will_reproduce {
                summary.offspring += 1;
                let position = self.arena.random_position(rng);
                let facing = random_facing(rng);
                out.push(CreatureSeed {
                    id: None,
                    parent: Some(creature.id),
                    position,
                    facing,
                    traits: mutate(creature.traits, rng),
                    age: 0,
                });
            }
        }

        summary
    }
}

/// Derives an offspring's traits from its parent's.
///
/// Speed moves by up to ±0.005 and view radius by up to ±0.25. Results are
/// clamped to [`MIN_SPEED`] and [`MIN_VIEW_RADIUS`] so both stay positive.
pub fn mutate(parent: Traits, rng: &mut dyn RandomSource) -> Traits {
    let speed = parent.speed() + (rng.next_unit() - 0.5) * SPEED_MUTATION_SPAN;
    let view_radius = parent.view_radius() + (rng.next_unit() - 0.5) * VIEW_RADIUS_MUTATION_SPAN;
    Traits::new(speed.max(MIN_SPEED), view_radius.max(MIN_VIEW_RADIUS))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f32);

    impl RandomSource for Constant {
        fn next_unit(&mut self) -> f32 {
            self.0
        }
    }

    #[test]
    fn mutation_is_bounded_by_half_span() {
        let parent = Traits::new(0.05, 2.0);

        let low = mutate(parent, &mut Constant(0.0));
        assert!((low.speed() - 0.045).abs() < 1e-6);
        assert!((low.view_radius() - 1.75).abs() < 1e-6);

        let high = mutate(parent, &mut Constant(0.9));
        assert!((high.speed() - 0.054).abs() < 1e-6);
        assert!((high.view_radius() - 2.2).abs() < 1e-6);
    }

    #[test]
    fn mutation_never_drives_traits_non_positive() {
        let parent = Traits::new(0.002, 0.1);
        let child = mutate(parent, &mut Constant(0.0));
        assert_eq!(child.speed(), MIN_SPEED);
        assert_eq!(child.view_radius(), MIN_VIEW_RADIUS);
    }

    #[test]
    fn next_population_adds_survivors_and_offspring() {
        let summary = TurnoverSummary {
            population_before: 5,
            survivors: 3,
            offspring: 2,
            perished: 2,
        };
        assert_eq!(summary.next_population(), 5);
    }
}
