#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Forage.
//!
//! The [`World`] exclusively owns the food and creature registries. Every
//! mutation flows through [`apply`]; adapters read state between ticks via the
//! [`query`] module.

mod creatures;
mod food;
mod random;

use std::{fmt, time::Duration};

use forage_core::{
    Arena, Command, ConfigError, CreatureInfo, CreatureSeed, Event, FoodId, Position,
    RandomSource, SimulationConfig, SpawnError,
};
use forage_system_movement::{Movement, Walker};
use forage_system_perception::Perception;
use forage_system_turnover::Turnover;

pub use creatures::{Creature, CreatureRegistry};
pub use food::FoodRegistry;
pub use random::RngSource;

/// Represents the authoritative Forage world state.
pub struct World {
    config: SimulationConfig,
    arena: Arena,
    food: FoodRegistry,
    creatures: CreatureRegistry,
    movement: Movement,
    perception: Perception,
    turnover: Turnover,
    seeds: Vec<CreatureSeed>,
    rng: Box<dyn RandomSource>,
    round: u32,
    tick_index: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("food", &self.food.count())
            .field("creatures", &self.creatures.len())
            .field("round", &self.round)
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates a world seeded with the first round, drawing from the thread
    /// generator.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_random_source(config, Box::new(RngSource::thread()))
    }

    /// Creates a world seeded with the first round, drawing from `rng`.
    pub fn with_random_source(
        config: SimulationConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let arena = config.arena();
        let mut world = Self {
            movement: Movement::new(config.movement_scale),
            perception: Perception::new(config.eat_radius),
            turnover: Turnover::new(arena),
            arena,
            config,
            food: FoodRegistry::new(),
            creatures: CreatureRegistry::new(),
            seeds: Vec::new(),
            rng,
            round: 0,
            tick_index: 0,
        };
        world.seed_first_round();
        Ok(world)
    }

    fn seed_first_round(&mut self) {
        self.round = 0;
        self.creatures.reset();
        self.creatures.spawn_batch(
            self.config.initial_creature_count,
            &self.arena,
            self.rng.as_mut(),
        );
        self.food
            .spawn_batch(self.config.initial_food_count, &self.arena, self.rng.as_mut());
    }

    fn announce_registries(&self, out_events: &mut Vec<Event>) {
        out_events.push(Event::CreaturesSpawned {
            count: count_u32(self.creatures.len()),
        });
        out_events.push(Event::FoodSpawned {
            count: self.food.count(),
        });
    }

    /// Runs movement, perception and feeding once for every creature, in
    /// index order.
    fn forage(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for index in 0..self.creatures.len() {
            let Some(creature) = self.creatures.get_mut(index) else {
                continue;
            };

            let walker = Walker {
                position: creature.position(),
                facing: creature.facing(),
                speed: creature.traits().speed(),
                is_targeting_food: creature.status().is_targeting_food,
            };
            let stride = self
                .movement
                .handle(walker, &self.arena, dt, self.rng.as_mut());
            creature.set_motion(stride.position, stride.facing);

            let sighting = self.perception.handle(
                creature.position(),
                creature.traits().view_radius(),
                self.food.as_slice(),
            );
            let Some(target) = sighting else {
                creature.lose_target();
                continue;
            };

            creature.lock_target(target.bearing);
            if target.within_reach {
                feed(creature, &mut self.food, target.food, out_events);
            }
        }
    }

    /// Reports whether a turnover could change anything: either a creature is
    /// alive or the round restocks food.
    fn has_round_to_end(&self) -> bool {
        !self.creatures.is_empty() || self.config.initial_food_count > 0
    }

    /// Places explicit creatures and food after checking the whole request.
    fn populate(
        &mut self,
        facings: &[f32],
        positions: &[Position],
        infos: &[CreatureInfo],
        food: &[Position],
    ) -> Result<(), SpawnError> {
        if let Some(index) = food.iter().position(|item| !self.arena.contains(*item)) {
            return Err(SpawnError::FoodOutOfArena { index });
        }
        self.creatures
            .spawn_inherited(&self.arena, facings, positions, infos)?;
        self.food.spawn_at(food);
        Ok(())
    }

    /// Replaces the population with the next generation and respawns food.
    fn end_round(&mut self, out_events: &mut Vec<Event>) {
        let summary = self.turnover.handle(
            self.creatures.iter().map(Creature::snapshot),
            self.rng.as_mut(),
            &mut self.seeds,
        );
        self.creatures.spawn_seeds(self.seeds.drain(..));
        self.food
            .spawn_batch(self.config.initial_food_count, &self.arena, self.rng.as_mut());

        let round = self.round;
        self.round = self.round.saturating_add(1);

        out_events.push(Event::RoundEnded {
            round,
            survivors: summary.survivors,
            offspring: summary.offspring,
            perished: summary.perished,
        });
        self.announce_registries(out_events);

        if summary.population_before == 0 {
            tracing::debug!(round, "round ended without creatures");
            return;
        }

        tracing::info!(
            round,
            survivors = summary.survivors,
            offspring = summary.offspring,
            perished = summary.perished,
            population = summary.next_population(),
            "round ended"
        );
        if summary.next_population() == 0 {
            tracing::warn!(round, "population went extinct");
            out_events.push(Event::PopulationExtinct { round });
        }
    }
}

/// Consumes `item` on behalf of `creature`.
///
/// The item must still be present in the registry.
fn feed(
    creature: &mut Creature,
    food: &mut FoodRegistry,
    item: FoodId,
    out_events: &mut Vec<Event>,
) {
    let removed = food.remove(item);
    debug_assert!(removed.is_some(), "fed on food {item:?} that is not live");

    let eaten_food = creature.record_meal();
    tracing::debug!(
        creature = creature.id().get(),
        food = item.get(),
        eaten_food,
        "food eaten"
    );
    out_events.push(Event::FoodEaten {
        creature: creature.id(),
        food: item,
        eaten_food,
    });
}

/// Converts a collection length into an event count, saturating at `u32::MAX`.
pub(crate) fn count_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Applies the provided command to the world.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            if !world.food.is_empty() {
                world.forage(dt, out_events);
            } else if world.has_round_to_end() {
                world.end_round(out_events);
            }
        }
        Command::Reset => {
            world.seed_first_round();
            tracing::info!(
                creatures = world.creatures.len(),
                food = world.food.count(),
                "world reset"
            );
            world.announce_registries(out_events);
        }
        Command::Populate {
            facings,
            positions,
            infos,
            food,
        } => match world.populate(&facings, &positions, &infos, &food) {
            Ok(()) => world.announce_registries(out_events),
            Err(reason) => {
                tracing::warn!(%reason, "placement rejected");
                out_events.push(Event::PopulationRejected { reason });
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{count_u32, Creature, World};
    use forage_core::{Arena, CreatureView, FoodView, PopulationReport, SimulationConfig};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Arena bounding every position.
    #[must_use]
    pub fn arena(world: &World) -> Arena {
        world.arena
    }

    /// Number of completed rounds since the last reset.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of live creatures.
    #[must_use]
    pub fn creature_count(world: &World) -> u32 {
        count_u32(world.creatures.len())
    }

    /// Number of food items left in the current round.
    #[must_use]
    pub fn food_count(world: &World) -> u32 {
        world.food.count()
    }

    /// Captures a read-only view of the creatures in registry order.
    #[must_use]
    pub fn creature_view(world: &World) -> CreatureView {
        CreatureView::from_snapshots(world.creatures.iter().map(Creature::snapshot).collect())
    }

    /// Captures a read-only view of the food in registry order.
    #[must_use]
    pub fn food_view(world: &World) -> FoodView {
        FoodView::from_snapshots(world.food.as_slice().to_vec())
    }

    /// Aggregates the current population and remaining food.
    #[must_use]
    pub fn population_report(world: &World) -> PopulationReport {
        PopulationReport::from_view(&creature_view(world), world.food.count())
    }
}
