#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Forage engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Systems consume event streams and immutable snapshots; they never
//! hold on to creature or food state between ticks.

use std::{f32::consts::TAU, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the arena floor used when no configuration is supplied.
pub const DEFAULT_FLOOR_SIZE: f32 = 15.0;
/// Number of food items spawned at the start of every round by default.
pub const DEFAULT_FOOD_COUNT: u32 = 20;
/// Size of the first generation by default.
pub const DEFAULT_CREATURE_COUNT: u32 = 10;
/// Multiplier converting a creature's speed trait into world units per second.
pub const DEFAULT_MOVEMENT_SCALE: f32 = 80.0;
/// Distance at which a targeted food item is consumed.
pub const DEFAULT_EAT_RADIUS: f32 = 0.5;

/// Lower bound applied to the speed trait after mutation.
pub const MIN_SPEED: f32 = 0.001;
/// Lower bound applied to the view radius trait after mutation.
pub const MIN_VIEW_RADIUS: f32 = 0.01;

const SPAWN_SPEED_BASE: f32 = 0.01;
const SPAWN_SPEED_SPAN: f32 = 0.1;
const SPAWN_VIEW_RADIUS_BASE: f32 = 1.0;
const SPAWN_VIEW_RADIUS_SPAN: f32 = 2.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Discards the current population and food, then reseeds the first round.
    Reset,
    /// Replaces both registries with explicitly placed creatures and food.
    ///
    /// Creatures are described by parallel arrays of equal length. The request
    /// is rejected as a whole, leaving the world untouched, when the lengths
    /// differ, a trait is not a positive finite number, or any position lies
    /// outside the arena. The round counter is left untouched.
    Populate {
        /// Facing of each creature, in registry order.
        facings: Vec<f32>,
        /// Location of each creature, in registry order.
        positions: Vec<Position>,
        /// Traits and age of each creature, in registry order.
        infos: Vec<CreatureInfo>,
        /// Locations of the food items to place, in registry order.
        food: Vec<Position>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the food registry was replaced by a fresh batch.
    FoodSpawned {
        /// Number of food items now present in the arena.
        count: u32,
    },
    /// Confirms that the creature registry was replaced by a fresh population.
    CreaturesSpawned {
        /// Number of creatures now present in the arena.
        count: u32,
    },
    /// Reports that a creature consumed a food item.
    FoodEaten {
        /// Creature that ate.
        creature: CreatureId,
        /// Food item that was removed from the arena.
        food: FoodId,
        /// Total number of items the creature has eaten this round.
        eaten_food: u32,
    },
    /// Reports the outcome of a generational turnover.
    RoundEnded {
        /// Zero-based index of the round that just finished.
        round: u32,
        /// Creatures carried over into the next round.
        survivors: u32,
        /// Offspring appended to the next round.
        offspring: u32,
        /// Creatures discarded because they did not eat.
        perished: u32,
    },
    /// Announces that a turnover left the arena without creatures.
    PopulationExtinct {
        /// Round whose turnover emptied the population.
        round: u32,
    },
    /// Reports that a placement request was rejected without changing state.
    PopulationRejected {
        /// Specific reason the placement failed.
        reason: SpawnError,
    },
}

/// Source of uniform random numbers consumed by the simulation.
pub trait RandomSource {
    /// Returns the next uniformly distributed value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f32 {
        (**self).next_unit()
    }
}

/// Location on the arena floor expressed in world units.
///
/// The vertical axis is purely cosmetic and therefore not modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    z: f32,
}

impl Position {
    /// Creates a new position from its horizontal components.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Coordinate along the x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Coordinate along the z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Euclidean distance between two positions on the floor plane.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (other.x - self.x).hypot(other.z - self.z)
    }

    /// Angle in radians pointing from this position toward `other`.
    #[must_use]
    pub fn bearing_to(self, other: Position) -> f32 {
        (other.z - self.z).atan2(other.x - self.x)
    }

    /// Returns the position displaced by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }
}

/// Square floor centred on the origin that bounds every position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    floor_size: f32,
}

impl Arena {
    /// Creates an arena with the provided side length.
    ///
    /// Callers are expected to validate the side length through
    /// [`SimulationConfig::validate`] first.
    #[must_use]
    pub const fn new(floor_size: f32) -> Self {
        Self { floor_size }
    }

    /// Side length of the floor in world units.
    #[must_use]
    pub const fn floor_size(&self) -> f32 {
        self.floor_size
    }

    /// Distance from the origin to each wall.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.floor_size / 2.0
    }

    /// Reports whether a single coordinate lies between the walls.
    #[must_use]
    pub fn spans(&self, coordinate: f32) -> bool {
        let half = self.half_extent();
        (-half..=half).contains(&coordinate)
    }

    /// Reports whether the position lies on the floor.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.spans(position.x()) && self.spans(position.z())
    }

    /// Draws a uniformly distributed position on the floor, x first.
    pub fn random_position(&self, rng: &mut dyn RandomSource) -> Position {
        let x = (rng.next_unit() - 0.5) * self.floor_size;
        let z = (rng.next_unit() - 0.5) * self.floor_size;
        Position::new(x, z)
    }
}

/// Draws a uniformly distributed facing in `[0, 2π)`.
pub fn random_facing(rng: &mut dyn RandomSource) -> f32 {
    rng.next_unit() * TAU
}

/// Heritable numeric attributes of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    speed: f32,
    view_radius: f32,
}

impl Traits {
    /// Creates a trait bundle from explicit values.
    #[must_use]
    pub const fn new(speed: f32, view_radius: f32) -> Self {
        Self { speed, view_radius }
    }

    /// Draws the traits of a first-generation creature, speed first.
    ///
    /// Speed lands in `[0.01, 0.11)` and view radius in `[1, 3)`.
    pub fn sample(rng: &mut dyn RandomSource) -> Self {
        let speed = rng.next_unit() * SPAWN_SPEED_SPAN + SPAWN_SPEED_BASE;
        let view_radius = rng.next_unit() * SPAWN_VIEW_RADIUS_SPAN + SPAWN_VIEW_RADIUS_BASE;
        Self { speed, view_radius }
    }

    /// Speed in world units per second before the movement scale is applied.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Radius within which the creature senses food.
    #[must_use]
    pub const fn view_radius(&self) -> f32 {
        self.view_radius
    }

    /// Reports whether both traits are positive finite numbers.
    #[must_use]
    pub fn is_viable(&self) -> bool {
        is_positive(self.speed) && is_positive(self.view_radius)
    }

    /// Number of meals within one round that earns an offspring.
    ///
    /// Computed as `floor(10 * speed + 2 * view_radius)`.
    #[must_use]
    pub fn required_reproduction_food(&self) -> u32 {
        (10.0 * self.speed + 2.0 * self.view_radius).floor().max(0.0) as u32
    }
}

/// Round-scoped bookkeeping that is cleared whenever a creature (re)spawns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStatus {
    /// Whether the creature currently has a food item locked as its target.
    pub is_targeting_food: bool,
    /// Whether the creature ate at least once this round.
    pub will_survive: bool,
    /// Whether the creature ate enough this round to reproduce.
    pub will_reproduce: bool,
    /// Number of food items consumed this round.
    pub eaten_food: u32,
}

/// Unique identifier assigned to a creature.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CreatureId(u32);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a food item.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FoodId(u32);

impl FoodId {
    /// Creates a new food identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single creature used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureSnapshot {
    /// Unique identifier assigned to the creature.
    pub id: CreatureId,
    /// Creature whose reproduction produced this one, if any.
    pub parent: Option<CreatureId>,
    /// Location on the arena floor.
    pub position: Position,
    /// Direction of travel in radians.
    pub facing: f32,
    /// Heritable attributes.
    pub traits: Traits,
    /// Meals required within one round to reproduce.
    pub required_reproduction_food: u32,
    /// Number of turnovers the creature has survived.
    pub age: u32,
    /// Round-scoped bookkeeping.
    pub status: RoundStatus,
}

/// Read-only snapshot describing all creatures in registry order.
#[derive(Clone, Debug, Default)]
pub struct CreatureView {
    snapshots: Vec<CreatureSnapshot>,
}

impl CreatureView {
    /// Creates a new creature view, preserving the order of `snapshots`.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<CreatureSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &CreatureSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot at the provided registry index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CreatureSnapshot> {
        self.snapshots.get(index)
    }

    /// Number of creatures captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no creatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreatureSnapshot> {
        self.snapshots
    }
}

/// A stationary food item waiting to be eaten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodSnapshot {
    /// Identity used when the item is removed.
    pub id: FoodId,
    /// Location on the arena floor.
    pub position: Position,
}

/// Read-only snapshot describing all food items in registry order.
#[derive(Clone, Debug, Default)]
pub struct FoodView {
    snapshots: Vec<FoodSnapshot>,
}

impl FoodView {
    /// Creates a new food view, preserving the order of `snapshots`.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<FoodSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured food items in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &FoodSnapshot> {
        self.snapshots.iter()
    }

    /// Captured food items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FoodSnapshot] {
        &self.snapshots
    }

    /// Number of food items captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no food.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Heritable attributes and age of a creature placed through an inheritance
/// batch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureInfo {
    /// Heritable attributes.
    pub traits: Traits,
    /// Rounds already survived.
    pub age: u32,
}

/// Everything the creature registry needs to place a creature carried into a
/// new round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreatureSeed {
    /// Identifier to keep; `None` allocates a fresh one.
    pub id: Option<CreatureId>,
    /// Parent recorded for lineage.
    pub parent: Option<CreatureId>,
    /// Starting location.
    pub position: Position,
    /// Starting facing in radians.
    pub facing: f32,
    /// Heritable attributes.
    pub traits: Traits,
    /// Rounds already survived.
    pub age: u32,
}

/// Aggregate statistics describing the current population.
///
/// Averages of an empty population are reported as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PopulationReport {
    /// Food items still present in the arena.
    pub food_remaining: u32,
    /// Number of live creatures.
    pub population: u32,
    /// Creatures that already ate this round.
    pub surviving: u32,
    /// Creatures that already ate enough to reproduce this round.
    pub reproducing: u32,
    /// Mean number of rounds survived.
    pub average_age: f32,
    /// Mean speed trait.
    pub average_speed: f32,
    /// Mean view radius trait.
    pub average_view_radius: f32,
    /// Mean number of meals required to reproduce.
    pub average_required_reproduction_food: f32,
}

impl PopulationReport {
    /// Aggregates the provided creatures alongside the remaining food count.
    #[must_use]
    pub fn from_view(creatures: &CreatureView, food_remaining: u32) -> Self {
        let mut report = Self {
            food_remaining,
            ..Self::default()
        };
        if creatures.is_empty() {
            return report;
        }

        let mut total_age = 0.0;
        let mut total_speed = 0.0;
        let mut total_view_radius = 0.0;
        let mut total_required = 0.0;
        for creature in creatures.iter() {
            report.population += 1;
            report.surviving += u32::from(creature.status.will_survive);
            report.reproducing += u32::from(creature.status.will_reproduce);
            total_age += creature.age as f32;
            total_speed += creature.traits.speed();
            total_view_radius += creature.traits.view_radius();
            total_required += creature.required_reproduction_food as f32;
        }

        let count = report.population as f32;
        report.average_age = total_age / count;
        report.average_speed = total_speed / count;
        report.average_view_radius = total_view_radius / count;
        report.average_required_reproduction_food = total_required / count;
        report
    }
}

/// Record of a single generational turnover.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    /// Zero-based index of the round that ended.
    pub round: u32,
    /// Population alive when the round ended.
    pub population_before: u32,
    /// Survivors carried into the next round.
    pub survivors: u32,
    /// Offspring appended to the next round.
    pub offspring: u32,
    /// Creatures that starved.
    pub perished: u32,
    /// Statistics of the generation that starts the next round.
    pub next_generation: PopulationReport,
}

/// Tunable parameters of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Side length of the square arena.
    pub floor_size: f32,
    /// Food items spawned at the start of every round.
    pub initial_food_count: u32,
    /// Size of the very first generation.
    pub initial_creature_count: u32,
    /// Multiplier converting speed traits into world units per second.
    pub movement_scale: f32,
    /// Distance at which targeted food is eaten.
    pub eat_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            floor_size: DEFAULT_FLOOR_SIZE,
            initial_food_count: DEFAULT_FOOD_COUNT,
            initial_creature_count: DEFAULT_CREATURE_COUNT,
            movement_scale: DEFAULT_MOVEMENT_SCALE,
            eat_radius: DEFAULT_EAT_RADIUS,
        }
    }
}

impl SimulationConfig {
    /// Rejects configurations that would break the simulation invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.floor_size) {
            return Err(ConfigError::FloorSize(self.floor_size));
        }
        if !is_positive(self.movement_scale) {
            return Err(ConfigError::MovementScale(self.movement_scale));
        }
        if !is_positive(self.eat_radius) {
            return Err(ConfigError::EatRadius(self.eat_radius));
        }
        Ok(())
    }

    /// Arena described by the configured floor size.
    #[must_use]
    pub const fn arena(&self) -> Arena {
        Arena::new(self.floor_size)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Reasons a [`SimulationConfig`] may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The arena side length must be a positive finite number.
    #[error("floor size must be positive and finite, got {0}")]
    FloorSize(f32),
    /// The movement scale must be a positive finite number.
    #[error("movement scale must be positive and finite, got {0}")]
    MovementScale(f32),
    /// The eat radius must be a positive finite number.
    #[error("eat radius must be positive and finite, got {0}")]
    EatRadius(f32),
}

/// Reasons a creature spawn request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// Inheritance batches must supply one facing, position and info per creature.
    #[error(
        "inheritance batch lengths differ: {facings} facings, {positions} positions, {infos} infos"
    )]
    MismatchedBatch {
        /// Number of facings supplied.
        facings: usize,
        /// Number of positions supplied.
        positions: usize,
        /// Number of trait bundles supplied.
        infos: usize,
    },
    /// Speed and view radius must both be positive finite numbers.
    #[error("creature {index} has non-positive or non-finite traits")]
    InvalidTraits {
        /// Position of the offending entry in the batch.
        index: usize,
    },
    /// Every creature must start on the arena floor.
    #[error("creature {index} lies outside the arena")]
    CreatureOutOfArena {
        /// Position of the offending entry in the batch.
        index: usize,
    },
    /// Every food item must lie on the arena floor.
    #[error("food item {index} lies outside the arena")]
    FoodOutOfArena {
        /// Position of the offending entry in the batch.
        index: usize,
    },
}
