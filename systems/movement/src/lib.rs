#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that advances creatures and bounces them off walls.

use std::{
    f32::consts::{FRAC_PI_4, PI},
    time::Duration,
};

use forage_core::{Arena, Position, RandomSource, DEFAULT_MOVEMENT_SCALE};

/// Chance per tick that an idle creature changes direction.
pub const WANDER_PROBABILITY: f32 = 0.1;
/// Full width of the facing perturbation applied while wandering.
pub const WANDER_SPREAD: f32 = FRAC_PI_4;

/// Wall a creature bounced off during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bounce {
    /// One of the walls perpendicular to the x axis.
    XWall,
    /// One of the walls perpendicular to the z axis.
    ZWall,
}

/// State of a creature about to take a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walker {
    /// Location before the step.
    pub position: Position,
    /// Direction of travel in radians.
    pub facing: f32,
    /// Speed trait in world units per second before the movement scale.
    pub speed: f32,
    /// Whether the creature is chasing food, which suppresses wandering.
    pub is_targeting_food: bool,
}

/// Location and facing of a creature after a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stride {
    /// Position after both displacements were applied.
    pub position: Position,
    /// Facing after reflection and wandering.
    pub facing: f32,
    /// Wall that reflected the step, if any.
    pub bounce: Option<Bounce>,
}

/// Movement system parameterised by the world's movement scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    movement_scale: f32,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(DEFAULT_MOVEMENT_SCALE)
    }
}

impl Movement {
    /// Creates a movement system converting speed traits with `movement_scale`.
    #[must_use]
    pub const fn new(movement_scale: f32) -> Self {
        Self { movement_scale }
    }

    /// Multiplier applied to speed traits.
    #[must_use]
    pub const fn movement_scale(&self) -> f32 {
        self.movement_scale
    }

    /// Advances a single creature by `dt`.
    ///
    /// The step is resolved by [`collide`] and then perturbed by [`wander`].
    /// Exactly one random draw is consumed when the creature does not wander,
    /// two when it does.
    pub fn handle(
        &self,
        walker: Walker,
        arena: &Arena,
        dt: Duration,
        rng: &mut dyn RandomSource,
    ) -> Stride {
        let distance = walker.speed * self.movement_scale * dt.as_secs_f32();
        let mut stride = collide(
            walker.position,
            walker.facing,
            distance,
            arena.half_extent(),
        );
        stride.facing = wander(stride.facing, walker.is_targeting_food, rng);
        stride
    }
}

/// Moves `distance` along `facing`, reflecting off at most one wall.
///
/// The x axis is tested first. When the x displacement would cross a wall it
/// is reversed, the facing becomes `π - facing`, and the z axis is left
/// unchecked for this step. Otherwise the z displacement is tested and, when
/// it would cross a wall, reversed with the facing negated. Both
/// displacements are then applied. A step that would cross both walls at a
/// corner therefore only corrects the x axis and may leave the creature
/// outside the z bounds until a later step brings it back.
#[must_use]
pub fn collide(position: Position, facing: f32, distance: f32, half_extent: f32) -> Stride {
    let mut dx = facing.cos() * distance;
    let mut dz = facing.sin() * distance;
    let mut facing = facing;
    let mut bounce = None;

    let outside = |coordinate: f32| coordinate < -half_extent || coordinate > half_extent;

    if outside(position.x() + dx) {
        dx = -dx;
        facing = PI - facing;
        bounce = Some(Bounce::XWall);
    } else if outside(position.z() + dz) {
        dz = -dz;
        facing = -facing;
        bounce = Some(Bounce::ZWall);
    }

    Stride {
        position: position.offset(dx, dz),
        facing,
        bounce,
    }
}

/// Randomly perturbs the facing of a creature that is not chasing food.
///
/// One draw decides whether to wander; the perturbation itself, uniform in
/// `(-π/8, π/8)`, costs a second draw. The first draw happens even for
/// targeting creatures.
pub fn wander(facing: f32, is_targeting_food: bool, rng: &mut dyn RandomSource) -> f32 {
    if rng.next_unit() < WANDER_PROBABILITY && !is_targeting_food {
        facing + WANDER_SPREAD * (rng.next_unit() - 0.5)
    } else {
        facing
    }
}
