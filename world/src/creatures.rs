//! Registry owning the creatures that roam the arena.

use forage_core::{
    random_facing, Arena, CreatureId, CreatureInfo, CreatureSeed, CreatureSnapshot, Position,
    RandomSource, RoundStatus, SpawnError, Traits,
};

/// A single creature record.
///
/// Persistent attributes live alongside a [`RoundStatus`] that is reset
/// whenever the creature is (re)spawned.
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    id: CreatureId,
    parent: Option<CreatureId>,
    position: Position,
    facing: f32,
    traits: Traits,
    required_reproduction_food: u32,
    age: u32,
    status: RoundStatus,
}

impl Creature {
    fn spawn(id: CreatureId, seed: &CreatureSeed) -> Self {
        Self {
            id,
            parent: seed.parent,
            position: seed.position,
            facing: seed.facing,
            traits: seed.traits,
            required_reproduction_food: seed.traits.required_reproduction_food(),
            age: seed.age,
            status: RoundStatus::default(),
        }
    }

    /// Identifier of the creature.
    #[must_use]
    pub const fn id(&self) -> CreatureId {
        self.id
    }

    /// Location on the arena floor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction of travel in radians.
    #[must_use]
    pub const fn facing(&self) -> f32 {
        self.facing
    }

    /// Heritable attributes.
    #[must_use]
    pub const fn traits(&self) -> Traits {
        self.traits
    }

    /// Meals required within one round to reproduce, fixed at spawn.
    #[must_use]
    pub const fn required_reproduction_food(&self) -> u32 {
        self.required_reproduction_food
    }

    /// Rounds survived.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Round-scoped bookkeeping.
    #[must_use]
    pub const fn status(&self) -> RoundStatus {
        self.status
    }

    /// Stores the outcome of a movement step.
    pub fn set_motion(&mut self, position: Position, facing: f32) {
        self.position = position;
        self.facing = facing;
    }

    /// Turns toward a target and marks the creature as chasing it.
    pub fn lock_target(&mut self, bearing: f32) {
        self.facing = bearing;
        self.status.is_targeting_food = true;
    }

    /// Marks the creature as no longer chasing anything.
    pub fn lose_target(&mut self) {
        self.status.is_targeting_food = false;
    }

    /// Records a meal and returns the number eaten this round.
    ///
    /// Eating once guarantees survival; eating the required amount earns an
    /// offspring at the next turnover.
    pub fn record_meal(&mut self) -> u32 {
        self.status.is_targeting_food = false;
        self.status.will_survive = true;
        self.status.eaten_food += 1;
        if self.status.eaten_food >= self.required_reproduction_food {
            self.status.will_reproduce = true;
        }
        self.status.eaten_food
    }

    /// Captures an immutable copy of the record.
    #[must_use]
    pub fn snapshot(&self) -> CreatureSnapshot {
        CreatureSnapshot {
            id: self.id,
            parent: self.parent,
            position: self.position,
            facing: self.facing,
            traits: self.traits,
            required_reproduction_food: self.required_reproduction_food,
            age: self.age,
            status: self.status,
        }
    }
}

/// Live creatures in stable index order.
#[derive(Clone, Debug, Default)]
pub struct CreatureRegistry {
    creatures: Vec<Creature>,
    next_id: u32,
}

impl CreatureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards every creature and restarts identifier allocation.
    pub fn reset(&mut self) {
        self.creatures.clear();
        self.next_id = 0;
    }

    /// Replaces the population with `count` first-generation creatures.
    ///
    /// Each creature draws, in order: x, z, facing, speed, view radius.
    pub fn spawn_batch(&mut self, count: u32, arena: &Arena, rng: &mut dyn RandomSource) {
        self.creatures.clear();
        for _ in 0..count {
            let position = arena.random_position(rng);
            let facing = random_facing(rng);
            let traits = Traits::sample(rng);
            self.push(&CreatureSeed {
                id: None,
                parent: None,
                position,
                facing,
                traits,
                age: 0,
            });
        }
    }

    /// Replaces the population with creatures built from parallel arrays.
    ///
    /// The whole batch is checked before anything changes: the arrays must
    /// have equal lengths, every trait bundle must be viable and every
    /// position must lie inside `arena`.
    pub fn spawn_inherited(
        &mut self,
        arena: &Arena,
        facings: &[f32],
        positions: &[Position],
        infos: &[CreatureInfo],
    ) -> Result<(), SpawnError> {
        if facings.len() != positions.len() || positions.len() != infos.len() {
            return Err(SpawnError::MismatchedBatch {
                facings: facings.len(),
                positions: positions.len(),
                infos: infos.len(),
            });
        }
        if let Some(index) = infos.iter().position(|info| !info.traits.is_viable()) {
            return Err(SpawnError::InvalidTraits { index });
        }
        if let Some(index) = positions
            .iter()
            .position(|position| !arena.contains(*position))
        {
            return Err(SpawnError::CreatureOutOfArena { index });
        }

        self.spawn_seeds(facings.iter().zip(positions).zip(infos).map(
            |((facing, position), info)| CreatureSeed {
                id: None,
                parent: None,
                position: *position,
                facing: *facing,
                traits: info.traits,
                age: info.age,
            },
        ));
        Ok(())
    }

    /// Replaces the population with the provided seeds, in order.
    ///
    /// Seeds without an identifier receive a freshly allocated one.
    pub fn spawn_seeds<I>(&mut self, seeds: I)
    where
        I: IntoIterator<Item = CreatureSeed>,
    {
        self.creatures.clear();
        for seed in seeds {
            self.push(&seed);
        }
    }

    /// Creature stored at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    /// Mutable access to the creature stored at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Creature> {
        self.creatures.get_mut(index)
    }

    /// Number of live creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// Reports whether the population is extinct.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Iterator over the creatures in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    fn push(&mut self, seed: &CreatureSeed) {
        let id = match seed.id {
            Some(id) => id,
            None => self.allocate_id(),
        };
        self.creatures.push(Creature::spawn(id, seed));
    }

    fn allocate_id(&mut self) -> CreatureId {
        let id = CreatureId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Half;

    impl RandomSource for Half {
        fn next_unit(&mut self) -> f32 {
            0.5
        }
    }

    fn info(speed: f32, view_radius: f32, age: u32) -> CreatureInfo {
        CreatureInfo {
            traits: Traits::new(speed, view_radius),
            age,
        }
    }

    #[test]
    fn default_spawn_clears_round_status() {
        let mut registry = CreatureRegistry::new();
        registry.spawn_batch(3, &Arena::new(15.0), &mut Half);

        assert_eq!(registry.len(), 3);
        for creature in registry.iter() {
            assert_eq!(creature.status(), RoundStatus::default());
            assert_eq!(creature.age(), 0);
            assert_eq!(creature.position(), Position::new(0.0, 0.0));
            assert!((creature.traits().speed() - 0.06).abs() < 1e-6);
            assert_eq!(creature.required_reproduction_food(), 4);
        }
    }

    #[test]
    fn inherited_spawn_takes_arrays_verbatim() {
        let mut registry = CreatureRegistry::new();
        registry
            .spawn_inherited(
                &Arena::new(15.0),
                &[0.5, 1.5],
                &[Position::new(1.0, 2.0), Position::new(-3.0, 4.0)],
                &[info(0.05, 1.2, 3), info(0.1, 2.0, 0)],
            )
            .expect("lengths match");

        let second = registry.get(1).expect("two creatures");
        assert_eq!(second.facing(), 1.5);
        assert_eq!(second.position(), Position::new(-3.0, 4.0));
        assert_eq!(second.required_reproduction_food(), 5);
        assert_eq!(registry.get(0).map(Creature::age), Some(3));
    }

    #[test]
    fn mismatched_inheritance_is_rejected_without_mutation() {
        let mut registry = CreatureRegistry::new();
        registry.spawn_batch(2, &Arena::new(15.0), &mut Half);

        let result =
            registry.spawn_inherited(&Arena::new(15.0), &[0.0], &[], &[info(0.05, 1.0, 0)]);
        assert_eq!(
            result,
            Err(SpawnError::MismatchedBatch {
                facings: 1,
                positions: 0,
                infos: 1,
            })
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn non_viable_traits_are_rejected_without_mutation() {
        let mut registry = CreatureRegistry::new();
        registry.spawn_batch(2, &Arena::new(15.0), &mut Half);

        let result = registry.spawn_inherited(
            &Arena::new(15.0),
            &[0.0, 0.0],
            &[Position::new(0.0, 0.0), Position::new(1.0, 1.0)],
            &[info(0.05, 1.0, 0), info(-0.05, -1.0, 0)],
        );

        assert_eq!(result, Err(SpawnError::InvalidTraits { index: 1 }));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn positions_outside_the_arena_are_rejected() {
        let mut registry = CreatureRegistry::new();

        let result = registry.spawn_inherited(
            &Arena::new(15.0),
            &[0.0],
            &[Position::new(50.0, 0.0)],
            &[info(0.05, 1.0, 0)],
        );

        assert_eq!(result, Err(SpawnError::CreatureOutOfArena { index: 0 }));
        assert!(registry.is_empty());
    }

    #[test]
    fn meals_trigger_reproduction_at_threshold() {
        let mut registry = CreatureRegistry::new();
        registry
            .spawn_inherited(
                &Arena::new(15.0),
                &[0.0],
                &[Position::new(0.0, 0.0)],
                &[info(0.05, 0.8, 0)],
            )
            .expect("lengths match");
        let creature = registry.get_mut(0).expect("one creature");
        assert_eq!(creature.required_reproduction_food(), 2);

        creature.lock_target(1.0);
        assert_eq!(creature.record_meal(), 1);
        let status = creature.status();
        assert!(status.will_survive);
        assert!(!status.will_reproduce);
        assert!(!status.is_targeting_food);

        assert_eq!(creature.record_meal(), 2);
        assert!(creature.status().will_reproduce);
    }

    #[test]
    fn seeds_keep_identity_and_new_seeds_get_fresh_ones() {
        let mut registry = CreatureRegistry::new();
        registry.spawn_batch(2, &Arena::new(15.0), &mut Half);
        let kept = registry.get(1).map(Creature::snapshot).expect("two creatures");

        registry.spawn_seeds(vec![
            CreatureSeed {
                id: Some(kept.id),
                parent: None,
                position: kept.position,
                facing: kept.facing,
                traits: kept.traits,
                age: kept.age + 1,
            },
            CreatureSeed {
                id: None,
                parent: Some(kept.id),
                position: Position::new(1.0, 1.0),
                facing: 0.0,
                traits: kept.traits,
                age: 0,
            },
        ]);

        assert_eq!(registry.get(0).map(Creature::id), Some(kept.id));
        let child = registry.get(1).expect("offspring present");
        assert_eq!(child.id(), CreatureId::new(2));
        assert_eq!(child.snapshot().parent, Some(kept.id));
    }
}
