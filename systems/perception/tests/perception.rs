use std::f32::consts::FRAC_PI_2;

use forage_core::{FoodId, FoodSnapshot, Position};
use forage_system_perception::Perception;

fn food(id: u32, x: f32, z: f32) -> FoodSnapshot {
    FoodSnapshot {
        id: FoodId::new(id),
        position: Position::new(x, z),
    }
}

#[test]
fn targets_food_inside_view_radius() {
    let mut perception = Perception::new(0.5);
    let items = [food(7, 0.3, 0.0)];

    let target = perception
        .handle(Position::new(0.0, 0.0), 1.0, &items)
        .expect("food should be in view");

    assert_eq!(target.food, FoodId::new(7));
    assert_eq!(target.bearing, 0.0);
    assert!(target.within_reach);
}

#[test]
fn food_on_view_boundary_is_not_seen() {
    let mut perception = Perception::new(0.5);
    let items = [food(0, 1.0, 0.0)];

    assert!(perception
        .handle(Position::new(0.0, 0.0), 1.0, &items)
        .is_none());
}

#[test]
fn nearest_item_wins() {
    let mut perception = Perception::new(0.5);
    let items = [food(0, 2.0, 0.0), food(1, 0.0, 1.5), food(2, -2.5, 0.0)];

    let target = perception
        .handle(Position::new(0.0, 0.0), 3.0, &items)
        .expect("food should be in view");

    assert_eq!(target.food, FoodId::new(1));
    assert!((target.bearing - FRAC_PI_2).abs() < 1e-6);
    assert!(!target.within_reach);
}

#[test]
fn ties_keep_earlier_item() {
    let mut perception = Perception::new(0.5);
    let items = [food(4, 1.0, 0.0), food(2, -1.0, 0.0), food(9, 0.0, 1.0)];

    let target = perception
        .handle(Position::new(0.0, 0.0), 2.0, &items)
        .expect("food should be in view");

    assert_eq!(target.food, FoodId::new(4));
}

#[test]
fn reach_is_inclusive() {
    let mut perception = Perception::new(0.5);
    let items = [food(0, 0.0, 0.5)];

    let target = perception
        .handle(Position::new(0.0, 0.0), 1.0, &items)
        .expect("food should be in view");

    assert!(target.within_reach);
}

#[test]
fn empty_registry_yields_no_target() {
    let mut perception = Perception::default();
    assert!(perception
        .handle(Position::new(0.0, 0.0), 100.0, &[])
        .is_none());
}
