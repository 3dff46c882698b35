use std::time::Duration;

use forage_core::{CreatureId, Event, FoodId, PopulationReport};
use forage_system_analytics::Analytics;

fn report(population: u32) -> PopulationReport {
    PopulationReport {
        food_remaining: 20,
        population,
        average_speed: 0.05,
        ..PopulationReport::default()
    }
}

fn tick() -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(16),
    }
}

#[test]
fn round_end_records_summary_with_next_generation() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();
    let mut snapshots = 0;

    analytics.handle(
        &[
            tick(),
            Event::RoundEnded {
                round: 0,
                survivors: 4,
                offspring: 2,
                perished: 6,
            },
            Event::CreaturesSpawned { count: 6 },
            Event::FoodSpawned { count: 20 },
        ],
        || {
            snapshots += 1;
            report(6)
        },
        &mut emitted,
    );

    assert_eq!(snapshots, 1);
    assert_eq!(emitted.len(), 1);
    let summary = emitted[0];
    assert_eq!(summary.round, 0);
    assert_eq!(summary.population_before, 10);
    assert_eq!(summary.survivors, 4);
    assert_eq!(summary.offspring, 2);
    assert_eq!(summary.perished, 6);
    assert_eq!(summary.next_generation, report(6));
    assert_eq!(analytics.latest(), Some(&summary));
}

#[test]
fn history_accumulates_across_rounds() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();

    for round in 0..3 {
        analytics.handle(
            &[
                tick(),
                Event::RoundEnded {
                    round,
                    survivors: 1,
                    offspring: 1,
                    perished: 0,
                },
            ],
            || report(2),
            &mut emitted,
        );
    }

    let rounds: Vec<_> = analytics
        .history()
        .iter()
        .map(|summary| summary.round)
        .collect();
    assert_eq!(rounds, vec![0, 1, 2]);
    assert_eq!(emitted.len(), 3);
    assert_eq!(analytics.ticks(), 3);
    assert_eq!(analytics.elapsed(), Duration::from_millis(48));
}

#[test]
fn meals_and_peak_population_are_tracked() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();

    analytics.handle(
        &[Event::CreaturesSpawned { count: 10 }],
        PopulationReport::default,
        &mut emitted,
    );
    analytics.handle(
        &[
            tick(),
            Event::FoodEaten {
                creature: CreatureId::new(0),
                food: FoodId::new(3),
                eaten_food: 1,
            },
            Event::FoodEaten {
                creature: CreatureId::new(4),
                food: FoodId::new(7),
                eaten_food: 1,
            },
        ],
        PopulationReport::default,
        &mut emitted,
    );
    analytics.handle(
        &[Event::CreaturesSpawned { count: 7 }],
        PopulationReport::default,
        &mut emitted,
    );

    assert_eq!(analytics.meals(), 2);
    assert_eq!(analytics.peak_population(), 10);
    assert!(emitted.is_empty());
}

#[test]
fn extinction_is_reported_once() {
    let mut analytics = Analytics::new();
    let mut emitted = Vec::new();

    analytics.handle(
        &[
            tick(),
            Event::RoundEnded {
                round: 5,
                survivors: 0,
                offspring: 0,
                perished: 3,
            },
            Event::PopulationExtinct { round: 5 },
        ],
        || report(0),
        &mut emitted,
    );

    assert_eq!(analytics.extinct_at(), Some(5));
    assert_eq!(emitted[0].population_before, 3);
    assert_eq!(emitted[0].next_generation.population, 0);
}
