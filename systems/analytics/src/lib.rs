#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure analytics system that folds world events into per-round summaries.

use std::time::Duration;

use forage_core::{Event, PopulationReport, RoundSummary};

/// Accumulates run statistics from the events the world broadcasts.
#[derive(Debug, Default)]
pub struct Analytics {
    history: Vec<RoundSummary>,
    ticks: u64,
    elapsed: Duration,
    meals: u64,
    peak_population: u32,
    extinct_at: Option<u32>,
}

impl Analytics {
    /// Creates an analytics system with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the events of one world update.
    ///
    /// The `snapshot` closure is invoked at most once, and only when a round
    /// ended within `events`. It must describe the world after every event in
    /// the slice was applied. One [`RoundSummary`] per ended round is appended
    /// to `out` and to the internal history.
    pub fn handle<F>(&mut self, events: &[Event], snapshot: F, out: &mut Vec<RoundSummary>)
    where
        F: FnOnce() -> PopulationReport,
    {
        let mut snapshot = Some(snapshot);
        let mut next_generation = None;

        for event in events {
            match *event {
                Event::TimeAdvanced { dt } => {
                    self.ticks += 1;
                    self.elapsed += dt;
                }
                Event::FoodEaten { .. } => self.meals += 1,
                Event::CreaturesSpawned { count } => {
                    self.peak_population = self.peak_population.max(count);
                }
                Event::RoundEnded {
                    round,
                    survivors,
                    offspring,
                    perished,
                } => {
                    let report = *next_generation
                        .get_or_insert_with(|| snapshot.take().map(|f| f()).unwrap_or_default());
                    let summary = RoundSummary {
                        round,
                        population_before: survivors + perished,
                        survivors,
                        offspring,
                        perished,
                        next_generation: report,
                    };
                    self.history.push(summary);
                    out.push(summary);
                }
                Event::PopulationExtinct { round } => {
                    if self.extinct_at.is_none() {
                        self.extinct_at = Some(round);
                    }
                }
                Event::FoodSpawned { .. } | Event::PopulationRejected { .. } => {}
            }
        }
    }

    /// Summaries of every round observed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    /// Most recent round summary, if any round has ended.
    #[must_use]
    pub fn latest(&self) -> Option<&RoundSummary> {
        self.history.last()
    }

    /// Number of ticks observed.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time accumulated across all observed ticks.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Total number of food items eaten.
    #[must_use]
    pub const fn meals(&self) -> u64 {
        self.meals
    }

    /// Largest population announced by the world.
    #[must_use]
    pub const fn peak_population(&self) -> u32 {
        self.peak_population
    }

    /// Round whose turnover first emptied the arena, if that happened.
    #[must_use]
    pub const fn extinct_at(&self) -> Option<u32> {
        self.extinct_at
    }
}
