//! Final summary printed once a headless run finishes.

use std::fmt::Write as _;

use forage_core::{PopulationReport, RoundSummary, SimulationConfig};
use serde::Serialize;

/// Everything the runner reports about a finished simulation.
#[derive(Debug, Serialize)]
pub(crate) struct RunOutcome {
    pub(crate) config: SimulationConfig,
    pub(crate) seed: Option<u64>,
    pub(crate) ticks: u64,
    pub(crate) simulated_seconds: f64,
    pub(crate) rounds: u32,
    pub(crate) meals: u64,
    pub(crate) peak_population: u32,
    pub(crate) extinct_at: Option<u32>,
    pub(crate) population: PopulationReport,
    pub(crate) history: Vec<RoundSummary>,
}

impl RunOutcome {
    /// Renders the outcome as human readable lines.
    pub(crate) fn render_text(&self) -> String {
        let mut text = String::new();
        let report = &self.population;

        let _ = writeln!(
            text,
            "Rounds completed: {} ({} ticks, {:.1}s simulated)",
            self.rounds, self.ticks, self.simulated_seconds
        );
        for summary in &self.history {
            let _ = writeln!(
                text,
                "  round {}: {} -> {} ({} survived, {} offspring, {} perished)",
                summary.round,
                summary.population_before,
                summary.next_generation.population,
                summary.survivors,
                summary.offspring,
                summary.perished
            );
        }
        if let Some(round) = self.extinct_at {
            let _ = writeln!(text, "Population went extinct in round {round}");
        }
        let _ = writeln!(text, "Food eaten: {}", self.meals);
        let _ = writeln!(text, "Peak population: {}", self.peak_population);
        let _ = writeln!(text, "Food left: {}", report.food_remaining);
        let _ = writeln!(
            text,
            "Creatures surviving: {}/{}",
            report.surviving, report.population
        );
        let _ = writeln!(text, "Creatures reproducing: {}", report.reproducing);
        let _ = writeln!(text, "Average age: {:.2}", report.average_age);
        let _ = writeln!(text, "Average speed: {:.4}", report.average_speed);
        let _ = writeln!(text, "Average view radius: {:.3}", report.average_view_radius);
        let _ = writeln!(
            text,
            "Average required food: {:.2}",
            report.average_required_reproduction_food
        );
        text
    }
}
