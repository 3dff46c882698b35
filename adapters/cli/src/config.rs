//! Layered simulation configuration: defaults, then a TOML file, then flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use forage_core::SimulationConfig;

/// Parameters supplied on the command line, applied over the file values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) floor_size: Option<f32>,
    pub(crate) food: Option<u32>,
    pub(crate) creatures: Option<u32>,
    pub(crate) movement_scale: Option<f32>,
    pub(crate) eat_radius: Option<f32>,
}

impl Overrides {
    fn apply(self, config: &mut SimulationConfig) {
        if let Some(floor_size) = self.floor_size {
            config.floor_size = floor_size;
        }
        if let Some(food) = self.food {
            config.initial_food_count = food;
        }
        if let Some(creatures) = self.creatures {
            config.initial_creature_count = creatures;
        }
        if let Some(movement_scale) = self.movement_scale {
            config.movement_scale = movement_scale;
        }
        if let Some(eat_radius) = self.eat_radius {
            config.eat_radius = eat_radius;
        }
    }
}

/// Resolves the configuration for a run and validates the result.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => SimulationConfig::default(),
    };
    overrides.apply(&mut config);
    config
        .validate()
        .context("invalid simulation configuration")?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<SimulationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    parse(&contents)
        .with_context(|| format!("failed to load configuration file {}", path.display()))
}

fn parse(contents: &str) -> Result<SimulationConfig> {
    toml::from_str(contents).context("failed to parse simulation configuration toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = parse("initial_food_count = 5\n").expect("valid toml");

        assert_eq!(config.initial_food_count, 5);
        assert_eq!(
            config.initial_creature_count,
            SimulationConfig::default().initial_creature_count
        );
        assert_eq!(config.floor_size, SimulationConfig::default().floor_size);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = parse("initial_food = 5\n").expect_err("unknown key");
        assert!(format!("{error:#}").contains("initial_food"));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = parse("floor_size = 30.0\neat_radius = 1.0\n").expect("valid toml");
        Overrides {
            floor_size: Some(8.0),
            creatures: Some(3),
            ..Overrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.floor_size, 8.0);
        assert_eq!(config.eat_radius, 1.0);
        assert_eq!(config.initial_creature_count, 3);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let error = load(
            None,
            Overrides {
                movement_scale: Some(0.0),
                ..Overrides::default()
            },
        )
        .expect_err("zero movement scale");

        assert!(format!("{error:#}").contains("movement scale"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("definitely/not/here/forage.toml");
        let error = load(Some(path), Overrides::default()).expect_err("missing file");
        assert!(format!("{error:#}").contains("definitely/not/here/forage.toml"));
    }
}
