/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Direction;
use crate::shared::UnitId;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevators: Vec<ElevatorUnitConfig>,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    #[serde(default)]
    pub scenario: Vec<ScenarioCall>,
}

#[derive(Deserialize, Clone)]
pub struct BuildingConfig {
    pub min_floor: i32,
    pub max_floor: i32,
    /// Simulated travel time per single-floor step, in milliseconds.
    /// Zero makes trips complete as fast as the threads can run.
    pub travel_time_ms: u64,
}

#[derive(Deserialize, Clone)]
pub struct ElevatorUnitConfig {
    pub id: UnitId,
    pub starting_floor: i32,
}

#[derive(Deserialize, Clone)]
pub struct PanelConfig {
    pub floor: i32,
}

#[derive(Deserialize, Clone)]
pub struct ScenarioCall {
    pub floor: i32,
    pub direction: Direction,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let building = &config.building;
    if building.min_floor >= building.max_floor {
        return Err(ConfigError::Invalid(format!(
            "building floor range {}..={} is empty",
            building.min_floor, building.max_floor
        )));
    }

    let mut seen_ids = Vec::new();
    for unit in &config.elevators {
        if seen_ids.contains(&unit.id) {
            return Err(ConfigError::Invalid(format!(
                "elevator id {} is declared twice",
                unit.id
            )));
        }
        seen_ids.push(unit.id);

        if unit.starting_floor < building.min_floor || unit.starting_floor > building.max_floor {
            return Err(ConfigError::Invalid(format!(
                "elevator {} starts at floor {} outside the building",
                unit.id, unit.starting_floor
            )));
        }
    }

    for panel in &config.panels {
        if panel.floor < building.min_floor || panel.floor > building.max_floor {
            return Err(ConfigError::Invalid(format!(
                "panel declared at floor {} outside the building",
                panel.floor
            )));
        }
    }

    Ok(())
}
