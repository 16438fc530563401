//! Shared configuration loading for CLI commands

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};

use crate::{adapters::CorridorConfig, app::EngineConfig, types::SensorState};

/// Load an engine configuration, falling back to defaults when no file is given
pub fn load_engine_config(path: Option<&Path>, seed: Option<u64>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to read engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Load corridor geometry, falling back to defaults when no file is given
pub fn load_corridor_config(path: Option<&Path>) -> Result<CorridorConfig> {
    let Some(path) = path else {
        return Ok(CorridorConfig::default());
    };
    let file = File::open(path)
        .with_context(|| format!("failed to open corridor config {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse corridor config {}", path.display()))
}

/// Parse a `front,right,left` sensor reading
pub fn parse_sensor_state(raw: &str) -> Result<SensorState> {
    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid sensor value '{}'", part.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    match values.as_slice() {
        [front, right, left] => Ok(SensorState::new(*front, *right, *left)),
        _ => Err(anyhow!(
            "expected three comma-separated values (front,right,left), got {}",
            values.len()
        )),
    }
}
