//! hz-project: canonical installation file format, validation, and
//! persistence of user-tunable settings.
//!
//! The control engine consumes plain descriptors at construction; this crate
//! owns the files those descriptors come from: the installation definition
//! (zones, discharge selection, flow limits), the replay scenario format, and
//! the settings store the embedder uses to survive restarts.

pub mod scenario;
pub mod schema;
pub mod settings;
pub mod validate;

pub use scenario::{EventDef, ScenarioDef, StepDef};
pub use schema::*;
pub use settings::{Settings, SettingsStore};
pub use validate::{ValidationError, validate_installation, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<InstallationDef> {
    let content = std::fs::read_to_string(path)?;
    let installation: InstallationDef = serde_yaml::from_str(&content)?;
    validate_installation(&installation)?;
    Ok(installation)
}

pub fn save_yaml(path: &std::path::Path, installation: &InstallationDef) -> ProjectResult<()> {
    validate_installation(installation)?;
    let content = serde_yaml::to_string(installation)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<InstallationDef> {
    let content = std::fs::read_to_string(path)?;
    let installation: InstallationDef = serde_json::from_str(&content)?;
    validate_installation(&installation)?;
    Ok(installation)
}

pub fn save_json(path: &std::path::Path, installation: &InstallationDef) -> ProjectResult<()> {
    validate_installation(installation)?;
    let content = serde_json::to_string_pretty(installation)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a replay scenario and check its references against an installation.
pub fn load_scenario_yaml(
    path: &std::path::Path,
    installation: &InstallationDef,
) -> ProjectResult<ScenarioDef> {
    let content = std::fs::read_to_string(path)?;
    let scenario: ScenarioDef = serde_yaml::from_str(&content)?;
    validate_scenario(&scenario, installation)?;
    Ok(scenario)
}
