use std::path::{Path, PathBuf};

use chrono::Duration;
use clap::{Parser, Subcommand};
use hz_control::{BoilerActuator, FlowLimits, MasterController, ZoneConfig, ZoneEvent};
use hz_core::ZoneId;
use hz_project::{EventDef, InstallationDef, Settings, SettingsStore};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "hz-cli")]
#[command(about = "Hydrozone CLI - Multi-zone hydronic heating control tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate installation file syntax and structure
    Validate {
        /// Path to the installation YAML file
        installation_path: PathBuf,
    },
    /// List zones in an installation
    Zones {
        /// Path to the installation YAML file
        installation_path: PathBuf,
    },
    /// Replay a timed event scenario and print the final controller snapshot
    Replay {
        /// Path to the installation YAML file
        installation_path: PathBuf,
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Settings file with persisted user adjustments (optional)
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Project error: {0}")]
    Project(#[from] hz_project::ProjectError),

    #[error("Control error: {0}")]
    Control(#[from] hz_control::ControlError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { installation_path } => cmd_validate(&installation_path),
        Commands::Zones { installation_path } => cmd_zones(&installation_path),
        Commands::Replay {
            installation_path,
            scenario_path,
            settings,
        } => cmd_replay(&installation_path, &scenario_path, settings.as_deref()),
    }
}

fn cmd_validate(installation_path: &Path) -> CliResult<()> {
    println!("Validating installation: {}", installation_path.display());
    let installation = hz_project::load_yaml(installation_path)?;
    println!("✓ Installation is valid ({} zones)", installation.zones.len());
    Ok(())
}

fn cmd_zones(installation_path: &Path) -> CliResult<()> {
    let installation = hz_project::load_yaml(installation_path)?;

    if installation.zones.is_empty() {
        println!("No zones found in installation");
    } else {
        println!("Zones in installation:");
        for zone in &installation.zones {
            let discharge = installation.discharge_zone.as_deref() == Some(zone.id.as_str());
            println!(
                "  {} - {} ({:.1} m², {:?} priority{}{})",
                zone.id,
                zone.name,
                zone.floor_area_m2,
                zone.priority,
                if zone.ext_temp_sensor.is_some() {
                    ", external sensor"
                } else {
                    ""
                },
                if discharge { ", discharge valve" } else { "" }
            );
        }
    }
    Ok(())
}

fn cmd_replay(
    installation_path: &Path,
    scenario_path: &Path,
    settings_path: Option<&Path>,
) -> CliResult<()> {
    let installation = hz_project::load_yaml(installation_path)?;
    let scenario = hz_project::load_scenario_yaml(scenario_path, &installation)?;

    let settings = match settings_path {
        Some(path) => Some(SettingsStore::new(path.to_path_buf()).load()?),
        None => None,
    };

    let mut controller = build_controller(&installation, settings.as_ref())?;
    if scenario.preheat_enabled {
        controller.set_preheat_enabled(true);
    }

    let mut actuator = TracingActuator {
        zone_keys: installation.zones.iter().map(|z| z.id.clone()).collect(),
    };

    println!(
        "Replaying scenario '{}' ({} steps) from {}",
        scenario.name,
        scenario.steps.len(),
        scenario.start
    );

    let mut now = scenario.start;
    for step in &scenario.steps {
        now = scenario.start + Duration::milliseconds((step.at_s * 1000.0) as i64);
        match to_engine_event(&controller, &step.event) {
            Some(event) => controller.handle_event(event, now, &mut actuator),
            None => warn!(?step.event, "step references no resolvable zone, skipped"),
        }
    }

    let snapshot = controller.snapshot(now);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Build the runtime controller from the installation definition, with any
/// persisted user adjustments layered on top.
fn build_controller(
    installation: &InstallationDef,
    settings: Option<&Settings>,
) -> CliResult<MasterController> {
    let limits = match installation.flow_limits {
        Some(l) => FlowLimits::new(l.min_c, l.max_c)?,
        None => FlowLimits::default(),
    };

    let zone_configs: Vec<ZoneConfig> = installation
        .zones
        .iter()
        .map(|zone| ZoneConfig {
            key: zone.id.clone(),
            name: zone.name.clone(),
            floor_area_m2: settings
                .and_then(|s| s.floor_area_overrides.get(&zone.id))
                .copied()
                .unwrap_or(zone.floor_area_m2),
            priority: zone.priority,
            has_external_sensor: zone.ext_temp_sensor.is_some(),
        })
        .collect();

    let discharge_key = settings
        .and_then(|s| s.discharge_zone.as_deref())
        .or(installation.discharge_zone.as_deref());

    let mut controller = MasterController::new(&zone_configs, discharge_key, limits)?;
    if let Some(s) = settings {
        controller.set_preheat_enabled(s.preheat_enabled);
        controller.set_preheat_window(s.preheat_end);
    }
    Ok(controller)
}

/// Resolve a scenario step to the engine's event type.
fn to_engine_event(controller: &MasterController, def: &EventDef) -> Option<ZoneEvent> {
    Some(match def {
        EventDef::OpeningChanged { zone, percent } => ZoneEvent::OpeningChanged {
            zone: controller.zone_id(zone)?,
            percent: *percent,
        },
        EventDef::TemperatureChanged {
            zone,
            current_c,
            target_c,
        } => ZoneEvent::TemperatureChanged {
            zone: controller.zone_id(zone)?,
            current: *current_c,
            target: *target_c,
        },
        EventDef::ExternalTemperatureChanged { zone, value_c } => {
            ZoneEvent::ExternalTemperatureChanged {
                zone: controller.zone_id(zone)?,
                value: *value_c,
            }
        }
        EventDef::PreheatWindowChanged { end } => ZoneEvent::PreheatWindowChanged { end: *end },
        EventDef::EnabledChanged { enabled } => ZoneEvent::EnabledChanged { enabled: *enabled },
    })
}

/// Actuator that reports every outbound command through tracing instead of
/// driving hardware.
struct TracingActuator {
    zone_keys: Vec<String>,
}

impl TracingActuator {
    fn key(&self, zone: ZoneId) -> &str {
        self.zone_keys
            .get(zone.index() as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }
}

impl BoilerActuator for TracingActuator {
    fn set_flow_temperature(&mut self, value: f64) {
        info!(value, "boiler flow temperature commanded");
    }

    fn set_calibration_offset(&mut self, zone: ZoneId, value: f64) {
        info!(zone = %self.key(zone), value, "valve calibration offset commanded");
    }

    fn set_discharge_output(&mut self, zone: ZoneId, on: bool) {
        info!(zone = %self.key(zone), on, "discharge boost output commanded");
    }
}
