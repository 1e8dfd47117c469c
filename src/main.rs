/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{error, info};
use std::thread::Builder;

/* Custom libraries */
use dispatch::{Coordinator, StatusRelay, UnitHandle};
use elevator::{ElevatorFsm, UnitCommand};
use panel::FloorPanel;
use shared::{MotionState, StatusEvent};

/* Modules */
mod config;
mod dispatch;
mod elevator;
mod panel;
mod shared;

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("heisbank")
        .about("Elevator bank dispatch simulation")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .get_matches();
    let config_path = matches.value_of("config").unwrap_or("config.toml");

    // Load the configuration
    let config = crate::unwrap_or_exit!(config::load_config(config_path));

    // Build the coordinator and the elevator threads
    let (mut coordinator, dispatch_handle, event_tx) = Coordinator::new(&config.building);

    let mut fsm_threads = Vec::new();
    for unit_config in &config.elevators {
        let (command_tx, command_rx) = cbc::unbounded::<UnitCommand>();
        let fsm = ElevatorFsm::new(
            unit_config,
            config.building.travel_time_ms,
            command_rx,
            event_tx.clone(),
        );

        coordinator.register_unit(UnitHandle {
            id: unit_config.id,
            command_tx,
            snapshot: fsm.snapshot_handle(),
        });

        let fsm_thread = Builder::new().name(format!("elevator_{}", unit_config.id));
        fsm_threads.push(crate::unwrap_or_exit!(fsm_thread.spawn(move || fsm.run())));
        info!(
            "elevator {} created at floor {}",
            unit_config.id, unit_config.starting_floor
        );
    }

    // Register the floor panels and the relay the scenario loop waits on
    for panel_config in &config.panels {
        coordinator.register_observer(Box::new(FloorPanel::new(panel_config.floor)));
        info!("panel created at floor {}", panel_config.floor);
    }

    let (relay_tx, relay_rx) = cbc::unbounded::<StatusEvent>();
    coordinator.register_observer(Box::new(StatusRelay::new(relay_tx)));

    // The elevator threads hold the remaining event senders
    drop(event_tx);

    let coordinator_thread = Builder::new().name("coordinator".into());
    let coordinator_thread = crate::unwrap_or_exit!(coordinator_thread.spawn(move || coordinator.run()));

    // Run the scenario: submit each call and wait for the assigned
    // elevator to finish its trip before issuing the next one
    for call in &config.scenario {
        match dispatch_handle.submit_call(call.floor, call.direction) {
            Ok(unit) => {
                while let Ok(event) = relay_rx.recv() {
                    if event.unit == unit && event.state == MotionState::Idle {
                        break;
                    }
                }
            }
            Err(e) => error!("call for floor {} rejected: {}", call.floor, e),
        }
    }

    dispatch_handle.shutdown();
    for fsm_thread in fsm_threads {
        let _ = fsm_thread.join();
    }
    let _ = coordinator_thread.join();
}
