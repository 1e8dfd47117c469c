/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::BuildingConfig;
use crate::dispatch::policy::{NearestElevator, SelectionPolicy};
use crate::elevator::UnitCommand;
use crate::shared::{Call, Direction, DispatchError, ElevatorSnapshot, StatusEvent, UnitId};

/// Push-only notification of elevator status. Panels are the concrete
/// consumer; observers hold no reference back to the coordinator and are
/// called on the coordinator thread, so callbacks must return promptly.
pub trait StatusObserver: Send {
    fn on_status(&mut self, event: &StatusEvent);
}

/// Coordinator-side view of one elevator: where to send commands and the
/// shared floor/state cell its fsm thread keeps current.
pub struct UnitHandle {
    pub id: UnitId,
    pub command_tx: cbc::Sender<UnitCommand>,
    pub snapshot: Arc<Mutex<ElevatorSnapshot>>,
}

enum Request {
    SubmitCall {
        call: Call,
        reply_tx: cbc::Sender<Result<UnitId, DispatchError>>,
    },
    CancelCall {
        unit: UnitId,
        floor: i32,
        reply_tx: cbc::Sender<Result<(), DispatchError>>,
    },
    SetPolicy(Box<dyn SelectionPolicy>),
    Shutdown,
}

/**
 * Dispatches floor calls across the elevator bank.
 *
 * The `Coordinator` owns the registry of elevators and observers and the
 * active selection policy. It runs on its own thread: callers reach it
 * through a `DispatchHandle`, elevators report through the status event
 * channel, and every received event is fanned out to all observers in
 * registration order. Rejected calls are replied to the caller and never
 * stop the loop.
 *
 * # Fields
 * - `units`:        Registered elevators, in registration order.
 * - `observers`:    Registered observers, notified in registration order.
 * - `policy`:       Active selection policy, swappable at runtime.
 * - `min_floor`:    Bottom floor of the building.
 * - `max_floor`:    Top floor of the building.
 * - `request_rx`:   Receives caller requests from dispatch handles.
 * - `event_rx`:     Receives status events from the elevator threads.
 */
pub struct Coordinator {
    units: Vec<UnitHandle>,
    observers: Vec<Box<dyn StatusObserver>>,
    policy: Box<dyn SelectionPolicy>,
    min_floor: i32,
    max_floor: i32,
    request_rx: cbc::Receiver<Request>,
    event_rx: cbc::Receiver<StatusEvent>,
}

impl Coordinator {
    /// Builds an empty coordinator for the given building, returning the
    /// caller-side handle and the event sender the elevator threads report
    /// through.
    pub fn new(config: &BuildingConfig) -> (Coordinator, DispatchHandle, cbc::Sender<StatusEvent>) {
        let (request_tx, request_rx) = cbc::unbounded::<Request>();
        let (event_tx, event_rx) = cbc::unbounded::<StatusEvent>();

        let coordinator = Coordinator {
            units: Vec::new(),
            observers: Vec::new(),
            policy: Box::new(NearestElevator),
            min_floor: config.min_floor,
            max_floor: config.max_floor,
            request_rx,
            event_rx,
        };

        (coordinator, DispatchHandle { request_tx }, event_tx)
    }

    pub fn register_unit(&mut self, unit: UnitHandle) {
        self.units.push(unit);
    }

    pub fn register_observer(&mut self, observer: Box<dyn StatusObserver>) {
        self.observers.push(observer);
    }

    pub fn set_selection_policy(&mut self, policy: Box<dyn SelectionPolicy>) {
        self.policy = policy;
    }

    pub fn run(mut self) {
        loop {
            cbc::select! {
                recv(self.request_rx) -> request => {
                    match request {
                        Ok(Request::SubmitCall { call, reply_tx }) => {
                            let result = self.assign_call(&call);
                            if let Err(e) = &result {
                                warn!("call for floor {} rejected: {}", call.floor, e);
                            }
                            let _ = reply_tx.send(result);
                        }
                        Ok(Request::CancelCall { unit, floor, reply_tx }) => {
                            let _ = reply_tx.send(self.cancel_call(unit, floor));
                        }
                        Ok(Request::SetPolicy(policy)) => {
                            self.policy = policy;
                            info!("selection policy replaced");
                        }
                        Ok(Request::Shutdown) | Err(_) => {
                            self.terminate_units();
                            return;
                        }
                    }
                }
                recv(self.event_rx) -> event => {
                    match event {
                        Ok(event) => self.notify(&event),
                        // All elevators gone, nothing left to report
                        Err(_) => return,
                    }
                }
            }
        }
    }

    fn assign_call(&self, call: &Call) -> Result<UnitId, DispatchError> {
        self.validate_call(call)?;

        let snapshots = self.snapshot_units();
        let chosen = self
            .policy
            .select(call, &snapshots)
            .ok_or(DispatchError::NoElevatorAvailable)?;
        let unit = self
            .units
            .iter()
            .find(|unit| unit.id == chosen)
            .ok_or(DispatchError::NoElevatorAvailable)?;

        unit.command_tx
            .send(UnitCommand::Enqueue(call.floor))
            .map_err(|_| DispatchError::Disconnected)?;

        info!(
            "call for floor {} ({:?}) assigned to elevator {}",
            call.floor, call.direction, chosen
        );
        Ok(chosen)
    }

    fn validate_call(&self, call: &Call) -> Result<(), DispatchError> {
        if call.floor < self.min_floor || call.floor > self.max_floor {
            return Err(DispatchError::FloorOutOfRange {
                floor: call.floor,
                min: self.min_floor,
                max: self.max_floor,
            });
        }

        // A call can only ask for travel that stays inside the building
        let at_boundary = match call.direction {
            Direction::Up => call.floor == self.max_floor,
            Direction::Down => call.floor == self.min_floor,
        };
        if at_boundary {
            return Err(DispatchError::InvalidDirection {
                floor: call.floor,
                direction: call.direction,
            });
        }

        Ok(())
    }

    fn cancel_call(&self, unit: UnitId, floor: i32) -> Result<(), DispatchError> {
        let unit = self
            .units
            .iter()
            .find(|handle| handle.id == unit)
            .ok_or(DispatchError::UnknownUnit(unit))?;
        unit.command_tx
            .send(UnitCommand::Cancel(floor))
            .map_err(|_| DispatchError::Disconnected)
    }

    fn snapshot_units(&self) -> Vec<ElevatorSnapshot> {
        self.units
            .iter()
            .map(|unit| {
                *unit
                    .snapshot
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
            })
            .collect()
    }

    // No unit lock is held here: elevators publish their snapshot before
    // sending, so a slow observer can only ever delay other notifications.
    fn notify(&mut self, event: &StatusEvent) {
        match serde_json::to_string(event) {
            Ok(json) => debug!(target: "status", "{}", json),
            Err(e) => warn!("failed to serialize status event: {}", e),
        }

        for observer in self.observers.iter_mut() {
            observer.on_status(event);
        }
    }

    fn terminate_units(&self) {
        for unit in &self.units {
            let _ = unit.command_tx.send(UnitCommand::Terminate);
        }
    }
}

/***************************************/
/*          Caller interface           */
/***************************************/

/// Cloneable, channel-backed surface for submitting calls to a running
/// coordinator. Submission returns as soon as the call is queued; trip
/// completion is reported through the observer channel.
#[derive(Clone)]
pub struct DispatchHandle {
    request_tx: cbc::Sender<Request>,
}

impl DispatchHandle {
    pub fn submit_call(&self, floor: i32, direction: Direction) -> Result<UnitId, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.request_tx
            .send(Request::SubmitCall {
                call: Call { floor, direction },
                reply_tx,
            })
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    /// Removes a queued-but-not-started request from an elevator's queue.
    /// An in-flight single-floor step completes before the cancel applies.
    pub fn cancel_call(&self, unit: UnitId, floor: i32) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.request_tx
            .send(Request::CancelCall {
                unit,
                floor,
                reply_tx,
            })
            .map_err(|_| DispatchError::Disconnected)?;
        reply_rx.recv().map_err(|_| DispatchError::Disconnected)?
    }

    pub fn set_policy(&self, policy: Box<dyn SelectionPolicy>) -> Result<(), DispatchError> {
        self.request_tx
            .send(Request::SetPolicy(policy))
            .map_err(|_| DispatchError::Disconnected)
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(Request::Shutdown);
    }
}

/// Observer that forwards every status event onto a channel. Lets the
/// scenario runner and the tests wait for trip completion without holding
/// any reference into the coordinator.
pub struct StatusRelay {
    relay_tx: cbc::Sender<StatusEvent>,
}

impl StatusRelay {
    pub fn new(relay_tx: cbc::Sender<StatusEvent>) -> StatusRelay {
        StatusRelay { relay_tx }
    }
}

impl StatusObserver for StatusRelay {
    fn on_status(&mut self, event: &StatusEvent) {
        let _ = self.relay_tx.send(*event);
    }
}
