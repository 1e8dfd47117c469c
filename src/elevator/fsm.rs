/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorUnitConfig;
use crate::shared::{ElevatorSnapshot, MotionState, StatusEvent, UnitId};

/**
 * Drives one elevator of the bank.
 *
 * The `ElevatorFsm` (Finite State Machine) owns a single elevator's motion
 * state, current floor and FIFO queue of destination floors. It runs on its
 * own thread: the coordinator submits work through the command channel and
 * the fsm reports every floor step and trip completion on the event channel.
 * At most one thread ever mutates an elevator's state.
 *
 * # Fields
 * - `id`:           Stable identity of this elevator within the bank.
 * - `floor`:        Current floor, advanced one floor per simulated step.
 * - `state`:        Motion state (idle, moving up, moving down).
 * - `queue`:        Pending destination floors, serviced in arrival order.
 * - `travel_time`:  Simulated duration of one single-floor step.
 * - `terminate`:    Set when a terminate command arrives mid-trip; the fsm
 *                   finishes its queued trips before exiting.
 * - `command_rx`:   Receives enqueue/cancel/terminate commands.
 * - `event_tx`:     Emits status events towards the coordinator.
 * - `snapshot`:     Shared floor/state view read by the selection policy.
 */
pub struct ElevatorFsm {
    id: UnitId,
    floor: i32,
    state: MotionState,
    queue: VecDeque<i32>,
    travel_time: Duration,
    terminate: bool,
    command_rx: cbc::Receiver<UnitCommand>,
    event_tx: cbc::Sender<StatusEvent>,
    snapshot: Arc<Mutex<ElevatorSnapshot>>,
}

pub enum UnitCommand {
    /// Append a destination floor to the queue. Duplicates are legal and
    /// serviced once per occurrence.
    Enqueue(i32),
    /// Remove the first queued-but-not-started occurrence of the floor.
    /// The trip currently in service is not affected; an in-flight
    /// single-floor step always completes first.
    Cancel(i32),
    /// Finish the queued trips, then stop the thread.
    Terminate,
}

impl ElevatorFsm {
    pub fn new(
        config: &ElevatorUnitConfig,
        travel_time_ms: u64,
        command_rx: cbc::Receiver<UnitCommand>,
        event_tx: cbc::Sender<StatusEvent>,
    ) -> ElevatorFsm {
        let snapshot = Arc::new(Mutex::new(ElevatorSnapshot {
            id: config.id,
            floor: config.starting_floor,
            state: MotionState::Idle,
        }));

        ElevatorFsm {
            id: config.id,
            floor: config.starting_floor,
            state: MotionState::Idle,
            queue: VecDeque::new(),
            travel_time: Duration::from_millis(travel_time_ms),
            terminate: false,
            command_rx,
            event_tx,
            snapshot,
        }
    }

    /// Shared floor/state cell for the coordinator's registry. The fsm
    /// thread updates it on every change; readers only ever lock it briefly.
    pub fn snapshot_handle(&self) -> Arc<Mutex<ElevatorSnapshot>> {
        Arc::clone(&self.snapshot)
    }

    pub fn run(mut self) {
        while let Ok(command) = self.command_rx.recv() {
            match command {
                UnitCommand::Enqueue(floor) => {
                    self.enqueue(floor);
                    if self.process_queue() {
                        return;
                    }
                }
                UnitCommand::Cancel(floor) => self.cancel(floor),
                UnitCommand::Terminate => return,
            }
        }
    }

    fn enqueue(&mut self, floor: i32) {
        debug!("elevator {} queued floor {}", self.id, floor);
        self.queue.push_back(floor);
    }

    /// Services the queue head by head until empty. Returns true if a
    /// terminate command arrived while moving.
    fn process_queue(&mut self) -> bool {
        while let Some(&target) = self.queue.front() {
            if target > self.floor {
                let next = self.state.request_up();
                self.transition(next);
                self.simulate_movement(target);
            } else if target < self.floor {
                let next = self.state.request_down();
                self.transition(next);
                self.simulate_movement(target);
            } else {
                // Degenerate trip: already at the requested floor. No
                // movement and no step events, but the stop still fires
                // and the queue entry is consumed.
                self.queue.pop_front();
                let next = self.state.request_stop();
                self.transition(next);
                self.emit_status();
            }
        }
        self.terminate
    }

    /// Steps the elevator one floor at a time towards `target`, emitting
    /// one status event per floor. Pending commands are drained between
    /// steps, which gives cancellation its one-floor granularity.
    fn simulate_movement(&mut self, target: i32) {
        while self.floor != target {
            if !self.travel_time.is_zero() {
                thread::sleep(self.travel_time);
            }
            self.floor += if target > self.floor { 1 } else { -1 };
            self.publish_snapshot();
            self.emit_status();
            self.drain_commands();
        }

        self.queue.pop_front();
        let next = self.state.request_stop();
        self.transition(next);
        self.emit_status();
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                UnitCommand::Enqueue(floor) => self.enqueue(floor),
                UnitCommand::Cancel(floor) => self.cancel(floor),
                UnitCommand::Terminate => {
                    self.terminate = true;
                    return;
                }
            }
        }
    }

    fn cancel(&mut self, floor: i32) {
        // The queue head is the trip in service and cannot be removed
        match self.queue.iter().skip(1).position(|&f| f == floor) {
            Some(offset) => {
                let _ = self.queue.remove(offset + 1);
                debug!("elevator {} cancelled queued floor {}", self.id, floor);
            }
            None => {
                debug!(
                    "elevator {} has no cancellable request for floor {}",
                    self.id, floor
                );
            }
        }
    }

    fn transition(&mut self, next: MotionState) {
        if next != self.state {
            debug!(
                "elevator {} at floor {}: {:?} -> {:?}",
                self.id, self.floor, self.state, next
            );
            self.state = next;
            self.publish_snapshot();
        }
    }

    fn publish_snapshot(&self) {
        let mut snapshot = self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        snapshot.floor = self.floor;
        snapshot.state = self.state;
    }

    // The snapshot lock is never held across this send, so an observer can
    // never block a selection scan through us.
    fn emit_status(&self) {
        let event = StatusEvent {
            unit: self.id,
            floor: self.floor,
            state: self.state,
        };
        if self.event_tx.send(event).is_err() {
            warn!("elevator {}: status channel closed, event dropped", self.id);
        }
    }
}
