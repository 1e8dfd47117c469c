/*
 * Unit tests for the elevator module
 *
 * The unit tests follow the Arrange, Act, Assert pattern. Commands
 * (including Terminate) are queued on the command channel up front, the
 * fsm thread is run to completion and joined, and the emitted events are
 * collected afterwards, so the tests are fully deterministic.
 *
 * Tests:
 * - test_state_machine_transition_table
 * - test_trip_emits_one_event_per_floor
 * - test_queue_is_serviced_in_arrival_order
 * - test_degenerate_trip_stops_without_moving
 * - test_cancel_removes_pending_floor
 * - test_cancel_does_not_touch_active_trip
 *
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use crate::config::ElevatorUnitConfig;
    use crate::elevator::fsm::{ElevatorFsm, UnitCommand};
    use crate::shared::MotionState::{Idle, MovingDown, MovingUp};
    use crate::shared::{MotionState, StatusEvent};
    use crossbeam_channel::unbounded;
    use std::thread::spawn;

    fn setup_fsm(
        starting_floor: i32,
    ) -> (
        ElevatorFsm,
        crossbeam_channel::Sender<UnitCommand>,
        crossbeam_channel::Receiver<StatusEvent>,
    ) {
        // Arrange mock channels
        let (command_tx, command_rx) = unbounded::<UnitCommand>();
        let (event_tx, event_rx) = unbounded::<StatusEvent>();

        let config = ElevatorUnitConfig {
            id: 1,
            starting_floor,
        };

        // Zero travel time so trips complete as fast as the thread runs
        (
            ElevatorFsm::new(&config, 0, command_rx, event_tx),
            command_tx,
            event_rx,
        )
    }

    /// Queues the commands, runs the fsm to completion and returns the
    /// emitted (floor, state) pairs in order.
    fn run_to_completion(
        fsm: ElevatorFsm,
        command_tx: crossbeam_channel::Sender<UnitCommand>,
        event_rx: crossbeam_channel::Receiver<StatusEvent>,
        commands: Vec<UnitCommand>,
    ) -> Vec<(i32, MotionState)> {
        for command in commands {
            command_tx.send(command).unwrap();
        }
        command_tx.send(UnitCommand::Terminate).unwrap();

        let fsm_thread = spawn(move || fsm.run());
        fsm_thread.join().unwrap();

        event_rx
            .try_iter()
            .map(|event| (event.floor, event.state))
            .collect()
    }

    #[test]
    fn test_state_machine_transition_table() {
        // Purpose: Verify every cell of the motion state transition table

        assert_eq!(Idle.request_up(), MovingUp);
        assert_eq!(Idle.request_down(), MovingDown);
        assert_eq!(Idle.request_stop(), Idle);

        assert_eq!(MovingUp.request_up(), MovingUp);
        assert_eq!(MovingUp.request_down(), MovingDown);
        assert_eq!(MovingUp.request_stop(), Idle);

        assert_eq!(MovingDown.request_up(), MovingUp);
        assert_eq!(MovingDown.request_down(), MovingDown);
        assert_eq!(MovingDown.request_stop(), Idle);
    }

    #[test]
    fn test_trip_emits_one_event_per_floor() {
        // Purpose: Verify that a trip from floor 1 to 3 emits exactly one
        // event per single-floor step plus one terminal Idle event

        // Arrange
        let (fsm, command_tx, event_rx) = setup_fsm(1);
        let snapshot = fsm.snapshot_handle();

        // Act
        let events = run_to_completion(fsm, command_tx, event_rx, vec![UnitCommand::Enqueue(3)]);

        // Assert
        assert_eq!(events, vec![(2, MovingUp), (3, MovingUp), (3, Idle)]);

        let snapshot = snapshot.lock().unwrap();
        assert_eq!(snapshot.floor, 3);
        assert_eq!(snapshot.state, Idle);
    }

    #[test]
    fn test_queue_is_serviced_in_arrival_order() {
        // Purpose: Verify FIFO service order, including a repeated floor

        // Arrange
        let (fsm, command_tx, event_rx) = setup_fsm(1);

        // Act
        let events = run_to_completion(
            fsm,
            command_tx,
            event_rx,
            vec![
                UnitCommand::Enqueue(3),
                UnitCommand::Enqueue(1),
                UnitCommand::Enqueue(3),
            ],
        );

        // Assert
        assert_eq!(
            events,
            vec![
                (2, MovingUp),
                (3, MovingUp),
                (3, Idle),
                (2, MovingDown),
                (1, MovingDown),
                (1, Idle),
                (2, MovingUp),
                (3, MovingUp),
                (3, Idle),
            ]
        );
    }

    #[test]
    fn test_degenerate_trip_stops_without_moving() {
        // Purpose: Verify that requesting the current floor emits no step
        // events, exactly one Idle event, and consumes the queue entry

        // Arrange
        let (fsm, command_tx, event_rx) = setup_fsm(4);

        // Act
        let events = run_to_completion(fsm, command_tx, event_rx, vec![UnitCommand::Enqueue(4)]);

        // Assert
        assert_eq!(events, vec![(4, Idle)]);
    }

    #[test]
    fn test_cancel_removes_pending_floor() {
        // Purpose: Verify that a queued-but-not-started floor can be
        // cancelled while an earlier trip is in flight

        // Arrange
        let (fsm, command_tx, event_rx) = setup_fsm(1);

        // Act
        let events = run_to_completion(
            fsm,
            command_tx,
            event_rx,
            vec![
                UnitCommand::Enqueue(5),
                UnitCommand::Enqueue(3),
                UnitCommand::Cancel(3),
            ],
        );

        // Assert: the trip to 5 completes, the trip to 3 never happens
        assert_eq!(
            events,
            vec![
                (2, MovingUp),
                (3, MovingUp),
                (4, MovingUp),
                (5, MovingUp),
                (5, Idle),
            ]
        );
    }

    #[test]
    fn test_cancel_does_not_touch_active_trip() {
        // Purpose: Verify that the trip currently in service cannot be
        // removed from the queue

        // Arrange
        let (fsm, command_tx, event_rx) = setup_fsm(1);

        // Act
        let events = run_to_completion(
            fsm,
            command_tx,
            event_rx,
            vec![UnitCommand::Enqueue(3), UnitCommand::Cancel(3)],
        );

        // Assert
        assert_eq!(events, vec![(2, MovingUp), (3, MovingUp), (3, Idle)]);
    }
}
