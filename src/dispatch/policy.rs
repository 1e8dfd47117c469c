/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Call, Direction, ElevatorSnapshot, MotionState, UnitId};

/// Picks the elevator that should service a call, given a read-only view of
/// the bank. Implementations hold no per-elevator state and must never
/// mutate the candidates; the coordinator can swap the policy at runtime.
pub trait SelectionPolicy: Send {
    fn select(&self, call: &Call, units: &[ElevatorSnapshot]) -> Option<UnitId>;
}

/**
 * Nearest-with-direction-affinity policy.
 *
 * Starting from the first elevator as the candidate, each elevator is
 * scored by its distance to the call floor:
 * - an idle elevator at a strictly shorter distance always takes over,
 *   without considering the moving-elevator rules for it,
 * - a moving elevator is only eligible when it is already heading towards
 *   the call floor from the correct side, again at strictly shorter
 *   distance.
 *
 * Ties keep the earlier candidate, so iteration order decides and repeated
 * scans of the same view return the same elevator.
 */
pub struct NearestElevator;

impl SelectionPolicy for NearestElevator {
    fn select(&self, call: &Call, units: &[ElevatorSnapshot]) -> Option<UnitId> {
        let first = units.first()?;
        let mut best = first.id;
        let mut best_distance = (call.floor - first.floor).abs();

        for unit in units {
            let distance = (call.floor - unit.floor).abs();

            if unit.state == MotionState::Idle {
                if distance < best_distance {
                    best_distance = distance;
                    best = unit.id;
                }
                continue;
            }

            match call.direction {
                Direction::Up => {
                    if unit.state == MotionState::MovingUp
                        && unit.floor < call.floor
                        && distance < best_distance
                    {
                        best_distance = distance;
                        best = unit.id;
                    }
                }
                Direction::Down => {
                    if unit.state == MotionState::MovingDown
                        && unit.floor > call.floor
                        && distance < best_distance
                    {
                        best_distance = distance;
                        best = unit.id;
                    }
                }
            }
        }

        Some(best)
    }
}
