/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type UnitId = u8;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "movingUp")]
    MovingUp,
    #[serde(rename = "movingDown")]
    MovingDown,
}

impl MotionState {
    /// Transition taken when an upward trip is requested.
    pub fn request_up(self) -> MotionState {
        match self {
            MotionState::Idle => MotionState::MovingUp,
            MotionState::MovingUp => MotionState::MovingUp,
            MotionState::MovingDown => MotionState::MovingUp,
        }
    }

    /// Transition taken when a downward trip is requested.
    pub fn request_down(self) -> MotionState {
        match self {
            MotionState::Idle => MotionState::MovingDown,
            MotionState::MovingUp => MotionState::MovingDown,
            MotionState::MovingDown => MotionState::MovingDown,
        }
    }

    /// Transition taken on arrival at the target floor. Stopping while
    /// already idle is a no-op.
    pub fn request_stop(self) -> MotionState {
        match self {
            MotionState::Idle => MotionState::Idle,
            MotionState::MovingUp => MotionState::Idle,
            MotionState::MovingDown => MotionState::Idle,
        }
    }
}

/// A floor call as submitted from a panel: where the caller stands and
/// which way they want to travel.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub floor: i32,
    pub direction: Direction,
}

/// Emitted by an elevator on every single-floor step and on reaching
/// Idle at the end of a trip.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEvent {
    pub unit: UnitId,
    pub floor: i32,
    pub state: MotionState,
}

/// Read-only view of one elevator, scanned by the selection policy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorSnapshot {
    pub id: UnitId,
    pub floor: i32,
    pub state: MotionState,
}

/***************************************/
/*               Errors                */
/***************************************/
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no elevator available for the call")]
    NoElevatorAvailable,
    #[error("floor {floor} is outside the building range {min}..={max}")]
    FloorOutOfRange { floor: i32, min: i32, max: i32 },
    #[error("cannot travel {direction:?} from floor {floor}")]
    InvalidDirection { floor: i32, direction: Direction },
    #[error("no elevator registered with id {0}")]
    UnknownUnit(UnitId),
    #[error("dispatch service is no longer running")]
    Disconnected,
}
