pub mod macros;
pub mod structs;

pub use structs::Call;
pub use structs::Direction;
pub use structs::DispatchError;
pub use structs::ElevatorSnapshot;
pub use structs::MotionState;
pub use structs::StatusEvent;
pub use structs::UnitId;
