pub mod coordinator;
pub mod policy;

pub use coordinator::Coordinator;
pub use coordinator::DispatchHandle;
pub use coordinator::StatusObserver;
pub use coordinator::StatusRelay;
pub use coordinator::UnitHandle;
pub use policy::NearestElevator;
pub use policy::SelectionPolicy;
