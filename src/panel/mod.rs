/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatch::StatusObserver;
use crate::shared::{MotionState, StatusEvent};

/// Display panel mounted at one floor. A pure observer: it keeps the last
/// reported elevator position for its display and never calls back into
/// the coordinator.
pub struct FloorPanel {
    floor: i32,
    display: Option<(i32, MotionState)>,
}

impl FloorPanel {
    pub fn new(floor: i32) -> FloorPanel {
        FloorPanel {
            floor,
            display: None,
        }
    }

    /// Last (floor, state) shown on the display, if any event arrived yet.
    pub fn display(&self) -> Option<(i32, MotionState)> {
        self.display
    }
}

impl StatusObserver for FloorPanel {
    fn on_status(&mut self, event: &StatusEvent) {
        self.display = Some((event.floor, event.state));
        info!(
            "panel {}: elevator {} at floor {} ({:?})",
            self.floor, event.unit, event.floor, event.state
        );
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
