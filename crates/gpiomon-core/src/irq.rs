//! The button interrupt handler
//!
//! Invoked by the dispatch collaborator once per qualifying electrical
//! transition. The handler reacts to the *level at poll time*, not the
//! edge kind: it reads the line, snapshots the level, and counts a press
//! when the level equals the active (pressed) level. Electrical bounce
//! therefore inflates the count; that is a characteristic of the design,
//! not something this module debounces away.

use std::sync::Arc;

use crate::constants::ACTIVE_LEVEL;
use crate::kdebug;
use crate::state::MonitorState;
use crate::traits::{GpioLine, IrqHandler};

/// Completion status reported back to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqStatus {
    /// The transition was processed.
    Handled,
    /// The interrupt was not ours. This handler never produces it.
    None,
}

/// Handler bound against the button line's interrupt.
///
/// Holds the shared state and the line collaborator; `handle()` is the
/// only entry point and does one atomic level store plus at most one
/// atomic increment. No blocking, no allocation.
pub struct ButtonIrqHandler {
    state: Arc<MonitorState>,
    line_io: Arc<dyn GpioLine>,
    line: u32,
}

impl ButtonIrqHandler {
    pub fn new(state: Arc<MonitorState>, line_io: Arc<dyn GpioLine>, line: u32) -> Self {
        ButtonIrqHandler { state, line_io, line }
    }
}

impl IrqHandler for ButtonIrqHandler {
    fn handle(&self, _irq: u32) -> IrqStatus {
        let level = self.line_io.read_level(self.line);
        self.state.set_level(level);

        if level == ACTIVE_LEVEL {
            let presses = self.state.record_press();
            kdebug!("gpiomon: button is {}, pressed {} times", level, presses);
        } else {
            kdebug!("gpiomon: button is {}", level);
        }

        IrqStatus::Handled
    }
}
