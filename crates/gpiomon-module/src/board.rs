//! `SimBoard` — one simulated board, fully wired.
//!
//! Bundles a line, an interrupt controller, and a registry that all share
//! one event trace. Edge helpers drive the line level and deliver the
//! interrupt the way the hardware would; `post_edge`/`dispatch_pending`
//! queue transitions from producer threads and deliver them back-to-back,
//! which is how the bounce/burst tests exercise the handler.

use std::sync::Arc;

use crossbeam_queue::SegQueue;

use gpiomon_core::constants::DEFAULT_LINE;
use gpiomon_core::error::MonitorResult;
use gpiomon_core::irq::IrqStatus;
use gpiomon_core::traits::GpioLine;

use crate::registry::MemRegistry;
use crate::sim_irq::SimIrqController;
use crate::sim_line::{SimLine, IRQ_BASE};
use crate::trace::{BoardEvent, EventTrace};

pub struct SimBoard {
    pub line: Arc<SimLine>,
    pub irq_ctl: Arc<SimIrqController>,
    pub registry: Arc<MemRegistry>,

    line_id: u32,
    /// Transitions posted but not yet delivered.
    pending: SegQueue<u8>,
    trace: Arc<EventTrace>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::with_line(DEFAULT_LINE)
    }

    pub fn with_line(line_id: u32) -> Self {
        let trace = Arc::new(EventTrace::new());
        SimBoard {
            line: Arc::new(SimLine::new(Arc::clone(&trace))),
            irq_ctl: Arc::new(SimIrqController::new(Arc::clone(&trace))),
            registry: Arc::new(MemRegistry::new(Arc::clone(&trace))),
            line_id,
            pending: SegQueue::new(),
            trace,
        }
    }

    pub fn line_id(&self) -> u32 {
        self.line_id
    }

    pub fn irq_id(&self) -> u32 {
        self.line_id + IRQ_BASE
    }

    /// Drive the line to `level` and deliver the interrupt immediately.
    pub fn edge(&self, level: u8) -> MonitorResult<IrqStatus> {
        self.line.set_level(level);
        self.irq_ctl.raise(self.irq_id())
    }

    /// A full press: the line goes to the active (low) level.
    pub fn press(&self) -> MonitorResult<IrqStatus> {
        self.edge(0)
    }

    /// A release: the line returns to the pulled-up level.
    pub fn release_button(&self) -> MonitorResult<IrqStatus> {
        self.edge(1)
    }

    /// Queue a transition without delivering it.
    pub fn post_edge(&self, level: u8) {
        self.pending.push(level & 1);
    }

    /// Deliver all queued transitions back-to-back, in post order.
    /// Returns the number delivered.
    pub fn dispatch_pending(&self) -> MonitorResult<usize> {
        let mut delivered = 0;
        while let Some(level) = self.pending.pop() {
            self.edge(level)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    /// Shared trait-object handle to the line.
    pub fn line_io(&self) -> Arc<dyn GpioLine> {
        Arc::clone(&self.line) as Arc<dyn GpioLine>
    }

    /// Everything the collaborators have done so far, in order.
    pub fn events(&self) -> Vec<BoardEvent> {
        self.trace.snapshot()
    }

    pub fn trace(&self) -> &Arc<EventTrace> {
        &self.trace
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpiomon_core::error::MonitorError;

    #[test]
    fn test_edge_without_binding_fails() {
        let board = SimBoard::new();
        assert_eq!(board.press(), Err(MonitorError::NotBound));
    }

    #[test]
    fn test_dispatch_stops_on_delivery_error() {
        let board = SimBoard::new();
        board.post_edge(0);
        board.post_edge(1);
        // nothing bound: the first delivery fails
        assert!(board.dispatch_pending().is_err());
    }

    #[test]
    fn test_irq_id_derived_from_line() {
        let board = SimBoard::with_line(46);
        assert_eq!(board.irq_id(), 174);
    }
}
