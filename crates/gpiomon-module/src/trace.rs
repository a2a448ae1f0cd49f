//! Ordered trace of collaborator calls
//!
//! Every simulated collaborator appends to one shared trace, so tests can
//! assert acquisition/release ordering (e.g. unbind happens before the
//! line is released) instead of only counting calls.

use parking_lot::Mutex;

/// One collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    GroupCreated(String),
    GroupRemoved(String),
    LineClaimed(u32),
    LineInput(u32),
    LineExported(u32),
    LineUnexported(u32),
    LineReleased(u32),
    IrqBound(u32),
    IrqUnbound(u32),
}

/// Append-only event log shared by all collaborators of one board.
#[derive(Default)]
pub struct EventTrace {
    events: Mutex<Vec<BoardEvent>>,
}

impl EventTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: BoardEvent) {
        self.events.lock().push(event);
    }

    /// Snapshot of all events so far.
    pub fn snapshot(&self) -> Vec<BoardEvent> {
        self.events.lock().clone()
    }

    /// Index of the first occurrence of `event`, if any.
    pub fn position(&self, event: &BoardEvent) -> Option<usize> {
        self.events.lock().iter().position(|e| e == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_preserved() {
        let trace = EventTrace::new();
        trace.record(BoardEvent::LineClaimed(46));
        trace.record(BoardEvent::IrqBound(174));
        trace.record(BoardEvent::IrqUnbound(174));
        trace.record(BoardEvent::LineReleased(46));

        let unbound = trace.position(&BoardEvent::IrqUnbound(174)).unwrap();
        let released = trace.position(&BoardEvent::LineReleased(46)).unwrap();
        assert!(unbound < released);
    }
}
