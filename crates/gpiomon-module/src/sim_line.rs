//! `SimLine` — default `GpioLine` implementation.
//!
//! A single simulated input line. Tests and the smoke tool drive the
//! electrical level with `set_level`; the driver sees it through
//! `read_level`. Claim state, per-operation counters, and failure
//! injection make lifecycle paths observable.
//!
//! The line-to-irq mapping is fixed: `irq = line + 128`, so a resolved
//! identifier is always non-zero.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use gpiomon_core::error::{MonitorError, MonitorResult};
use gpiomon_core::traits::GpioLine;

use crate::trace::{BoardEvent, EventTrace};

/// Offset applied to a line number to form its interrupt identifier.
pub const IRQ_BASE: u32 = 128;

pub struct SimLine {
    /// Current electrical level (0 or 1).
    level: AtomicU8,
    claimed: AtomicBool,

    // Call counters, inspected by lifecycle tests.
    claims: AtomicUsize,
    releases: AtomicUsize,
    exports: AtomicUsize,
    unexports: AtomicUsize,

    // Failure injection.
    fail_claim: AtomicBool,
    fail_input: AtomicBool,
    fail_to_irq: AtomicBool,

    trace: Arc<EventTrace>,
}

impl SimLine {
    pub fn new(trace: Arc<EventTrace>) -> Self {
        SimLine {
            level: AtomicU8::new(1), // pulled up, not pressed
            claimed: AtomicBool::new(false),
            claims: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            exports: AtomicUsize::new(0),
            unexports: AtomicUsize::new(0),
            fail_claim: AtomicBool::new(false),
            fail_input: AtomicBool::new(false),
            fail_to_irq: AtomicBool::new(false),
            trace,
        }
    }

    /// Drive the simulated electrical level.
    pub fn set_level(&self, level: u8) {
        self.level.store(level & 1, Ordering::Release);
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    pub fn claims(&self) -> usize {
        self.claims.load(Ordering::Acquire)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Acquire)
    }

    pub fn exports(&self) -> usize {
        self.exports.load(Ordering::Acquire)
    }

    pub fn unexports(&self) -> usize {
        self.unexports.load(Ordering::Acquire)
    }

    pub fn inject_claim_failure(&self, fail: bool) {
        self.fail_claim.store(fail, Ordering::Release);
    }

    pub fn inject_input_failure(&self, fail: bool) {
        self.fail_input.store(fail, Ordering::Release);
    }

    pub fn inject_irq_resolve_failure(&self, fail: bool) {
        self.fail_to_irq.store(fail, Ordering::Release);
    }
}

impl GpioLine for SimLine {
    fn claim(&self, line: u32) -> MonitorResult<()> {
        if self.fail_claim.load(Ordering::Acquire) {
            return Err(MonitorError::LineClaim(-16));
        }
        if self.claimed.swap(true, Ordering::AcqRel) {
            return Err(MonitorError::LineClaim(-16));
        }
        self.claims.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::LineClaimed(line));
        Ok(())
    }

    fn set_input(&self, line: u32) -> MonitorResult<()> {
        if self.fail_input.load(Ordering::Acquire) {
            return Err(MonitorError::LineDirection(-22));
        }
        self.trace.record(BoardEvent::LineInput(line));
        Ok(())
    }

    fn export(&self, line: u32) {
        self.exports.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::LineExported(line));
    }

    fn unexport(&self, line: u32) {
        self.unexports.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::LineUnexported(line));
    }

    fn read_level(&self, _line: u32) -> u8 {
        self.level.load(Ordering::Acquire)
    }

    fn to_irq(&self, line: u32) -> MonitorResult<u32> {
        if self.fail_to_irq.load(Ordering::Acquire) {
            return Err(MonitorError::IrqResolve);
        }
        Ok(line + IRQ_BASE)
    }

    fn release(&self, line: u32) {
        if self.claimed.swap(false, Ordering::AcqRel) {
            self.releases.fetch_add(1, Ordering::AcqRel);
            self.trace.record(BoardEvent::LineReleased(line));
        }
    }
}
