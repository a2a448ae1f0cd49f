//! Shared monitor state and driver lifecycle types

use core::fmt;
use core::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};

/// State shared between the interrupt handler, the attribute surface,
/// and the lifecycle controller.
///
/// One instance per driver, held behind an `Arc`. Every field is an
/// atomic so the interrupt context can write while attribute readers
/// run on other contexts, with no lost updates and no torn reads.
pub struct MonitorState {
    /// Last level observed on the monitored line (0 or 1).
    /// Written only by the interrupt handler.
    level: AtomicU8,

    /// Cumulative press count. Incremented by the handler; the `count`
    /// attribute may overwrite it wholesale.
    presses: AtomicU64,

    /// Interrupt identifier. Written exactly once during load, then
    /// immutable until unload. 0 means "not yet bound".
    irq: AtomicU32,
}

impl MonitorState {
    /// Create state with startup defaults (level 0, no presses, no irq).
    pub const fn new() -> Self {
        MonitorState {
            level: AtomicU8::new(0),
            presses: AtomicU64::new(0),
            irq: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set_level(&self, level: u8) {
        self.level.store(level, Ordering::Release);
    }

    #[inline]
    pub fn presses(&self) -> u64 {
        self.presses.load(Ordering::Acquire)
    }

    /// Increment the press count by one. Safe against concurrent
    /// attribute reads/writes; no increment is ever lost.
    #[inline]
    pub fn record_press(&self) -> u64 {
        self.presses.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Replace the press count. Only the `count` attribute store path
    /// uses this.
    #[inline]
    pub fn set_presses(&self, value: u64) {
        self.presses.store(value, Ordering::Release);
    }

    #[inline]
    pub fn irq(&self) -> u32 {
        self.irq.load(Ordering::Acquire)
    }

    /// Record the resolved interrupt identifier. Called once by the
    /// lifecycle controller before the handler is bound.
    #[inline]
    pub fn set_irq(&self, irq: u32) {
        self.irq.store(irq, Ordering::Release);
    }

    /// Reset to startup defaults. Used on unload.
    pub fn reset(&self) {
        self.level.store(0, Ordering::Release);
        self.presses.store(0, Ordering::Release);
        self.irq.store(0, Ordering::Release);
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorState")
            .field("level", &self.level())
            .field("presses", &self.presses())
            .field("irq", &self.irq())
            .finish()
    }
}

/// Lifecycle of the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Nothing acquired
    Unloaded = 0,

    /// Attribute group registered, line not yet claimed
    RegisteringGroup = 1,

    /// Line claimed, configured, and exported; handler not yet bound
    AcquiringLine = 2,

    /// Interrupt identifier resolved, handler bind in progress
    BindingIrq = 3,

    /// Fully live; handler and attributes operating concurrently
    Running = 4,
}

impl LifecycleState {
    /// Check whether the driver is fully live
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Running)
    }

    /// Check whether any resource is held (rollback has work to do)
    #[inline]
    pub const fn holds_resources(&self) -> bool {
        !matches!(self, LifecycleState::Unloaded)
    }
}

impl From<u8> for LifecycleState {
    fn from(v: u8) -> Self {
        match v {
            1 => LifecycleState::RegisteringGroup,
            2 => LifecycleState::AcquiringLine,
            3 => LifecycleState::BindingIrq,
            4 => LifecycleState::Running,
            _ => LifecycleState::Unloaded,
        }
    }
}

impl From<LifecycleState> for u8 {
    fn from(state: LifecycleState) -> u8 {
        state as u8
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Unloaded => write!(f, "unloaded"),
            LifecycleState::RegisteringGroup => write!(f, "registering-group"),
            LifecycleState::AcquiringLine => write!(f, "acquiring-line"),
            LifecycleState::BindingIrq => write!(f, "binding-irq"),
            LifecycleState::Running => write!(f, "running"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let s = MonitorState::new();
        assert_eq!(s.level(), 0);
        assert_eq!(s.presses(), 0);
        assert_eq!(s.irq(), 0);
    }

    #[test]
    fn test_record_press_returns_new_count() {
        let s = MonitorState::new();
        assert_eq!(s.record_press(), 1);
        assert_eq!(s.record_press(), 2);
        assert_eq!(s.presses(), 2);
    }

    #[test]
    fn test_overwrite_then_increment() {
        let s = MonitorState::new();
        s.record_press();
        s.set_presses(40);
        assert_eq!(s.record_press(), 41);
    }

    #[test]
    fn test_reset() {
        let s = MonitorState::new();
        s.set_level(1);
        s.set_presses(7);
        s.set_irq(174);
        s.reset();
        assert_eq!(s.level(), 0);
        assert_eq!(s.presses(), 0);
        assert_eq!(s.irq(), 0);
    }

    #[test]
    fn test_concurrent_increments_not_lost() {
        let s = Arc::new(MonitorState::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let s = Arc::clone(&s);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    s.record_press();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(s.presses(), 8000);
    }

    #[test]
    fn test_lifecycle_roundtrip() {
        for v in 0u8..=4 {
            let st = LifecycleState::from(v);
            assert_eq!(u8::from(st), v);
        }
        assert_eq!(LifecycleState::from(99), LifecycleState::Unloaded);
        assert!(LifecycleState::Running.is_running());
        assert!(!LifecycleState::Unloaded.holds_resources());
        assert!(LifecycleState::AcquiringLine.holds_resources());
    }
}
