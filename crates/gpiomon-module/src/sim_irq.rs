//! `SimIrqController` — default `IrqDispatch` implementation.
//!
//! Holds at most one binding (the monitor binds a single line). `raise`
//! plays the role of the hardware dispatch: it runs the bound handler
//! under a mask lock, so the same irq is never re-entered concurrently
//! with itself, while raises from different threads serialize exactly the
//! way masked interrupts do. Attribute calls are not involved in that
//! lock and run freely in parallel.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use gpiomon_core::error::{MonitorError, MonitorResult};
use gpiomon_core::irq::IrqStatus;
use gpiomon_core::traits::{IrqDispatch, IrqHandler, TriggerMask};

use crate::trace::{BoardEvent, EventTrace};

struct Binding {
    irq: u32,
    handler: Arc<dyn IrqHandler>,
    triggers: TriggerMask,
    label: String,
}

pub struct SimIrqController {
    binding: Mutex<Option<Binding>>,
    /// Masks the irq while its handler runs.
    mask: Mutex<()>,

    binds: AtomicUsize,
    unbinds: AtomicUsize,
    raises: AtomicUsize,

    fail_bind: AtomicBool,

    trace: Arc<EventTrace>,
}

impl SimIrqController {
    pub fn new(trace: Arc<EventTrace>) -> Self {
        SimIrqController {
            binding: Mutex::new(None),
            mask: Mutex::new(()),
            binds: AtomicUsize::new(0),
            unbinds: AtomicUsize::new(0),
            raises: AtomicUsize::new(0),
            fail_bind: AtomicBool::new(false),
            trace,
        }
    }

    /// Deliver one interrupt, as the hardware would.
    ///
    /// Runs the handler synchronously under the mask lock and reports
    /// its completion status.
    pub fn raise(&self, irq: u32) -> MonitorResult<IrqStatus> {
        // Mask held across the handler: no self-re-entry, and unbind
        // cannot complete while a delivery is in flight.
        let _masked = self.mask.lock();
        let handler = {
            let binding = self.binding.lock();
            match binding.as_ref() {
                Some(b) if b.irq == irq => Arc::clone(&b.handler),
                _ => return Err(MonitorError::NotBound),
            }
        };
        self.raises.fetch_add(1, Ordering::AcqRel);
        Ok(handler.handle(irq))
    }

    pub fn is_bound(&self, irq: u32) -> bool {
        self.binding.lock().as_ref().map(|b| b.irq) == Some(irq)
    }

    /// Label the current binding was registered with, if any.
    pub fn bound_label(&self) -> Option<String> {
        self.binding.lock().as_ref().map(|b| b.label.clone())
    }

    /// Triggers of the current binding, if any.
    pub fn bound_triggers(&self) -> Option<TriggerMask> {
        self.binding.lock().as_ref().map(|b| b.triggers)
    }

    pub fn binds(&self) -> usize {
        self.binds.load(Ordering::Acquire)
    }

    pub fn unbinds(&self) -> usize {
        self.unbinds.load(Ordering::Acquire)
    }

    pub fn raises(&self) -> usize {
        self.raises.load(Ordering::Acquire)
    }

    pub fn inject_bind_failure(&self, fail: bool) {
        self.fail_bind.store(fail, Ordering::Release);
    }
}

impl IrqDispatch for SimIrqController {
    fn bind(
        &self,
        irq: u32,
        handler: Arc<dyn IrqHandler>,
        triggers: TriggerMask,
        label: &str,
    ) -> MonitorResult<i32> {
        if self.fail_bind.load(Ordering::Acquire) {
            return Err(MonitorError::IrqBind(-16));
        }
        let mut binding = self.binding.lock();
        if binding.is_some() {
            return Err(MonitorError::AlreadyBound);
        }
        *binding = Some(Binding {
            irq,
            handler,
            triggers,
            label: label.to_string(),
        });
        self.binds.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::IrqBound(irq));
        Ok(0)
    }

    fn unbind(&self, irq: u32) -> MonitorResult<()> {
        // Wait out any in-flight delivery before detaching.
        let _masked = self.mask.lock();
        let mut binding = self.binding.lock();
        match binding.as_ref() {
            Some(b) if b.irq == irq => {
                *binding = None;
                self.unbinds.fetch_add(1, Ordering::AcqRel);
                self.trace.record(BoardEvent::IrqUnbound(irq));
                Ok(())
            }
            _ => Err(MonitorError::NotBound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CountingHandler {
        calls: AtomicUsize,
    }

    impl IrqHandler for CountingHandler {
        fn handle(&self, _irq: u32) -> IrqStatus {
            self.calls.fetch_add(1, Ordering::AcqRel);
            IrqStatus::Handled
        }
    }

    fn controller() -> SimIrqController {
        SimIrqController::new(Arc::new(EventTrace::new()))
    }

    #[test]
    fn test_bind_raise_unbind() {
        let ctl = controller();
        let handler = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });

        let status = ctl
            .bind(174, Arc::clone(&handler) as Arc<dyn IrqHandler>, TriggerMask::BOTH, "test")
            .unwrap();
        assert_eq!(status, 0);
        assert!(ctl.is_bound(174));
        assert_eq!(ctl.bound_label().as_deref(), Some("test"));

        assert_eq!(ctl.raise(174), Ok(IrqStatus::Handled));
        assert_eq!(handler.calls.load(Ordering::Acquire), 1);

        ctl.unbind(174).unwrap();
        assert_eq!(ctl.raise(174), Err(MonitorError::NotBound));
    }

    #[test]
    fn test_double_bind_rejected() {
        let ctl = controller();
        let handler: Arc<dyn IrqHandler> = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });
        ctl.bind(174, Arc::clone(&handler), TriggerMask::BOTH, "a").unwrap();
        assert_eq!(
            ctl.bind(174, handler, TriggerMask::BOTH, "b"),
            Err(MonitorError::AlreadyBound)
        );
    }

    #[test]
    fn test_unbind_wrong_irq() {
        let ctl = controller();
        assert_eq!(ctl.unbind(174), Err(MonitorError::NotBound));
    }

    #[test]
    fn test_bind_failure_injection() {
        let ctl = controller();
        ctl.inject_bind_failure(true);
        let handler: Arc<dyn IrqHandler> = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });
        assert_eq!(
            ctl.bind(174, handler, TriggerMask::BOTH, "x"),
            Err(MonitorError::IrqBind(-16))
        );
        assert_eq!(ctl.binds(), 0);
        assert!(!ctl.is_bound(174));
    }

    #[test]
    fn test_concurrent_raises_serialized_not_lost() {
        let ctl = Arc::new(controller());
        let handler = Arc::new(CountingHandler { calls: AtomicUsize::new(0) });
        ctl.bind(174, Arc::clone(&handler) as Arc<dyn IrqHandler>, TriggerMask::BOTH, "t")
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ctl = Arc::clone(&ctl);
            handles.push(std::thread::spawn(move || {
                for _ in 0..250 {
                    ctl.raise(174).unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(handler.calls.load(Ordering::Acquire), 2000);
        assert_eq!(ctl.raises(), 2000);
    }
}
