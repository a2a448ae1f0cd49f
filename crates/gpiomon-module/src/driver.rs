//! `ButtonDriver` — the compositor that wires all traits together.
//!
//! This is the dependency injection point: the line, the interrupt
//! dispatch, and the attribute registry all arrive as trait handles.
//! `load()` runs the acquisition state machine; any failure rolls back
//! everything acquired so far, in reverse order, before surfacing the
//! error. `unload()` is the mirror image and is best-effort: every
//! release step runs even if an earlier one reports failure, because a
//! resource left bound after its siblings are gone is worse than a
//! redundant release.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use gpiomon_core::attr::button_attrs;
use gpiomon_core::constants::{DEFAULT_IRQ_LABEL, DEFAULT_LINE};
use gpiomon_core::env::env_get;
use gpiomon_core::error::{MonitorError, MonitorResult};
use gpiomon_core::irq::ButtonIrqHandler;
use gpiomon_core::state::{LifecycleState, MonitorState};
use gpiomon_core::traits::{AttrRegistry, GpioLine, IrqDispatch, IrqHandler, TriggerMask};
use gpiomon_core::{kerror, kinfo, kwarn};

/// Driver configuration: which line to watch and how to name things.
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    /// Line number of the monitored input.
    pub line: u32,
    /// Attribute group name, conventionally named after the line.
    pub group: String,
    /// Label handed to the interrupt dispatch at bind time.
    pub label: String,
}

impl ButtonConfig {
    pub fn for_line(line: u32) -> Self {
        ButtonConfig {
            line,
            group: format!("gpio{}", line),
            label: DEFAULT_IRQ_LABEL.to_string(),
        }
    }

    /// Configuration from the environment: `GPM_LINE` overrides the line.
    pub fn from_env() -> Self {
        Self::for_line(env_get("GPM_LINE", DEFAULT_LINE))
    }
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self::for_line(DEFAULT_LINE)
    }
}

/// The fully-wired button monitor.
///
/// Owns the shared state and the collaborator handles. Created unloaded;
/// `load()` brings it to `Running`, `unload()` (or `Drop`) takes it back.
pub struct ButtonDriver {
    config: ButtonConfig,
    line_io: Arc<dyn GpioLine>,
    dispatch: Arc<dyn IrqDispatch>,
    registry: Arc<dyn AttrRegistry>,
    state: Arc<MonitorState>,
    lifecycle: AtomicU8,
}

impl ButtonDriver {
    pub fn new(
        config: ButtonConfig,
        line_io: Arc<dyn GpioLine>,
        dispatch: Arc<dyn IrqDispatch>,
        registry: Arc<dyn AttrRegistry>,
    ) -> Self {
        ButtonDriver {
            config,
            line_io,
            dispatch,
            registry,
            state: Arc::new(MonitorState::new()),
            lifecycle: AtomicU8::new(LifecycleState::Unloaded as u8),
        }
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Shared state handle; attribute implementations hold clones of it.
    pub fn state(&self) -> &Arc<MonitorState> {
        &self.state
    }

    pub fn lifecycle(&self) -> LifecycleState {
        LifecycleState::from(self.lifecycle.load(Ordering::Acquire))
    }

    fn set_lifecycle(&self, state: LifecycleState) {
        self.lifecycle.store(state as u8, Ordering::Release);
    }

    /// Acquire everything, in order: attribute group, line, interrupt.
    ///
    /// On success the driver is `Running` and the returned value is the
    /// dispatch collaborator's bind status code (0 in practice) - the
    /// loader sees exactly what the bind step reported. On failure every
    /// resource acquired so far has been released, in reverse order, and
    /// the driver is back to `Unloaded`.
    pub fn load(&self) -> MonitorResult<i32> {
        if self
            .lifecycle
            .compare_exchange(
                LifecycleState::Unloaded as u8,
                LifecycleState::RegisteringGroup as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(MonitorError::AlreadyLoaded);
        }

        kinfo!("gpiomon: loading, line {}", self.config.line);

        // 1. Attribute group first; nothing to undo on failure.
        if let Err(e) = self
            .registry
            .create_group(&self.config.group, button_attrs(&self.state))
        {
            kerror!("gpiomon: failed to create attribute group: {}", e);
            self.set_lifecycle(LifecycleState::Unloaded);
            return Err(e);
        }

        // 2. The line: claim, configure as input, export.
        self.set_lifecycle(LifecycleState::AcquiringLine);
        if let Err(e) = self.acquire_line() {
            kerror!("gpiomon: failed to acquire line {}: {}", self.config.line, e);
            self.remove_group_quietly();
            self.set_lifecycle(LifecycleState::Unloaded);
            return Err(e);
        }

        // 3. Initial snapshot, irq resolution, handler bind.
        self.set_lifecycle(LifecycleState::BindingIrq);
        let level = self.line_io.read_level(self.config.line);
        self.state.set_level(level);
        kinfo!("gpiomon: button value is currently {}", level);

        let irq = match self.line_io.to_irq(self.config.line) {
            Ok(irq) => irq,
            Err(e) => {
                kerror!("gpiomon: failed to resolve irq for line {}: {}", self.config.line, e);
                self.release_line_quietly();
                self.remove_group_quietly();
                self.state.reset();
                self.set_lifecycle(LifecycleState::Unloaded);
                return Err(e);
            }
        };
        self.state.set_irq(irq);
        kinfo!("gpiomon: button mapped to IRQ {}", irq);

        let handler: Arc<dyn IrqHandler> = Arc::new(ButtonIrqHandler::new(
            Arc::clone(&self.state),
            Arc::clone(&self.line_io),
            self.config.line,
        ));
        let status = match self
            .dispatch
            .bind(irq, handler, TriggerMask::BOTH, &self.config.label)
        {
            Ok(status) => status,
            Err(e) => {
                kerror!("gpiomon: IRQ bind failed: {}", e);
                self.release_line_quietly();
                self.remove_group_quietly();
                self.state.reset();
                self.set_lifecycle(LifecycleState::Unloaded);
                return Err(e);
            }
        };

        self.set_lifecycle(LifecycleState::Running);
        kinfo!("gpiomon: IRQ request status is {}", status);
        Ok(status)
    }

    /// Release everything, in strict reverse order of acquisition:
    /// unbind the interrupt, unexport the line, release the line, remove
    /// the attribute group. Best-effort: failures are logged and the
    /// sequence continues.
    pub fn unload(&self) {
        if !self.lifecycle().holds_resources() {
            return;
        }
        kinfo!("gpiomon: pressed {} times", self.state.presses());

        // Detach the handler first so no further state writes can race
        // with the releases below.
        let irq = self.state.irq();
        if irq != 0 {
            if let Err(e) = self.dispatch.unbind(irq) {
                kwarn!("gpiomon: unbind of IRQ {} failed: {}", irq, e);
            }
        }

        self.release_line_quietly();
        self.remove_group_quietly();

        self.state.reset();
        self.set_lifecycle(LifecycleState::Unloaded);
        kinfo!("gpiomon: unloaded");
    }

    fn acquire_line(&self) -> MonitorResult<()> {
        let line = self.config.line;
        self.line_io.claim(line)?;
        if let Err(e) = self.line_io.set_input(line) {
            self.line_io.release(line);
            return Err(e);
        }
        self.line_io.export(line);
        Ok(())
    }

    fn release_line_quietly(&self) {
        self.line_io.unexport(self.config.line);
        self.line_io.release(self.config.line);
    }

    fn remove_group_quietly(&self) {
        if let Err(e) = self.registry.remove_group(&self.config.group) {
            kwarn!("gpiomon: removing group {} failed: {}", self.config.group, e);
        }
    }
}

/// Unload on drop if still running, mirroring the ordered teardown:
/// interrupt first, then the line, then the attribute group.
impl Drop for ButtonDriver {
    fn drop(&mut self) {
        if self.lifecycle().holds_resources() {
            self.unload();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SimBoard;
    use gpiomon_core::error::MonitorError;

    fn driver_on(board: &SimBoard) -> ButtonDriver {
        gpiomon_core::kprint::set_log_level(gpiomon_core::kprint::LogLevel::Off);
        ButtonDriver::new(
            ButtonConfig::for_line(board.line_id()),
            board.line_io(),
            Arc::clone(&board.irq_ctl) as Arc<dyn IrqDispatch>,
            Arc::clone(&board.registry) as Arc<dyn AttrRegistry>,
        )
    }

    #[test]
    fn test_load_reaches_running() {
        let board = SimBoard::new();
        let driver = driver_on(&board);

        assert_eq!(driver.load(), Ok(0));
        assert_eq!(driver.lifecycle(), LifecycleState::Running);
        assert!(board.registry.has_group("gpio46"));
        assert!(board.line.is_claimed());
        assert!(board.irq_ctl.is_bound(174));
        assert_eq!(driver.state().irq(), 174);
    }

    #[test]
    fn test_double_load_rejected() {
        let board = SimBoard::new();
        let driver = driver_on(&board);
        driver.load().unwrap();
        assert_eq!(driver.load(), Err(MonitorError::AlreadyLoaded));
    }

    #[test]
    fn test_unload_returns_to_unloaded() {
        let board = SimBoard::new();
        let driver = driver_on(&board);
        driver.load().unwrap();
        driver.unload();

        assert_eq!(driver.lifecycle(), LifecycleState::Unloaded);
        assert!(!board.registry.has_group("gpio46"));
        assert!(!board.line.is_claimed());
        assert!(!board.irq_ctl.is_bound(174));
        assert_eq!(driver.state().irq(), 0);
    }

    #[test]
    fn test_unload_without_load_is_quiet() {
        let board = SimBoard::new();
        let driver = driver_on(&board);
        driver.unload();
        assert_eq!(board.line.releases(), 0);
        assert_eq!(board.registry.removes(), 0);
    }

    #[test]
    fn test_drop_unloads() {
        let board = SimBoard::new();
        {
            let driver = driver_on(&board);
            driver.load().unwrap();
        }
        assert!(!board.line.is_claimed());
        assert!(!board.irq_ctl.is_bound(174));
        assert_eq!(board.registry.removes(), 1);
    }

    #[test]
    fn test_config_group_named_after_line() {
        let cfg = ButtonConfig::for_line(60);
        assert_eq!(cfg.group, "gpio60");
        assert_eq!(ButtonConfig::default().line, DEFAULT_LINE);
    }
}
