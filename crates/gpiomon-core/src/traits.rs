//! Collaborator traits
//!
//! These traits define the seams between the driver core and whatever
//! actually owns the hardware: line I/O, interrupt dispatch, and the
//! attribute registry. Default in-process implementations live in
//! `gpiomon-module`; the driver depends only on the traits.

use std::sync::Arc;

use crate::attr::Attribute;
use crate::error::MonitorResult;
use crate::irq::IrqStatus;

/// Edge triggers a handler can be bound for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMask {
    pub rising: bool,
    pub falling: bool,
}

impl TriggerMask {
    /// Both edges; what the button monitor binds with.
    pub const BOTH: TriggerMask = TriggerMask { rising: true, falling: true };
}

/// Ownership and I/O for a single digital input line.
///
/// **Contract:**
/// - `claim` grants exclusive use; a second claim of the same line fails.
/// - `read_level` and `to_irq` are only valid between `claim` and `release`.
/// - `release` is infallible by design: teardown must be able to continue
///   past a line the hardware has already dropped.
pub trait GpioLine: Send + Sync {
    /// Take exclusive ownership of the line.
    fn claim(&self, line: u32) -> MonitorResult<()>;

    /// Configure the line as an input.
    fn set_input(&self, line: u32) -> MonitorResult<()>;

    /// Make the line externally visible.
    fn export(&self, line: u32);

    /// Remove external visibility.
    fn unexport(&self, line: u32);

    /// Read the current logical level (0 or 1).
    fn read_level(&self, line: u32) -> u8;

    /// Resolve the interrupt identifier mapped to this line.
    fn to_irq(&self, line: u32) -> MonitorResult<u32>;

    /// Give up ownership of the line.
    fn release(&self, line: u32);
}

/// The capability object invoked from interrupt context.
///
/// **Contract:**
/// - `handle()` must NEVER block or allocate; the dispatcher masks the
///   line's interrupt until it returns.
/// - The dispatcher never invokes the same irq re-entrantly, but `handle()`
///   runs concurrently with attribute reads/writes on other contexts.
pub trait IrqHandler: Send + Sync {
    /// Process one electrical transition on the bound line.
    fn handle(&self, irq: u32) -> IrqStatus;
}

/// Interrupt dispatch: binds a handler to an interrupt identifier.
pub trait IrqDispatch: Send + Sync {
    /// Bind `handler` to `irq` for the given edge triggers.
    ///
    /// Returns the dispatcher's raw status code (0 on success); the
    /// lifecycle controller surfaces this to the loader unchanged.
    fn bind(
        &self,
        irq: u32,
        handler: Arc<dyn IrqHandler>,
        triggers: TriggerMask,
        label: &str,
    ) -> MonitorResult<i32>;

    /// Detach the handler. After `unbind` returns, no further `handle()`
    /// invocation for this irq is in flight or will start.
    fn unbind(&self, irq: u32) -> MonitorResult<()>;
}

/// Attribute registry: the filesystem-like surface external readers use.
///
/// The registry, not the attribute, enforces access modes: a write to a
/// read-only attribute is rejected here and never reaches the attribute.
pub trait AttrRegistry: Send + Sync {
    /// Register a named group exposing the given attributes.
    fn create_group(&self, name: &str, attrs: Vec<Arc<dyn Attribute>>) -> MonitorResult<()>;

    /// Unregister the group and all of its attributes.
    fn remove_group(&self, name: &str) -> MonitorResult<()>;

    /// External read of `group/attr`.
    fn read(&self, group: &str, attr: &str) -> MonitorResult<String>;

    /// External write to `group/attr`; returns bytes consumed.
    fn write(&self, group: &str, attr: &str, buf: &str) -> MonitorResult<usize>;
}
