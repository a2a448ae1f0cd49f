//! # gpiomon-core
//!
//! Core types and traits for the gpiomon interrupt-driven button monitor.
//!
//! This crate is hardware-agnostic and contains no board-specific code.
//! Concrete line/interrupt/registry implementations live in
//! `gpiomon-module`.
//!
//! ## Modules
//!
//! - `state` - shared monitor state and the driver lifecycle enum
//! - `traits` - collaborator traits (line, interrupt dispatch, registry)
//! - `irq` - the button interrupt handler
//! - `attr` - the three exported attributes (count, interrupt_id, line_level)
//! - `error` - error types
//! - `kprint` - kernel-style debug printing macros
//! - `env` - environment variable utilities

#![allow(dead_code)]

pub mod attr;
pub mod env;
pub mod error;
pub mod irq;
pub mod kprint;
pub mod state;
pub mod traits;

// Re-exports for convenience
pub use attr::{button_attrs, Attribute, AttrMode, CountAttr, IrqNumberAttr, LineLevelAttr};
pub use error::{MonitorError, MonitorResult};
pub use irq::{ButtonIrqHandler, IrqStatus};
pub use state::{LifecycleState, MonitorState};
pub use traits::{AttrRegistry, GpioLine, IrqDispatch, IrqHandler, TriggerMask};
pub use env::{env_get, env_get_bool};

/// Constants shared by the driver and its default board.
pub mod constants {
    /// Default monitored line (P8_16/P2.22 on the original board).
    pub const DEFAULT_LINE: u32 = 46;

    /// The logical level interpreted as "pressed" (active-low wiring).
    pub const ACTIVE_LEVEL: u8 = 0;

    /// Default attribute group name, named after the monitored line.
    pub const DEFAULT_GROUP: &str = "gpio46";

    /// Default label passed to the interrupt dispatch at bind time.
    pub const DEFAULT_IRQ_LABEL: &str = "gpiomon_handler";
}
