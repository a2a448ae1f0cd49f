//! # gpiomon-module — Default implementations
//!
//! This crate provides the default implementation for every gpiomon
//! collaborator trait, plus the `ButtonDriver` compositor that wires them
//! together. The defaults are in-process simulations: deterministic,
//! instrumented, and safe to drive from many threads at once, which is
//! exactly what the lifecycle and concurrency tests need.
//!
//! ## Default stack
//!
//! | Trait        | Default Impl      |
//! |--------------|-------------------|
//! | GpioLine     | SimLine           |
//! | IrqDispatch  | SimIrqController  |
//! | AttrRegistry | MemRegistry       |

pub mod board;
pub mod driver;
pub mod registry;
pub mod sim_irq;
pub mod sim_line;
pub mod trace;

pub use board::SimBoard;
pub use driver::{ButtonConfig, ButtonDriver};
pub use registry::MemRegistry;
pub use sim_irq::SimIrqController;
pub use sim_line::SimLine;
pub use trace::{BoardEvent, EventTrace};
