//! Error types for the button monitor

use core::fmt;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur while loading, running, or tearing down the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// Attribute group creation failed
    GroupCreate,

    /// Attribute group removal failed
    GroupRemove,

    /// A group with the same name is already registered
    GroupExists,

    /// Named group not found in the registry
    NoSuchGroup,

    /// Named attribute not found in the group
    NoSuchAttribute,

    /// Write attempted on a read-only attribute
    PermissionDenied,

    /// Attribute write payload had no parseable integer token
    InvalidInput,

    /// Claiming the input line failed
    LineClaim(i32),

    /// Configuring the line as an input failed
    LineDirection(i32),

    /// Resolving the line's interrupt identifier failed
    IrqResolve,

    /// Binding the interrupt handler failed
    IrqBind(i32),

    /// The interrupt identifier already has a handler bound
    AlreadyBound,

    /// No handler bound to the interrupt identifier
    NotBound,

    /// Driver is not in the Running state
    NotRunning,

    /// Driver load was attempted while already loaded
    AlreadyLoaded,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::GroupCreate => write!(f, "attribute group creation failed"),
            MonitorError::GroupRemove => write!(f, "attribute group removal failed"),
            MonitorError::GroupExists => write!(f, "attribute group already registered"),
            MonitorError::NoSuchGroup => write!(f, "no such attribute group"),
            MonitorError::NoSuchAttribute => write!(f, "no such attribute"),
            MonitorError::PermissionDenied => write!(f, "attribute is read-only"),
            MonitorError::InvalidInput => write!(f, "no integer token in write payload"),
            MonitorError::LineClaim(e) => write!(f, "line claim failed: status {}", e),
            MonitorError::LineDirection(e) => write!(f, "line direction failed: status {}", e),
            MonitorError::IrqResolve => write!(f, "interrupt identifier resolution failed"),
            MonitorError::IrqBind(e) => write!(f, "interrupt bind failed: status {}", e),
            MonitorError::AlreadyBound => write!(f, "interrupt already has a bound handler"),
            MonitorError::NotBound => write!(f, "no handler bound to interrupt"),
            MonitorError::NotRunning => write!(f, "monitor is not running"),
            MonitorError::AlreadyLoaded => write!(f, "monitor already loaded"),
        }
    }
}

impl std::error::Error for MonitorError {}

impl MonitorError {
    /// Negative status code surfaced to the loader, in the style of a
    /// kernel module init returning -errno.
    pub fn status(&self) -> i32 {
        match self {
            MonitorError::GroupCreate | MonitorError::GroupExists => -12, // ENOMEM
            MonitorError::GroupRemove => -5,                              // EIO
            MonitorError::NoSuchGroup | MonitorError::NoSuchAttribute => -2, // ENOENT
            MonitorError::PermissionDenied => -13,                        // EACCES
            MonitorError::InvalidInput => -22,                            // EINVAL
            MonitorError::LineClaim(e)
            | MonitorError::LineDirection(e)
            | MonitorError::IrqBind(e) => *e,
            MonitorError::IrqResolve => -22,
            MonitorError::AlreadyBound | MonitorError::AlreadyLoaded => -16, // EBUSY
            MonitorError::NotBound | MonitorError::NotRunning => -19,        // ENODEV
        }
    }
}
