//! Exported attributes
//!
//! Three attributes are registered as one group: `count` (rw),
//! `interrupt_id` (ro), and `line_level` (ro). Every show renders the
//! backing field as ASCII decimal with a trailing newline; the only
//! store path parses a leading decimal token and overwrites the press
//! count with it.
//!
//! Mode enforcement is the registry's job, not the attribute's; the
//! default `store` rejects writes so read-only attributes need not
//! implement it.

use std::sync::Arc;

use crate::error::{MonitorError, MonitorResult};
use crate::state::MonitorState;

/// Access mode, enforced by the registry collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMode {
    ReadOnly,
    ReadWrite,
}

/// A named, independently readable (and possibly writable) field.
pub trait Attribute: Send + Sync {
    /// Name under the group, e.g. `count`.
    fn name(&self) -> &'static str;

    fn mode(&self) -> AttrMode;

    /// Render the current value. Decimal, trailing newline.
    fn show(&self) -> String;

    /// Accept a write payload; returns bytes consumed.
    fn store(&self, _buf: &str) -> MonitorResult<usize> {
        Err(MonitorError::PermissionDenied)
    }
}

/// Parse the leading decimal token of a write payload.
///
/// Leading ASCII whitespace is skipped; digits are consumed until the
/// first non-digit. Anything after the token is tolerated and ignored.
/// A payload with no digits at all is rejected, leaving state untouched.
fn parse_leading_u64(buf: &str) -> MonitorResult<u64> {
    let trimmed = buf.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    if end == 0 {
        return Err(MonitorError::InvalidInput);
    }
    trimmed[..end].parse::<u64>().map_err(|_| MonitorError::InvalidInput)
}

/// `count` — the press counter, readable and writable.
pub struct CountAttr {
    state: Arc<MonitorState>,
}

impl CountAttr {
    pub fn new(state: Arc<MonitorState>) -> Self {
        CountAttr { state }
    }
}

impl Attribute for CountAttr {
    fn name(&self) -> &'static str {
        "count"
    }

    fn mode(&self) -> AttrMode {
        AttrMode::ReadWrite
    }

    fn show(&self) -> String {
        format!("{}\n", self.state.presses())
    }

    fn store(&self, buf: &str) -> MonitorResult<usize> {
        let value = parse_leading_u64(buf)?;
        self.state.set_presses(value);
        Ok(buf.len())
    }
}

/// `interrupt_id` — the bound interrupt identifier, read-only.
pub struct IrqNumberAttr {
    state: Arc<MonitorState>,
}

impl IrqNumberAttr {
    pub fn new(state: Arc<MonitorState>) -> Self {
        IrqNumberAttr { state }
    }
}

impl Attribute for IrqNumberAttr {
    fn name(&self) -> &'static str {
        "interrupt_id"
    }

    fn mode(&self) -> AttrMode {
        AttrMode::ReadOnly
    }

    fn show(&self) -> String {
        format!("{}\n", self.state.irq())
    }
}

/// `line_level` — last observed level, read-only.
pub struct LineLevelAttr {
    state: Arc<MonitorState>,
}

impl LineLevelAttr {
    pub fn new(state: Arc<MonitorState>) -> Self {
        LineLevelAttr { state }
    }
}

impl Attribute for LineLevelAttr {
    fn name(&self) -> &'static str {
        "line_level"
    }

    fn mode(&self) -> AttrMode {
        AttrMode::ReadOnly
    }

    fn show(&self) -> String {
        format!("{}\n", self.state.level())
    }
}

/// Build the full attribute set backed by `state`, in registration order.
pub fn button_attrs(state: &Arc<MonitorState>) -> Vec<Arc<dyn Attribute>> {
    vec![
        Arc::new(CountAttr::new(Arc::clone(state))),
        Arc::new(IrqNumberAttr::new(Arc::clone(state))),
        Arc::new(LineLevelAttr::new(Arc::clone(state))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<MonitorState> {
        Arc::new(MonitorState::new())
    }

    #[test]
    fn test_show_renders_decimal_newline() {
        let s = state();
        s.set_presses(42);
        s.set_irq(174);
        s.set_level(1);

        assert_eq!(CountAttr::new(Arc::clone(&s)).show(), "42\n");
        assert_eq!(IrqNumberAttr::new(Arc::clone(&s)).show(), "174\n");
        assert_eq!(LineLevelAttr::new(Arc::clone(&s)).show(), "1\n");
    }

    #[test]
    fn test_count_store_then_show() {
        let s = state();
        let count = CountAttr::new(Arc::clone(&s));
        assert_eq!(count.store("42"), Ok(2));
        assert_eq!(count.show(), "42\n");
    }

    #[test]
    fn test_count_store_consumes_whole_payload() {
        let s = state();
        let count = CountAttr::new(Arc::clone(&s));
        // trailing garbage after the token is tolerated
        assert_eq!(count.store("17 apples\n"), Ok(10));
        assert_eq!(s.presses(), 17);
    }

    #[test]
    fn test_count_store_leading_whitespace() {
        let s = state();
        let count = CountAttr::new(Arc::clone(&s));
        assert_eq!(count.store("  9\n"), Ok(4));
        assert_eq!(s.presses(), 9);
    }

    #[test]
    fn test_malformed_store_is_noop() {
        let s = state();
        s.set_presses(5);
        let count = CountAttr::new(Arc::clone(&s));
        assert_eq!(count.store("nope"), Err(MonitorError::InvalidInput));
        assert_eq!(count.store(""), Err(MonitorError::InvalidInput));
        assert_eq!(count.store("-3"), Err(MonitorError::InvalidInput));
        assert_eq!(s.presses(), 5);
    }

    #[test]
    fn test_readonly_attrs_reject_store() {
        let s = state();
        let irq = IrqNumberAttr::new(Arc::clone(&s));
        let level = LineLevelAttr::new(Arc::clone(&s));
        assert_eq!(irq.store("1"), Err(MonitorError::PermissionDenied));
        assert_eq!(level.store("1"), Err(MonitorError::PermissionDenied));
    }

    #[test]
    fn test_button_attrs_order_and_modes() {
        let s = state();
        let attrs = button_attrs(&s);
        let names: Vec<_> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["count", "interrupt_id", "line_level"]);
        assert_eq!(attrs[0].mode(), AttrMode::ReadWrite);
        assert_eq!(attrs[1].mode(), AttrMode::ReadOnly);
        assert_eq!(attrs[2].mode(), AttrMode::ReadOnly);
    }
}
