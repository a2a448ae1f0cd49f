//! `MemRegistry` — default `AttrRegistry` implementation.
//!
//! An in-memory model of a sysfs-like attribute tree: named groups, each
//! holding named attributes. The registry owns mode enforcement - a write
//! to a read-only attribute is rejected here, before the attribute ever
//! sees it. Reads and writes from any number of threads are fine; the
//! group map is behind an RwLock and the attributes themselves are
//! synchronized by the shared monitor state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use gpiomon_core::attr::{AttrMode, Attribute};
use gpiomon_core::error::{MonitorError, MonitorResult};
use gpiomon_core::traits::AttrRegistry;

use crate::trace::{BoardEvent, EventTrace};

pub struct MemRegistry {
    groups: RwLock<HashMap<String, Vec<Arc<dyn Attribute>>>>,

    creates: AtomicUsize,
    removes: AtomicUsize,

    fail_create: AtomicBool,

    trace: Arc<EventTrace>,
}

impl MemRegistry {
    pub fn new(trace: Arc<EventTrace>) -> Self {
        MemRegistry {
            groups: RwLock::new(HashMap::new()),
            creates: AtomicUsize::new(0),
            removes: AtomicUsize::new(0),
            fail_create: AtomicBool::new(false),
            trace,
        }
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.read().contains_key(name)
    }

    /// Attribute names exposed under `group`, in registration order.
    pub fn attr_names(&self, group: &str) -> MonitorResult<Vec<&'static str>> {
        let groups = self.groups.read();
        let attrs = groups.get(group).ok_or(MonitorError::NoSuchGroup)?;
        Ok(attrs.iter().map(|a| a.name()).collect())
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::Acquire)
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::Acquire)
    }

    pub fn inject_create_failure(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::Release);
    }

    fn with_attr<T>(
        &self,
        group: &str,
        attr: &str,
        f: impl FnOnce(&Arc<dyn Attribute>) -> MonitorResult<T>,
    ) -> MonitorResult<T> {
        let groups = self.groups.read();
        let attrs = groups.get(group).ok_or(MonitorError::NoSuchGroup)?;
        let attr = attrs
            .iter()
            .find(|a| a.name() == attr)
            .ok_or(MonitorError::NoSuchAttribute)?;
        f(attr)
    }
}

impl AttrRegistry for MemRegistry {
    fn create_group(&self, name: &str, attrs: Vec<Arc<dyn Attribute>>) -> MonitorResult<()> {
        if self.fail_create.load(Ordering::Acquire) {
            return Err(MonitorError::GroupCreate);
        }
        let mut groups = self.groups.write();
        if groups.contains_key(name) {
            return Err(MonitorError::GroupExists);
        }
        groups.insert(name.to_string(), attrs);
        self.creates.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::GroupCreated(name.to_string()));
        Ok(())
    }

    fn remove_group(&self, name: &str) -> MonitorResult<()> {
        let mut groups = self.groups.write();
        if groups.remove(name).is_none() {
            return Err(MonitorError::NoSuchGroup);
        }
        self.removes.fetch_add(1, Ordering::AcqRel);
        self.trace.record(BoardEvent::GroupRemoved(name.to_string()));
        Ok(())
    }

    fn read(&self, group: &str, attr: &str) -> MonitorResult<String> {
        self.with_attr(group, attr, |a| Ok(a.show()))
    }

    fn write(&self, group: &str, attr: &str, buf: &str) -> MonitorResult<usize> {
        self.with_attr(group, attr, |a| {
            if a.mode() == AttrMode::ReadOnly {
                return Err(MonitorError::PermissionDenied);
            }
            a.store(buf)
        })
    }
}
