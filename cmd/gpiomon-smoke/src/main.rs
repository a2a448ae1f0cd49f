//! gpiomon end-to-end smoke test
//!
//! Drives the full stack against the simulated board:
//!   Part A — lifecycle: load acquires group, line, and irq in order
//!   Part B — interrupts: presses and releases update level and count
//!   Part C — attributes: reads, a count overwrite, rejected writes
//!   Part D — teardown: reverse-order release, balanced counters
//!
//! Run: ./target/release/gpiomon-smoke
//! (GPM_LINE overrides the monitored line, GPM_LOG_LEVEL the verbosity)

use std::sync::Arc;

use gpiomon_core::error::MonitorError;
use gpiomon_core::kinfo;
use gpiomon_core::state::LifecycleState;
use gpiomon_core::traits::{AttrRegistry, IrqDispatch};
use gpiomon_module::board::SimBoard;
use gpiomon_module::driver::{ButtonConfig, ButtonDriver};
use gpiomon_module::trace::BoardEvent;

// ── Test harness ──

struct TestRunner {
    total: usize,
    passed: usize,
    failed: usize,
}

const LINE: &str = "────────────────────────────────────────────────────────────";

impl TestRunner {
    fn new() -> Self {
        Self { total: 0, passed: 0, failed: 0 }
    }

    fn section(&self, name: &str) {
        println!("\n{}", LINE);
        println!("{}", name);
        println!("{}", LINE);
    }

    fn check(&mut self, name: &str, ok: bool) {
        self.total += 1;
        if ok {
            self.passed += 1;
            println!("  PASS  {}", name);
        } else {
            self.failed += 1;
            println!("  FAIL  {}", name);
        }
    }

    fn summary(&self) -> i32 {
        println!("\n{}", LINE);
        println!("{} tests, {} passed, {} failed", self.total, self.passed, self.failed);
        if self.failed == 0 {
            0
        } else {
            1
        }
    }
}

fn main() {
    gpiomon_core::kprint::init();
    let config = ButtonConfig::from_env();
    let group = config.group.clone();
    kinfo!("gpiomon-smoke: monitoring line {}", config.line);

    let board = SimBoard::with_line(config.line);
    let driver = ButtonDriver::new(
        config,
        board.line_io(),
        Arc::clone(&board.irq_ctl) as Arc<dyn IrqDispatch>,
        Arc::clone(&board.registry) as Arc<dyn AttrRegistry>,
    );

    let mut t = TestRunner::new();

    // ── Part A: lifecycle ──
    t.section("Part A — load");
    let status = driver.load();
    t.check("load returns bind status 0", status == Ok(0));
    t.check("driver running", driver.lifecycle() == LifecycleState::Running);
    t.check("group registered", board.registry.has_group(&group));
    t.check("line claimed", board.line.is_claimed());
    t.check("irq bound", board.irq_ctl.is_bound(board.irq_id()));
    t.check(
        "interrupt_id attribute non-zero",
        board.registry.read(&group, "interrupt_id").unwrap() != "0\n",
    );

    // ── Part B: interrupts ──
    t.section("Part B — interrupts");
    for _ in 0..3 {
        board.press().unwrap();
        board.release_button().unwrap();
    }
    t.check(
        "three presses counted",
        board.registry.read(&group, "count").unwrap() == "3\n",
    );
    board.edge(0).unwrap();
    t.check(
        "line_level tracks the last poll",
        board.registry.read(&group, "line_level").unwrap() == "0\n",
    );
    board.edge(1).unwrap();
    t.check(
        "line_level follows the release",
        board.registry.read(&group, "line_level").unwrap() == "1\n",
    );

    // ── Part C: attributes ──
    t.section("Part C — attributes");
    t.check(
        "count is writable",
        board.registry.write(&group, "count", "42") == Ok(2)
            && board.registry.read(&group, "count").unwrap() == "42\n",
    );
    t.check(
        "malformed count write rejected",
        board.registry.write(&group, "count", "x") == Err(MonitorError::InvalidInput),
    );
    t.check(
        "interrupt_id is read-only",
        board.registry.write(&group, "interrupt_id", "1") == Err(MonitorError::PermissionDenied),
    );

    // ── Part D: teardown ──
    t.section("Part D — unload");
    driver.unload();
    t.check("driver unloaded", driver.lifecycle() == LifecycleState::Unloaded);
    t.check("group removed", !board.registry.has_group(&group));
    t.check("line released", !board.line.is_claimed());
    t.check(
        "claims balanced",
        board.line.claims() == board.line.releases(),
    );
    let trace = board.trace();
    let ordered = match (
        trace.position(&BoardEvent::IrqUnbound(board.irq_id())),
        trace.position(&BoardEvent::LineReleased(board.line_id())),
    ) {
        (Some(unbound), Some(released)) => unbound < released,
        _ => false,
    };
    t.check("unbind happened before line release", ordered);

    std::process::exit(t.summary());
}
