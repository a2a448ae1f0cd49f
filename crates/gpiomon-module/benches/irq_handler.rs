//! Interrupt delivery throughput: one masked handler invocation per event.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use gpiomon_core::kprint::{set_log_level, LogLevel};
use gpiomon_core::traits::{AttrRegistry, IrqDispatch};
use gpiomon_module::board::SimBoard;
use gpiomon_module::driver::{ButtonConfig, ButtonDriver};

fn bench_raise(c: &mut Criterion) {
    set_log_level(LogLevel::Off);
    let board = SimBoard::new();
    let driver = ButtonDriver::new(
        ButtonConfig::for_line(board.line_id()),
        board.line_io(),
        Arc::clone(&board.irq_ctl) as Arc<dyn IrqDispatch>,
        Arc::clone(&board.registry) as Arc<dyn AttrRegistry>,
    );
    driver.load().unwrap();
    board.line.set_level(0);

    c.bench_function("irq_raise", |b| {
        b.iter(|| board.irq_ctl.raise(board.irq_id()).unwrap())
    });

    c.bench_function("count_show", |b| {
        b.iter(|| board.registry.read("gpio46", "count").unwrap())
    });
}

criterion_group!(benches, bench_raise);
criterion_main!(benches);
