#![allow(dead_code)]

pub mod deposits;
pub mod reference_backend;

use std::sync::Arc;

use slog::{Drain, Logger};

pub fn logger_for_tests() -> Logger {
    let decorator = slog_term::PlainDecorator::new(slog_term::TestStdoutWriter);
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(Arc::new(drain), slog::o!())
}
