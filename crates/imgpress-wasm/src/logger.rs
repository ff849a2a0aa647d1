//! `log` backend that writes to the browser console.

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug => console::debug_1(&line),
            Level::Trace => console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Later calls only change the level.
pub(crate) fn install(level: LevelFilter) {
    // set_logger fails if a logger is already installed; keep the first one
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Level used when the module starts: verbose in debug builds only.
pub(crate) fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

pub(crate) fn parse_level(level: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(level.trim()).ok()
}

/// Change console verbosity: "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    install(filter);
    Ok(())
}
