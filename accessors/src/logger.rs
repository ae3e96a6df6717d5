use crate::config::{LogLevel, RegistryConfig};
use chrono::Local;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

const UNSET: u8 = u8::MAX;
static MAX_LEVEL: AtomicU8 = AtomicU8::new(UNSET);

pub fn max_level() -> LogLevel {
    match MAX_LEVEL.load(Ordering::Relaxed) {
        UNSET => {
            // reading the environment may itself warn, so a threshold must be in place first
            MAX_LEVEL.store(LogLevel::default() as u8, Ordering::Relaxed);
            let level = RegistryConfig::from_env().log;
            MAX_LEVEL.store(level as u8, Ordering::Relaxed);
            level
        }
        raw => LogLevel::from_u8(raw),
    }
}

pub fn set_max_level(level: LogLevel) {
    MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= max_level()
}

fn log(level: LogLevel, label: &str, args: fmt::Arguments) {
    if enabled(level) {
        let now = Local::now();
        eprintln!("[{}] {} {}", now.format("%Y-%m-%d %H:%M:%S"), label, args);
    }
}

pub fn debug(args: fmt::Arguments) {
    log(LogLevel::Debug, "DEBUG", args)
}

pub fn info(args: fmt::Arguments) {
    log(LogLevel::Info, "INFO", args)
}

pub fn warn(args: fmt::Arguments) {
    log(LogLevel::Warn, "WARN", args)
}

pub fn error(args: fmt::Arguments) {
    log(LogLevel::Error, "ERROR", args)
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logger::debug(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::info(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::warn(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::error(format_args!($($arg)*))
    };
}
