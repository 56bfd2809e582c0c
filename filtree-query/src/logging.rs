//! Logging bootstrap for filtree.
//!
//! The library itself only emits `tracing` events. This module installs a
//! subscriber for applications that do not bring their own, and is
//! controlled either by the environment or by the `[logging]` table of
//! `filtree.toml`.
//!
//! # Environment Variables
//!
//! - `FILTREE_DEBUG=true|1|yes` - Enable debug logging
//! - `FILTREE_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `FILTREE_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use filtree_query::logging;
//!
//! // Call once at startup; later calls are no-ops.
//! logging::init();
//! ```
//!
//! The subscriber is only installed with the `tracing-subscriber` feature.
//! Without it, `init` does nothing and events go to whatever subscriber
//! the host application sets up.

use std::env;
use std::sync::Once;

use filtree_schema::config::LoggingConfig;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "FILTREE_DEBUG";
const LEVEL_VAR: &str = "FILTREE_LOG_LEVEL";
const FORMAT_VAR: &str = "FILTREE_LOG_FORMAT";

/// Check if `FILTREE_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn resolve_level(requested: Option<&str>, debug: bool) -> &'static str {
    match requested.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ if debug => "debug",
        _ => "warn",
    }
}

fn resolve_format(requested: Option<&str>) -> &'static str {
    match requested.map(str::to_lowercase).as_deref() {
        Some("pretty") => "pretty",
        Some("compact") => "compact",
        _ => "json",
    }
}

/// The level from `FILTREE_LOG_LEVEL`.
///
/// Defaults to "debug" when `FILTREE_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    resolve_level(env::var(LEVEL_VAR).ok().as_deref(), is_debug_enabled())
}

/// The format from `FILTREE_LOG_FORMAT`, defaulting to "json".
pub fn get_log_format() -> &'static str {
    resolve_format(env::var(FORMAT_VAR).ok().as_deref())
}

/// Initialize logging from the environment.
///
/// Nothing is installed unless `FILTREE_DEBUG` or `FILTREE_LOG_LEVEL` is set.
pub fn init() {
    if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
        return;
    }
    install(get_log_level(), get_log_format());
}

/// Initialize logging from the `[logging]` table.
///
/// Environment variables win over the file so a deployment can raise the
/// level without editing it.
pub fn init_from_config(config: &LoggingConfig) {
    let level = match env::var(LEVEL_VAR) {
        Ok(level) => resolve_level(Some(&level), is_debug_enabled()),
        Err(_) => resolve_level(config.level.as_deref(), is_debug_enabled()),
    };
    let format = match env::var(FORMAT_VAR) {
        Ok(format) => resolve_format(Some(&format)),
        Err(_) => config.format.as_str(),
    };
    install(level, format);
}

/// Initialize logging with a specific level.
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_with_level(level: &str) {
    // SAFETY: Only called at program startup before threads are spawned.
    unsafe {
        env::set_var(LEVEL_VAR, level);
    }
    init();
}

/// Initialize debug logging. Equivalent to `FILTREE_DEBUG=true` plus [`init`].
///
/// # Safety
///
/// This function modifies environment variables, which is unsafe in
/// multi-threaded programs. Call this early in your program before
/// spawning threads.
pub fn init_debug() {
    // SAFETY: Only called at program startup before threads are spawned.
    unsafe {
        env::set_var(DEBUG_VAR, "true");
    }
    init();
}

#[cfg_attr(not(feature = "tracing-subscriber"), allow(unused_variables))]
fn install(level: &'static str, format: &'static str) {
    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!(
                "filtree={level},filtree_query={level},filtree_schema={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match format {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(level, format, "filtree logging initialized");
        }
    });
}
