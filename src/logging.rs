//! Structured `event=<name> k=v` logging for selection events.

use std::fmt;

use log::Level;

/// Single logging target for the crate.
pub(crate) const LOG_TARGET: &str = "selectable";

/// Names the sub-selector an event came from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LogContext {
    accessor: &'static str,
}

impl LogContext {
    pub(crate) const fn new(accessor: &'static str) -> Self {
        Self { accessor }
    }

    fn accessor(self) -> Option<&'static str> {
        (!self.accessor.is_empty()).then_some(self.accessor)
    }
}

pub(crate) const TEXT_LOG_CTX: LogContext = LogContext::new("str");

pub(crate) const TEMPORAL_LOG_CTX: LogContext = LogContext::new("dt");

pub(crate) fn enabled(level: Level) -> bool {
    log::log_enabled!(target: LOG_TARGET, level)
}

pub(crate) fn emit(level: Level, event: &str, ctx: Option<LogContext>, fields: fmt::Arguments<'_>) {
    match ctx.and_then(LogContext::accessor) {
        Some(accessor) => log::log!(
            target: LOG_TARGET,
            level,
            "event={event} accessor={accessor} {fields}"
        ),
        None => log::log!(target: LOG_TARGET, level, "event={event} {fields}"),
    }
}

/// Logs `event=<name>` followed by formatted fields, only when `level` is enabled
/// for the crate target.
macro_rules! select_log {
    ($level:expr, ctx: $ctx:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        let level = $level;
        if crate::logging::enabled(level) {
            crate::logging::emit(level, $event, Some($ctx), format_args!($fmt $(, $args)*));
        }
    }};
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        let level = $level;
        if crate::logging::enabled(level) {
            crate::logging::emit(level, $event, None, format_args!($fmt $(, $args)*));
        }
    }};
}

pub(crate) use select_log;
