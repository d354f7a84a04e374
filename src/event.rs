//! Event and log callback system.
//!
//! The host registers callbacks here to hear about committed states and to
//! collect the crate's debug output. Both callbacks are process-global.

use std::sync::{Mutex, OnceLock};

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Change notification emitted whenever a new state becomes current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// A transform was applied.
    Committed {
        undos: usize,
        redos: usize,
        native: bool,
    },
    /// History moved one step back.
    Undone { undos: usize, redos: usize },
    /// History moved one step forward.
    Redone { undos: usize, redos: usize },
}

impl EditorEvent {
    /// Short event name, stable across releases.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Committed { .. } => "committed",
            Self::Undone { .. } => "undone",
            Self::Redone { .. } => "redone",
        }
    }
}

type EventCallback = Box<dyn Fn(&EditorEvent) + Send + Sync + 'static>;
type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn event_callback() -> &'static Mutex<Option<EventCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<EventCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global event callback.
pub fn set_event_callback<F>(callback: F)
where
    F: Fn(&EditorEvent) + Send + Sync + 'static,
{
    if let Ok(mut guard) = event_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

/// Remove the global event callback.
pub fn clear_event_callback() {
    if let Ok(mut guard) = event_callback().lock() {
        *guard = None;
    }
}

/// Emit an event to the registered callback.
pub fn emit_event(event: &EditorEvent) {
    if let Ok(guard) = event_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(event);
        }
    }
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    if let Ok(mut guard) = log_callback().lock() {
        *guard = Some(Box::new(callback));
    }
}

/// Emit a log event.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = EditorEvent::Committed {
            undos: 1,
            redos: 0,
            native: false,
        };
        assert_eq!(event.name(), "committed");
        assert_eq!(EditorEvent::Undone { undos: 0, redos: 1 }.name(), "undone");
        assert_eq!(EditorEvent::Redone { undos: 1, redos: 0 }.name(), "redone");
    }

    #[test]
    fn test_log_callback() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let called = Arc::new(AtomicBool::new(false));
        let called_clone = Arc::clone(&called);
        set_log_callback(move |_level, msg| {
            if msg == "log callback check" {
                called_clone.store(true, Ordering::SeqCst);
            }
        });
        emit_log(LogLevel::Info, "log callback check");
        assert!(called.load(Ordering::SeqCst));
    }
}
