//! Operator-facing error panel. Collaborator failures land here and in the
//! debug ledger.

use dioxus::prelude::*;
use serde_json::Value;

use crate::debug::{DebugConsole, ErrorReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure (request never completed).
    Connection,
    /// Backend answered with `status: "error"`.
    Api,
    /// A resource could not be loaded.
    Load,
    Other,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "Connection",
            ErrorKind::Api => "API",
            ErrorKind::Load => "Load",
            ErrorKind::Other => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: ErrorKind,
}

/// Errors in arrival order (oldest first).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorLog {
    entries: Vec<ErrorEntry>,
    counter: u64,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_error(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: ErrorKind,
        error_id: Option<&str>,
    ) -> String {
        let id = match error_id {
            Some(id) => id.to_string(),
            None => {
                self.counter += 1;
                format!("error-{}", self.counter)
            }
        };
        self.entries.retain(|e| e.id != id);
        self.entries.push(ErrorEntry {
            id: id.clone(),
            title: title.into(),
            message: message.into(),
            kind,
        });
        id
    }

    pub fn remove_error(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn handle_fetch_error(&mut self, error: &str, context: &str) -> String {
        let title = title_or(context, "Connection error");
        let message = if error.is_empty() { "Could not reach the server" } else { error };
        tracing::error!("[{}] {}", context, error);
        self.show_error(title, message, ErrorKind::Connection, None)
    }

    pub fn handle_api_error(&mut self, data: &Value, context: &str) -> String {
        let title = title_or(context, "API error");
        tracing::error!("[{}] {}", context, data);
        self.show_error(title, api_error_message(data), ErrorKind::Api, None)
    }

    pub fn handle_load_error(&mut self, resource: &str, context: &str) -> String {
        let title = title_or(context, "Load error");
        self.show_error(title, format!("Could not load: {}", resource), ErrorKind::Load, None)
    }
}

fn title_or(context: &str, fallback: &str) -> String {
    if context.is_empty() {
        fallback.to_string()
    } else {
        context.to_string()
    }
}

/// Pull a human message out of an error body: `msg`, then `message`, then
/// `error`.
pub fn api_error_message(data: &Value) -> String {
    ["msg", "message", "error"]
        .iter()
        .filter_map(|key| data.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Copyable handle collaborators use to report failures.
#[derive(Clone, Copy, PartialEq)]
pub struct ErrorReporter {
    log: Signal<ErrorLog>,
    debug: DebugConsole,
}

pub fn use_error_reporter(debug: DebugConsole) -> ErrorReporter {
    let log = use_signal(ErrorLog::new);
    ErrorReporter { log, debug }
}

impl ErrorReporter {
    pub fn log(&self) -> Signal<ErrorLog> {
        self.log
    }

    /// Transport failure for `endpoint`.
    pub fn fetch_failed(&self, endpoint: &str, context: &str, error: &str) {
        let mut log = self.log;
        log.write().handle_fetch_error(error, context);
        self.debug.record_error(endpoint, &ErrorReport::new(error));
    }

    /// Backend replied with an error body.
    pub fn api_failed(&self, endpoint: &str, context: &str, body: &Value) {
        let mut log = self.log;
        log.write().handle_api_error(body, context);
        self.debug.record_error(endpoint, &ErrorReport::new(api_error_message(body)));
    }

    pub fn load_failed(&self, resource: &str, context: &str) {
        let mut log = self.log;
        log.write().handle_load_error(resource, context);
    }

    /// Input rejected before any request was made.
    pub fn invalid_input(&self, endpoint: &str, context: &str, message: &str) {
        let mut log = self.log;
        log.write().show_error(context, message, ErrorKind::Other, None);
        self.debug.record_error(endpoint, &ErrorReport::new(message));
    }
}

#[component]
pub fn ErrorsSidebar(errors: ErrorReporter) -> Element {
    let mut log = errors.log();
    let mut collapsed = use_signal(|| true);
    let entries = log.read().entries().to_vec();
    let has_errors = !entries.is_empty();
    let sidebar_class = if collapsed() { "errors-sidebar collapsed" } else { "errors-sidebar" };

    rsx! {
        aside { id: "errorsSidebar", class: "{sidebar_class}",
            div { class: "errors-sidebar-header",
                h2 { class: "errors-title", "Errors" }
                button {
                    class: "btn-cosmic text-sm",
                    onclick: move |_| log.write().clear_all(),
                    "Clear"
                }
                button {
                    id: "sidebarToggle",
                    class: "debug-toggle",
                    onclick: move |_| collapsed.set(true),
                    "×"
                }
            }
            ul { id: "errorsList", class: "errors-list",
                for entry in entries {
                    ErrorItem { key: "{entry.id}", errors, entry: entry.clone() }
                }
            }
        }
        button {
            id: "sidebarOpenBtn",
            class: "errors-open-btn",
            display: if collapsed() && has_errors { "block" } else { "none" },
            onclick: move |_| collapsed.set(false),
            "Errors ({log.read().len()})"
        }
    }
}

#[component]
fn ErrorItem(errors: ErrorReporter, entry: ErrorEntry) -> Element {
    let id = entry.id.clone();
    let mut log = errors.log();
    rsx! {
        li { id: "{entry.id}", class: "error-item",
            p { class: "error-title", strong { "{entry.title}" } }
            p { class: "error-message text-warning-red", "{entry.message}" }
            p { class: "error-type text-stardust text-xs", "{entry.kind.label()}" }
            button {
                class: "error-close",
                onclick: move |_| {
                    log.write().remove_error(&id);
                },
                "×"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_error_ids() {
        let mut log = ErrorLog::new();
        let a = log.show_error("t", "m", ErrorKind::Other, None);
        let b = log.show_error("t", "m", ErrorKind::Other, None);
        assert_eq!(a, "error-1");
        assert_eq!(b, "error-2");
        assert_eq!(log.entries()[0].id, "error-1");
    }

    #[test]
    fn test_explicit_error_id_replaces() {
        let mut log = ErrorLog::new();
        log.show_error("first", "m", ErrorKind::Api, Some("disk"));
        log.show_error("second", "m", ErrorKind::Api, Some("disk"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].title, "second");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut log = ErrorLog::new();
        let id = log.show_error("t", "m", ErrorKind::Load, None);
        assert!(log.remove_error(&id));
        assert!(!log.remove_error(&id));
        log.show_error("t", "m", ErrorKind::Load, None);
        log.clear_all();
        assert!(log.is_empty());
    }

    #[test]
    fn test_api_error_message_precedence() {
        assert_eq!(api_error_message(&json!({"msg": "no camera", "error": "x"})), "no camera");
        assert_eq!(api_error_message(&json!({"message": "bad fps"})), "bad fps");
        assert_eq!(api_error_message(&json!({"error": "boom"})), "boom");
        assert_eq!(api_error_message(&json!({"status": "error"})), "Unknown error");
        assert_eq!(api_error_message(&json!({"msg": ""})), "Unknown error");
    }

    #[test]
    fn test_handlers_fill_titles_and_kinds() {
        let mut log = ErrorLog::new();
        log.handle_fetch_error("", "");
        log.handle_api_error(&json!({"status": "error", "msg": "busy"}), "Start timelapse");
        log.handle_load_error("/stream", "Preview");

        let entries = log.entries();
        assert_eq!(entries[0].title, "Connection error");
        assert_eq!(entries[0].message, "Could not reach the server");
        assert_eq!(entries[0].kind, ErrorKind::Connection);
        assert_eq!(entries[1].title, "Start timelapse");
        assert_eq!(entries[1].message, "busy");
        assert_eq!(entries[2].message, "Could not load: /stream");
        assert_eq!(entries[2].kind.label(), "Load");
    }

    #[test]
    fn test_start_error_reply_becomes_api_entry() {
        let resp: crate::model::StartResponse =
            serde_json::from_str(r#"{"status":"error","msg":"camera busy"}"#).unwrap();
        assert!(!resp.accepted());

        let mut log = ErrorLog::new();
        let body = serde_json::to_value(&resp).unwrap();
        log.handle_api_error(&body, "Start timelapse");
        assert_eq!(log.entries()[0].kind, ErrorKind::Api);
        assert_eq!(log.entries()[0].message, "camera busy");
    }
}
