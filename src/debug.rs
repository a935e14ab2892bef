//! The debug ledger facade: ids, formatting, storage and the view surface
//! wired together. Collaborators only ever talk to [`DebugConsole`].

use chrono::Local;
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::format::{build_node, format_endpoint, format_timestamp};
use crate::ledger::{ExportedRecord, IdGenerator, Ledger, MessageRecord, DEFAULT_MAX_MESSAGES};
use crate::view::{SidebarState, SignalSurface, ViewSurface};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Element id of the list container.
    pub container_id: String,
    pub max_messages: usize,
    /// Start with the sidebar collapsed.
    pub auto_collapse: bool,
    pub show_timestamp: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            container_id: "debugList".to_string(),
            max_messages: DEFAULT_MAX_MESSAGES,
            auto_collapse: false,
            show_timestamp: true,
        }
    }
}

/// Error payload recorded by [`DebugSystem::record_error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl From<&str> for ErrorReport {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorReport {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

pub struct DebugSystem<S: ViewSurface> {
    config: DebugConfig,
    ledger: Ledger<S::Handle>,
    ids: IdGenerator,
    surface: S,
    sidebar: SidebarState,
    initialized: bool,
}

impl<S: ViewSurface> DebugSystem<S> {
    pub fn new(config: DebugConfig, surface: S) -> Self {
        let sidebar = SidebarState::initial(config.auto_collapse);
        Self {
            ledger: Ledger::new(config.max_messages),
            ids: IdGenerator::new(),
            config,
            surface,
            sidebar,
            initialized: false,
        }
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn sidebar(&self) -> SidebarState {
        self.sidebar
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bind to the surface. Safe to call repeatedly; returns whether the
    /// container is available.
    pub fn init(&mut self) -> bool {
        if self.initialized && self.surface.is_attached() {
            return true;
        }
        if !self.surface.is_attached() {
            warn!(
                "Debug container not found - element #{} is not mounted",
                self.config.container_id
            );
            return false;
        }
        self.surface.show_sidebar(self.sidebar.is_expanded());
        self.surface.refresh_badge(self.ledger.len());
        self.initialized = true;
        info!("Debug system initialized");
        true
    }

    /// Log one event. Returns the record id, or `None` when the container is
    /// still missing after one re-initialization attempt (nothing is stored).
    pub fn record(&mut self, endpoint: &str, payload: Value, explicit_id: Option<&str>) -> Option<String> {
        if !self.surface.is_attached() && !self.init() {
            error!("Debug container still missing, dropping record for {}", endpoint);
            return None;
        }

        let id = match explicit_id {
            Some(id) => id.to_string(),
            None => self.ids.next(),
        };
        let endpoint = format_endpoint(endpoint);
        let timestamp = format_timestamp(Local::now());

        let node = build_node(&id, &endpoint, &payload, &timestamp, self.config.show_timestamp);
        let handle = self.surface.mount(node);
        let displaced = self.ledger.insert(MessageRecord {
            id: id.clone(),
            endpoint,
            payload,
            timestamp,
            handle,
        });
        for record in displaced {
            debug!("Retiring debug record {}", record.id);
            self.retire(record);
        }
        self.surface.refresh_badge(self.ledger.len());
        Some(id)
    }

    pub fn record_request<T: Serialize>(&mut self, endpoint: &str, params: &T) -> Option<String> {
        self.record(endpoint, to_payload(params), None)
    }

    pub fn record_response<T: Serialize>(&mut self, endpoint: &str, body: &T) -> Option<String> {
        self.record(&format!("{} (Response)", endpoint), to_payload(body), None)
    }

    pub fn record_error(&mut self, endpoint: &str, error: &ErrorReport) -> Option<String> {
        self.record(&format!("{} (Error)", endpoint), to_payload(error), None)
    }

    /// Form submissions are keyed by form id, so a resubmission replaces the
    /// previous entry.
    pub fn record_form<K, V, I>(&mut self, form_id: &str, fields: I) -> Option<String>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let payload: Map<String, Value> = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let id = format!("form-{}", form_id);
        self.record(&format!("Form: {}", form_id), Value::Object(payload), Some(&id))
    }

    /// Remove one record. Returns false (and does nothing) for unknown ids.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ledger.remove(id) {
            Some(record) => {
                self.retire(record);
                self.surface.refresh_badge(self.ledger.len());
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for record in self.ledger.clear() {
            self.retire(record);
        }
        self.surface.refresh_badge(0);
    }

    pub fn count(&self) -> usize {
        self.ledger.len()
    }

    pub fn export(&self) -> Vec<ExportedRecord> {
        self.ledger.export()
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.ledger.export())
    }

    pub fn open(&mut self) {
        self.sidebar = SidebarState::Expanded;
        self.surface.show_sidebar(true);
    }

    pub fn close(&mut self) {
        self.sidebar = SidebarState::Collapsed;
        self.surface.show_sidebar(false);
    }

    pub fn toggle(&mut self) {
        match self.sidebar {
            SidebarState::Collapsed => self.open(),
            SidebarState::Expanded => self.close(),
        }
    }

    // Shared exit path for removed, overwritten, evicted and cleared records.
    fn retire(&mut self, record: MessageRecord<S::Handle>) {
        self.surface.unmount(&record.handle);
    }
}

fn to_payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| Value::String(format!("<unserializable payload: {}>", e)))
}

/// Copyable handle to the page's debug system, passed to collaborators as a
/// prop.
#[derive(Clone, Copy, PartialEq)]
pub struct DebugConsole {
    system: Signal<DebugSystem<SignalSurface>>,
    surface: SignalSurface,
}

/// Create the page's debug system. Call once, from the root component.
pub fn use_debug_console(config: DebugConfig) -> DebugConsole {
    let surface = use_hook(SignalSurface::new);
    let system = use_signal(move || DebugSystem::new(config, surface));
    DebugConsole { system, surface }
}

impl DebugConsole {
    pub fn surface(&self) -> SignalSurface {
        self.surface
    }

    pub fn container_id(&self) -> String {
        self.system.peek().config().container_id.clone()
    }

    pub fn init(&self) -> bool {
        let mut system = self.system;
        system.write().init()
    }

    pub fn record(&self, endpoint: &str, payload: Value, explicit_id: Option<&str>) -> Option<String> {
        let mut system = self.system;
        system.write().record(endpoint, payload, explicit_id)
    }

    pub fn record_request<T: Serialize>(&self, endpoint: &str, params: &T) -> Option<String> {
        let mut system = self.system;
        system.write().record_request(endpoint, params)
    }

    pub fn record_response<T: Serialize>(&self, endpoint: &str, body: &T) -> Option<String> {
        let mut system = self.system;
        system.write().record_response(endpoint, body)
    }

    pub fn record_error(&self, endpoint: &str, error: &ErrorReport) -> Option<String> {
        let mut system = self.system;
        system.write().record_error(endpoint, error)
    }

    pub fn record_form<K, V, I>(&self, form_id: &str, fields: I) -> Option<String>
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut system = self.system;
        system.write().record_form(form_id, fields)
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut system = self.system;
        system.write().remove(id)
    }

    pub fn clear(&self) {
        let mut system = self.system;
        system.write().clear();
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.system.peek().export_json()
    }

    pub fn open(&self) {
        let mut system = self.system;
        system.write().open();
    }

    pub fn close(&self) {
        let mut system = self.system;
        system.write().close();
    }

    pub fn toggle(&self) {
        let mut system = self.system;
        system.write().toggle();
    }
}
