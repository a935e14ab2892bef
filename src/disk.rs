//! Collapsible disk-space panel. Polls the backend while expanded.

use std::time::Duration;

use dioxus::prelude::*;
use serde_json::json;

use crate::api::get_disk_space;
use crate::debug::DebugConsole;
use crate::errors::ErrorReporter;
use crate::model::{is_ok, DiskSpace};
use crate::timer;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
const DISK_ENDPOINT: &str = "/disk_space";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskLevel {
    Normal,
    Warning,
    Danger,
}

impl DiskLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            DiskLevel::Danger
        } else if percent >= 75.0 {
            DiskLevel::Warning
        } else {
            DiskLevel::Normal
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            DiskLevel::Normal => "disk-progress-fill",
            DiskLevel::Warning => "disk-progress-fill warning",
            DiskLevel::Danger => "disk-progress-fill danger",
        }
    }
}

/// Text and bar state shown in the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskView {
    pub total: String,
    pub used: String,
    pub free: String,
    pub percent_text: String,
    pub fill_percent: f64,
    pub level: DiskLevel,
}

impl DiskView {
    pub fn from_space(space: &DiskSpace) -> Self {
        let percent = space.percent_used.clamp(0.0, 100.0);
        Self {
            total: format!("{} GB", space.total_gb),
            used: format!("{} GB", space.used_gb),
            free: format!("{} GB", space.free_gb),
            percent_text: format!("{}%", space.percent_used),
            fill_percent: percent,
            level: DiskLevel::from_percent(space.percent_used),
        }
    }

    pub fn error() -> Self {
        Self {
            total: "Error".to_string(),
            used: "Error".to_string(),
            free: "Error".to_string(),
            percent_text: "--".to_string(),
            fill_percent: 0.0,
            level: DiskLevel::Normal,
        }
    }
}

async fn load_disk_space(debug: DebugConsole, errors: ErrorReporter, mut view: Signal<Option<DiskView>>) {
    debug.record_request(DISK_ENDPOINT, &json!({}));
    match get_disk_space().await {
        Ok(space) => {
            debug.record_response(DISK_ENDPOINT, &space);
            if is_ok(&space.status) {
                view.set(Some(DiskView::from_space(&space)));
            } else {
                let body = serde_json::to_value(&space).unwrap_or_default();
                errors.api_failed(DISK_ENDPOINT, "Disk space", &body);
                view.set(Some(DiskView::error()));
            }
        }
        Err(e) => {
            errors.fetch_failed(DISK_ENDPOINT, "Disk space", &e.to_string());
            view.set(Some(DiskView::error()));
        }
    }
}

#[component]
pub fn DiskPanel(debug: DebugConsole, errors: ErrorReporter) -> Element {
    let mut expanded = use_signal(|| false);
    let view = use_signal(|| None::<DiskView>);

    use_future(move || async move {
        // Web builds refresh on expand and on demand only.
        if !timer::HAS_TIMER {
            std::future::pending::<()>().await;
        }
        loop {
            timer::sleep(POLL_INTERVAL).await;
            if *expanded.peek() {
                load_disk_space(debug, errors, view).await;
            }
        }
    });

    let current = view.read().clone();
    let content_class = if expanded() { "disk-space-content" } else { "disk-space-content collapsed" };
    let toggle_class = if expanded() { "disk-space-toggle active" } else { "disk-space-toggle" };

    rsx! {
        section { class: "card-cosmic p-4 mb-6 disk-space",
            button {
                id: "diskSpaceToggle",
                class: "{toggle_class}",
                onclick: move |_| {
                    let now_expanded = !expanded();
                    expanded.set(now_expanded);
                    if now_expanded {
                        spawn(load_disk_space(debug, errors, view));
                    }
                },
                "Disk space"
            }
            div { id: "diskSpaceContent", class: "{content_class}",
                {match current {
                    Some(v) => rsx! {
                        div { class: "disk-progress",
                            div {
                                id: "diskProgressFill",
                                class: "{v.level.css_class()}",
                                width: "{v.fill_percent}%",
                            }
                            span { id: "diskProgressText", class: "disk-progress-text", "{v.percent_text}" }
                        }
                        dl { class: "detail-grid",
                            dt { "Total" }
                            dd { id: "diskTotal", "{v.total}" }
                            dt { "Used" }
                            dd { id: "diskUsed", "{v.used}" }
                            dt { "Free" }
                            dd { id: "diskFree", "{v.free}" }
                        }
                    },
                    None => rsx! {
                        p { class: "text-stardust text-sm", "Loading..." }
                    },
                }}
                button {
                    class: "btn-cosmic text-sm mt-2",
                    onclick: move |_| {
                        spawn(load_disk_space(debug, errors, view));
                    },
                    "Refresh"
                }
            }
        }
    }
}
