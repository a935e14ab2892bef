#![allow(non_snake_case)]

mod api;
#[cfg(feature = "server")]
mod backend;
mod config;
mod debug;
mod disk;
mod errors;
mod format;
mod ledger;
mod model;
mod preview;
mod timelapse;
mod timer;
mod view;

use dioxus::prelude::*;

use debug::{use_debug_console, DebugConfig};
use disk::DiskPanel;
use errors::{use_error_reporter, ErrorsSidebar};
use timelapse::TimelapsePanel;
use view::{content_wrapper_class, DebugOpenButton, DebugSidebar};

// ============================================================================
// Entry & root component
// ============================================================================

fn main() {
    #[cfg(feature = "server")]
    {
        if let Err(e) = dotenvy::dotenv() {
            eprintln!("No .env loaded: {}", e);
        }
    }

    #[cfg(feature = "desktop")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let debug = use_debug_console(DebugConfig::default());
    let errors = use_error_reporter(debug);

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }

        div { class: "bg-galaxy min-h-screen",
            nav { class: "nav-galaxy px-6 py-4",
                div { class: "container flex items-center justify-between flex-wrap gap-3",
                    h1 { class: "text-2xl font-bold text-star-white", "Timelapse Console" }
                    div { class: "live-indicator",
                        span { class: "live-dot" }
                        span { class: "text-sm text-stardust", "{config::capture_api_url()}" }
                    }
                }
            }

            div { class: "{content_wrapper_class(debug)}",
                div { class: "container px-6 py-6",
                    DiskPanel { debug, errors }
                    TimelapsePanel { debug, errors }
                }
            }

            ErrorsSidebar { errors }
            DebugSidebar { console: debug }
            DebugOpenButton { console: debug }
        }
    }
}
