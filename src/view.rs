//! View side of the debug ledger: the surface abstraction, its signal-backed
//! implementation and the sidebar components that draw it.

use dioxus::prelude::*;
use dioxus_primitives::dialog::{DialogContent, DialogRoot, DialogTitle};

use crate::debug::DebugConsole;
use crate::format::{DebugNode, FieldValue, PayloadView};

/// Everything the ledger is allowed to do to the screen.
pub trait ViewSurface {
    type Handle: Clone + PartialEq + std::fmt::Debug;

    /// Whether the list container exists.
    fn is_attached(&self) -> bool;
    /// Insert `node` as the first child and return a handle to it.
    fn mount(&mut self, node: DebugNode) -> Self::Handle;
    /// Detach a node. Unknown or already-detached handles are ignored.
    fn unmount(&mut self, handle: &Self::Handle);
    fn refresh_badge(&mut self, count: usize);
    fn show_sidebar(&mut self, expanded: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarState {
    Collapsed,
    Expanded,
}

impl SidebarState {
    pub fn initial(auto_collapse: bool) -> Self {
        if auto_collapse {
            SidebarState::Collapsed
        } else {
            SidebarState::Expanded
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, SidebarState::Expanded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct MountedNode {
    pub handle: NodeHandle,
    pub node: DebugNode,
}

/// Surface backed by Dioxus signals; the sidebar components render from it.
#[derive(Clone, Copy, PartialEq)]
pub struct SignalSurface {
    nodes: Signal<Vec<MountedNode>>,
    badge: Signal<usize>,
    expanded: Signal<bool>,
    attached: Signal<bool>,
    next_handle: Signal<u64>,
}

impl SignalSurface {
    /// Needs an active Dioxus scope.
    pub fn new() -> Self {
        Self {
            nodes: Signal::new(Vec::new()),
            badge: Signal::new(0),
            expanded: Signal::new(false),
            attached: Signal::new(false),
            next_handle: Signal::new(0),
        }
    }

    pub fn nodes(&self) -> Signal<Vec<MountedNode>> {
        self.nodes
    }

    pub fn badge(&self) -> usize {
        (self.badge)()
    }

    pub fn is_expanded(&self) -> bool {
        (self.expanded)()
    }

    pub fn attach(&mut self) {
        self.attached.set(true);
    }

    pub fn detach(&mut self) {
        self.attached.set(false);
    }
}

impl Default for SignalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSurface for SignalSurface {
    type Handle = NodeHandle;

    fn is_attached(&self) -> bool {
        *self.attached.peek()
    }

    fn mount(&mut self, node: DebugNode) -> NodeHandle {
        let next = *self.next_handle.peek() + 1;
        self.next_handle.set(next);
        let handle = NodeHandle(next);
        self.nodes.write().insert(0, MountedNode { handle, node });
        handle
    }

    fn unmount(&mut self, handle: &NodeHandle) {
        self.nodes.write().retain(|m| m.handle != *handle);
    }

    fn refresh_badge(&mut self, count: usize) {
        self.badge.set(count);
    }

    fn show_sidebar(&mut self, expanded: bool) {
        self.expanded.set(expanded);
    }
}

/// Class list for the page wrapper next to the sidebar.
pub fn content_wrapper_class(console: DebugConsole) -> &'static str {
    if console.surface().is_expanded() {
        "content-wrapper debug-open"
    } else {
        "content-wrapper"
    }
}

#[component]
pub fn DebugSidebar(console: DebugConsole) -> Element {
    let surface = console.surface();
    let mut export_text = use_signal(|| None::<String>);

    // Attach once the list container exists.
    use_effect(move || {
        let mut surface = surface;
        surface.attach();
        console.init();
    });
    use_drop(move || {
        let mut surface = surface;
        surface.detach();
    });

    let container_id = console.container_id();
    let nodes = surface.nodes();
    let expanded = surface.is_expanded();
    let count = surface.badge();
    let sidebar_class = if expanded { "debug-sidebar" } else { "debug-sidebar collapsed" };

    rsx! {
        aside { id: "debugSidebar", class: "{sidebar_class}",
            div { class: "debug-sidebar-header",
                h2 { class: "debug-title", "Debug" }
                span {
                    id: "debugBadge",
                    class: "debug-badge",
                    display: if count > 0 { "block" } else { "none" },
                    "{count}"
                }
                div { class: "debug-actions",
                    button {
                        id: "debugExportBtn",
                        class: "btn-cosmic text-sm",
                        onclick: move |_| match console.export_json() {
                            Ok(json) => export_text.set(Some(json)),
                            Err(e) => tracing::error!("Debug export failed: {}", e),
                        },
                        "Export"
                    }
                    button {
                        id: "debugClearBtn",
                        class: "btn-cosmic text-sm",
                        onclick: move |_| console.clear(),
                        "Clear"
                    }
                    button {
                        id: "debugToggle",
                        class: "debug-toggle",
                        onclick: move |_| console.close(),
                        "×"
                    }
                }
            }
            ul { id: "{container_id}", class: "debug-list",
                for mounted in nodes.read().iter() {
                    DebugItem { key: "{mounted.handle.0}", console, node: mounted.node.clone() }
                }
            }
        }

        DialogRoot {
            open: export_text.read().is_some(),
            on_open_change: move |open: bool| {
                if !open {
                    export_text.set(None);
                }
            },
            DialogContent {
                class: "flex flex-col max-h-[85vh]",
                DialogTitle { "Debug export" }
                pre { class: "debug-export font-mono text-xs overflow-y-auto",
                    "{export_text.read().clone().unwrap_or_default()}"
                }
                div { class: "flex gap-2 mt-4",
                    button {
                        class: "btn-cosmic",
                        onclick: move |_| export_text.set(None),
                        "Close"
                    }
                }
            }
        }
    }
}

/// Floating button that re-opens a collapsed sidebar.
#[component]
pub fn DebugOpenButton(console: DebugConsole) -> Element {
    let visible = !console.surface().is_expanded();
    rsx! {
        button {
            id: "debugOpenBtn",
            class: "debug-open-btn",
            display: if visible { "block" } else { "none" },
            onclick: move |_| console.open(),
            "Debug"
            {(console.surface().badge() > 0).then(|| rsx! {
                span { class: "debug-badge", "{console.surface().badge()}" }
            })}
        }
    }
}

#[component]
fn DebugItem(console: DebugConsole, node: DebugNode) -> Element {
    let id = node.id.clone();
    rsx! {
        li { id: "{node.id}", class: "debug-item",
            div { class: "debug-header",
                p { class: "debug-endpoint",
                    strong { "Endpoint: " }
                    "{node.endpoint}"
                }
                button {
                    class: "debug-close",
                    title: "Remove",
                    onclick: move |_| {
                        console.remove(&id);
                    },
                    "×"
                }
            }
            div { class: "debug-content",
                PayloadBlock { view: node.payload.clone() }
            }
            {node.timestamp.as_ref().map(|ts| rsx! {
                p { class: "debug-timestamp", "{ts}" }
            })}
        }
    }
}

#[component]
fn PayloadBlock(view: PayloadView) -> Element {
    match view {
        PayloadView::Scalar(text) => rsx! {
            p { class: "debug-data", "{text}" }
        },
        PayloadView::Fields(fields) => rsx! {
            ul { class: "debug-data",
                for field in fields {
                    li {
                        strong { "{field.key}: " }
                        {match field.value {
                            FieldValue::Inline(text) => rsx! { span { class: "debug-value", "{text}" } },
                            FieldValue::Block(text) => rsx! { span { class: "debug-value", pre { "{text}" } } },
                        }}
                    }
                }
            }
        },
    }
}

/// In-memory surface for exercising the ledger without a renderer.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySurface {
    attached: bool,
    nodes: Vec<(u64, DebugNode)>,
    next: u64,
    badge: usize,
    expanded: bool,
}

#[cfg(test)]
impl MemorySurface {
    pub fn attached() -> Self {
        Self {
            attached: true,
            ..Self::default()
        }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn mounted_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|(_, n)| n.id.clone()).collect()
    }

    pub fn node(&self, id: &str) -> Option<&DebugNode> {
        self.nodes.iter().map(|(_, n)| n).find(|n| n.id == id)
    }

    pub fn badge(&self) -> usize {
        self.badge
    }

    pub fn badge_visible(&self) -> bool {
        self.badge > 0
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }
}

#[cfg(test)]
impl ViewSurface for MemorySurface {
    type Handle = u64;

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn mount(&mut self, node: DebugNode) -> u64 {
        self.next += 1;
        self.nodes.insert(0, (self.next, node));
        self.next
    }

    fn unmount(&mut self, handle: &u64) {
        self.nodes.retain(|(h, _)| h != handle);
    }

    fn refresh_badge(&mut self, count: usize) {
        self.badge = count;
    }

    fn show_sidebar(&mut self, expanded: bool) {
        self.expanded = expanded;
    }
}
