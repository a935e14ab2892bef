//! Nested ("matryoshka") view of the camera's resolutions, 1:1 pixel scale,
//! with the live stream as the top layer.

use dioxus::prelude::*;

use crate::model::Resolution;

// (fill, border)
const BOX_COLORS: [(&str, &str); 7] = [
    ("rgba(59, 130, 246, 0.3)", "rgb(59, 130, 246)"),
    ("rgba(16, 185, 129, 0.3)", "rgb(16, 185, 129)"),
    ("rgba(245, 158, 11, 0.3)", "rgb(245, 158, 11)"),
    ("rgba(239, 68, 68, 0.3)", "rgb(239, 68, 68)"),
    ("rgba(139, 92, 246, 0.3)", "rgb(139, 92, 246)"),
    ("rgba(236, 72, 153, 0.3)", "rgb(236, 72, 153)"),
    ("rgba(20, 184, 166, 0.3)", "rgb(20, 184, 166)"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionBox {
    pub resolution: Resolution,
    pub fill: &'static str,
    pub border: &'static str,
    /// Smaller boxes sit above larger ones.
    pub z_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matryoshka {
    pub boxes: Vec<ResolutionBox>,
    pub width: u32,
    pub height: u32,
}

/// Lay out `WxH` labels largest-first. Unparseable labels are skipped.
pub fn matryoshka<S: AsRef<str>>(labels: &[S]) -> Option<Matryoshka> {
    let mut resolutions: Vec<Resolution> = labels.iter().filter_map(|l| Resolution::parse(l.as_ref())).collect();
    resolutions.sort_by(|a, b| b.area().cmp(&a.area()));
    let outer = resolutions.first()?.clone();

    let boxes = resolutions
        .into_iter()
        .enumerate()
        .map(|(idx, resolution)| {
            let (fill, border) = BOX_COLORS[idx % BOX_COLORS.len()];
            ResolutionBox {
                resolution,
                fill,
                border,
                z_index: 100 + idx,
            }
        })
        .collect();

    Some(Matryoshka {
        boxes,
        width: outer.width,
        height: outer.height,
    })
}

#[component]
pub fn ResolutionPreview(
    resolutions: Vec<String>,
    selected: Signal<String>,
    stream_url: Option<String>,
    on_stream_error: EventHandler<String>,
) -> Element {
    let Some(layout) = matryoshka(&resolutions) else {
        return rsx! {
            div { id: "resolutionBoxes",
                p { class: "text-stardust", "Pick a camera to see its available resolutions" }
            }
        };
    };
    let Matryoshka { boxes, width, height } = layout;
    let count = boxes.len();

    rsx! {
        div { id: "resolutionBoxes",
            div {
                class: "matryoshka-container",
                position: "relative",
                overflow: "auto",
                width: "{width}px",
                height: "{height}px",
                for item in boxes {
                    ResolutionBoxView { key: "{item.resolution.label}", item: item.clone(), selected }
                }
                {stream_url.map(|url| {
                    let failed_url = url.clone();
                    rsx! {
                        div {
                            id: "streamBox",
                            class: "resolution-box stream-box",
                            position: "absolute",
                            left: "0",
                            top: "0",
                            width: "{width}px",
                            height: "{height}px",
                            z_index: "2000",
                            overflow: "hidden",
                            img {
                                id: "streamImg",
                                src: "{url}",
                                alt: "Camera stream",
                                position: "absolute",
                                left: "0",
                                top: "0",
                                width: "100%",
                                height: "100%",
                                object_fit: "none",
                                object_position: "top left",
                                onerror: move |_| on_stream_error.call(failed_url.clone()),
                            }
                            div { class: "resolution-label stream-label", "Live preview" }
                        }
                    }
                })}
            }
            div { class: "resolution-legend text-stardust text-sm mt-4",
                p { strong { "{count}" } " resolutions available (1:1 scale)" }
                p { class: "text-xs mt-1",
                    "Click a box to select that resolution. The stream is shown at its real size."
                }
            }
        }
    }
}

#[component]
fn ResolutionBoxView(item: ResolutionBox, selected: Signal<String>) -> Element {
    let mut selected = selected;
    let label = item.resolution.label.clone();
    let is_selected = *selected.read() == label;
    let class = if is_selected { "resolution-box selected" } else { "resolution-box" };
    rsx! {
        div {
            class: "{class}",
            position: "absolute",
            left: "0",
            top: "0",
            width: "{item.resolution.width}px",
            height: "{item.resolution.height}px",
            border: "3px solid {item.border}",
            background_color: "{item.fill}",
            z_index: "{item.z_index}",
            onclick: move |_| selected.set(label.clone()),
            div {
                class: "resolution-label",
                background_color: "{item.border}",
                "{item.resolution.label}"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_or_invalid_labels() {
        assert!(matryoshka::<&str>(&[]).is_none());
        assert!(matryoshka(&["auto", ""]).is_none());
    }

    #[test]
    fn test_sorted_largest_first() {
        let layout = matryoshka(&["640x480", "1920x1080", "1280x720", "bogus"]).unwrap();
        let labels: Vec<_> = layout.boxes.iter().map(|b| b.resolution.label.as_str()).collect();
        assert_eq!(labels, ["1920x1080", "1280x720", "640x480"]);
        assert_eq!((layout.width, layout.height), (1920, 1080));
        assert_eq!(layout.boxes[2].z_index, 102);
    }

    #[test]
    fn test_colors_cycle() {
        let labels: Vec<String> = (1..=8).map(|i| format!("{}x{}", i * 100, i * 100)).collect();
        let layout = matryoshka(&labels).unwrap();
        assert_eq!(layout.boxes[0].border, layout.boxes[7].border);
        assert_ne!(layout.boxes[0].border, layout.boxes[1].border);
    }
}
