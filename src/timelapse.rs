//! Timelapse job form: camera data loading, live preview toggle, submission
//! and job status.

use std::time::Duration;

use dioxus::prelude::*;
use serde_json::json;

use crate::api::{get_job_status, get_pixel_formats, get_resolutions, list_cameras, start_timelapse};
use crate::config::stream_url;
use crate::debug::DebugConsole;
use crate::errors::ErrorReporter;
use crate::model::{is_ok, PixelFormat, TimelapseForm, DEFAULT_PIXEL_FORMAT};
use crate::preview::ResolutionPreview;
use crate::timer;

const FORM_ID: &str = "timelapseForm";
/// Time the backend needs to release the camera after the stream stops.
const CAMERA_RELEASE: Duration = Duration::from_millis(500);

fn default_formats() -> Vec<PixelFormat> {
    vec![PixelFormat {
        value: DEFAULT_PIXEL_FORMAT.to_string(),
        label: "YUV 4:2:0 (default)".to_string(),
    }]
}

/// Pick the default pixel format if offered, otherwise the first one.
pub fn preferred_format(formats: &[PixelFormat]) -> String {
    formats
        .iter()
        .find(|f| f.value == DEFAULT_PIXEL_FORMAT)
        .or_else(|| formats.first())
        .map(|f| f.value.clone())
        .unwrap_or_else(|| DEFAULT_PIXEL_FORMAT.to_string())
}

async fn load_resolutions(
    camera: u32,
    debug: DebugConsole,
    errors: ErrorReporter,
    mut resolutions: Signal<Vec<String>>,
    mut loading: Signal<bool>,
) {
    loading.set(true);
    debug.record_request("/resoluciones", &json!({ "camara": camera }));
    match get_resolutions(camera).await {
        Ok(resp) => {
            debug.record_response("/resoluciones", &resp);
            if is_ok(&resp.status) {
                resolutions.set(resp.resolutions.into_iter().map(|r| r.label).collect());
            } else {
                resolutions.set(Vec::new());
                let body = serde_json::to_value(&resp).unwrap_or_default();
                errors.api_failed("/resoluciones", "Load resolutions", &body);
            }
        }
        Err(e) => {
            resolutions.set(Vec::new());
            errors.fetch_failed("/resoluciones", "Load resolutions", &e.to_string());
        }
    }
    loading.set(false);
}

async fn load_pixel_formats(
    camera: u32,
    debug: DebugConsole,
    errors: ErrorReporter,
    mut formats: Signal<Vec<PixelFormat>>,
    mut form: Signal<TimelapseForm>,
) {
    debug.record_request("/formatos_pixel", &json!({ "camara": camera }));
    let loaded = match get_pixel_formats(camera).await {
        Ok(resp) => {
            debug.record_response("/formatos_pixel", &resp);
            if is_ok(&resp.status) && !resp.formats.is_empty() {
                resp.formats
            } else {
                let body = serde_json::to_value(&resp).unwrap_or_default();
                errors.api_failed("/formatos_pixel", "Load pixel formats", &body);
                default_formats()
            }
        }
        Err(e) => {
            errors.fetch_failed("/formatos_pixel", "Load pixel formats", &e.to_string());
            default_formats()
        }
    };
    form.write().pix_fmt = preferred_format(&loaded);
    formats.set(loaded);
}

async fn refresh_job_status(debug: DebugConsole, errors: ErrorReporter, mut running: Signal<Option<bool>>) {
    debug.record_request("/status", &json!({}));
    match get_job_status().await {
        Ok(status) => {
            debug.record_response("/status", &status);
            running.set(Some(status.running));
        }
        Err(e) => errors.fetch_failed("/status", "Job status", &e.to_string()),
    }
}

#[component]
pub fn TimelapsePanel(debug: DebugConsole, errors: ErrorReporter) -> Element {
    let mut cameras = use_signal(|| vec![0u32]);
    let mut form = use_signal(|| TimelapseForm {
        camera: "0".to_string(),
        fps: "24".to_string(),
        pix_fmt: DEFAULT_PIXEL_FORMAT.to_string(),
        ..TimelapseForm::default()
    });
    let resolutions = use_signal(Vec::<String>::new);
    let formats = use_signal(default_formats);
    let loading_resolutions = use_signal(|| false);
    let mut stream_active = use_signal(|| false);
    let mut status_text = use_signal(String::new);
    let running = use_signal(|| None::<bool>);
    let mut selected_resolution = use_signal(String::new);

    let load_camera = move |camera: u32| {
        spawn(load_resolutions(camera, debug, errors, resolutions, loading_resolutions));
        spawn(load_pixel_formats(camera, debug, errors, formats, form));
    };

    use_effect(move || {
        spawn(async move {
            match list_cameras().await {
                Ok(list) if !list.is_empty() => {
                    let first = list[0];
                    cameras.set(list);
                    form.write().camera = first.to_string();
                    load_camera(first);
                }
                Ok(_) => load_camera(0),
                Err(e) => {
                    errors.fetch_failed("/cameras", "Load cameras", &e.to_string());
                    load_camera(0);
                }
            }
            refresh_job_status(debug, errors, running).await;
        });
    });

    // Keep the select and the matryoshka selection in step.
    use_effect(move || {
        let picked = selected_resolution();
        if form.peek().resolution != picked {
            form.write().resolution = picked;
        }
    });

    let current_camera: u32 = form.read().camera.parse().unwrap_or(0);
    let current_resolution = form.read().resolution.clone();
    let stream = stream_active().then(|| stream_url(current_camera, Some(current_resolution.as_str())));
    let has_resolutions = !resolutions.read().is_empty();

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            if stream_active() {
                stream_active.set(false);
                timer::sleep(CAMERA_RELEASE).await;
            }
            status_text.set("Starting timelapse...".to_string());
            let snapshot = form.read().clone();
            debug.record_form(FORM_ID, snapshot.fields());

            let request = match snapshot.validate() {
                Ok(request) => request,
                Err(msg) => {
                    errors.invalid_input("/start", "Start timelapse", &msg);
                    status_text.set(msg);
                    return;
                }
            };
            match start_timelapse(request).await {
                Ok(resp) => {
                    debug.record_response("/start", &resp);
                    if resp.accepted() {
                        status_text.set(resp.msg.clone().unwrap_or_else(|| "Timelapse started.".to_string()));
                    } else {
                        status_text.set(resp.msg.clone().unwrap_or_else(|| "Failed to start timelapse".to_string()));
                        let body = serde_json::to_value(&resp).unwrap_or_default();
                        errors.api_failed("/start", "Start timelapse", &body);
                    }
                }
                Err(e) => {
                    status_text.set("Failed to start timelapse".to_string());
                    errors.fetch_failed("/start", "Start timelapse", &e.to_string());
                }
            }
            refresh_job_status(debug, errors, running).await;
        });
    };

    let running_label = match running() {
        Some(true) => "Running",
        Some(false) => "Idle",
        None => "Unknown",
    };

    rsx! {
        section { class: "card-cosmic p-6 mb-6",
            h2 { class: "text-xl font-bold text-star-white mb-4", "New timelapse" }
            form { id: "{FORM_ID}", class: "space-y-4", onsubmit: on_submit,
                div { class: "flex flex-wrap gap-4",
                    label { class: "form-field",
                        span { "Camera" }
                        select {
                            id: "camaraSelect",
                            name: "camara",
                            onchange: move |evt| {
                                let Ok(camera) = evt.value().parse::<u32>() else {
                                    return;
                                };
                                stream_active.set(false);
                                selected_resolution.set(String::new());
                                form.write().camera = camera.to_string();
                                load_camera(camera);
                            },
                            for cam in cameras.read().iter().copied() {
                                option { value: "{cam}", selected: form.read().camera == cam.to_string(), "Camera {cam}" }
                            }
                        }
                    }
                    label { class: "form-field",
                        span { "Resolution" }
                        select {
                            id: "resolucionSelect",
                            name: "resolucion",
                            disabled: *loading_resolutions.read(),
                            onchange: move |evt| selected_resolution.set(evt.value()),
                            if *loading_resolutions.read() {
                                option { value: "", "Loading..." }
                            } else {
                                option { value: "", "Default resolution" }
                                for res in resolutions.read().iter() {
                                    option { value: "{res}", selected: current_resolution == *res, "{res}" }
                                }
                            }
                        }
                    }
                    label { class: "form-field",
                        span { "Pixel format" }
                        select {
                            id: "pixFmtSelect",
                            name: "pix_fmt",
                            onchange: move |evt| form.write().pix_fmt = evt.value(),
                            for f in formats.read().iter() {
                                option { value: "{f.value}", selected: form.read().pix_fmt == f.value, "{f.label}" }
                            }
                        }
                    }
                }
                div { class: "flex flex-wrap gap-4",
                    label { class: "form-field",
                        span { "Duration (s)" }
                        input {
                            r#type: "number",
                            name: "duracion",
                            min: "0",
                            step: "any",
                            value: "{form.read().duration}",
                            oninput: move |evt| form.write().duration = evt.value(),
                        }
                    }
                    label { class: "form-field",
                        span { "Interval (s)" }
                        input {
                            r#type: "number",
                            name: "intervalo",
                            min: "0",
                            step: "any",
                            value: "{form.read().interval}",
                            oninput: move |evt| form.write().interval = evt.value(),
                        }
                    }
                    label { class: "form-field",
                        span { "FPS" }
                        input {
                            r#type: "number",
                            name: "fps",
                            min: "1",
                            value: "{form.read().fps}",
                            oninput: move |evt| form.write().fps = evt.value(),
                        }
                    }
                }
                div { class: "flex flex-wrap gap-4",
                    label { class: "form-field",
                        span { "Folder" }
                        input {
                            name: "path",
                            placeholder: "frames_<date>",
                            value: "{form.read().path}",
                            oninput: move |evt| form.write().path = evt.value(),
                        }
                    }
                    label { class: "form-field",
                        span { "Output file" }
                        input {
                            name: "salida",
                            placeholder: "timelapse.mp4",
                            value: "{form.read().output}",
                            oninput: move |evt| form.write().output = evt.value(),
                        }
                    }
                }
                div { class: "flex items-center gap-3",
                    button { r#type: "submit", class: "btn-nebula", "Start" }
                    button {
                        id: "previewBtn",
                        r#type: "button",
                        class: "btn-cosmic",
                        onclick: move |_| {
                            if !has_resolutions {
                                status_text.set("Select a camera first so its resolutions can load.".to_string());
                                return;
                            }
                            stream_active.set(!stream_active());
                        },
                        if stream_active() { "Stop preview" } else { "Preview" }
                    }
                    button {
                        r#type: "button",
                        class: "btn-cosmic",
                        onclick: move |_| {
                            spawn(refresh_job_status(debug, errors, running));
                        },
                        "Job: {running_label}"
                    }
                    p { id: "status", class: "text-stardust text-sm", "{status_text}" }
                }
            }
            div { class: "mt-6",
                ResolutionPreview {
                    resolutions: resolutions.read().clone(),
                    selected: selected_resolution,
                    stream_url: stream,
                    on_stream_error: move |url: String| {
                        stream_active.set(false);
                        errors.load_failed(&url, "Live preview");
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: &str) -> PixelFormat {
        PixelFormat {
            value: value.to_string(),
            label: value.to_uppercase(),
        }
    }

    #[test]
    fn test_preferred_format_defaults_to_yuv420p() {
        assert_eq!(preferred_format(&[fmt("mjpeg"), fmt("yuv420p")]), "yuv420p");
    }

    #[test]
    fn test_preferred_format_falls_back_to_first() {
        assert_eq!(preferred_format(&[fmt("mjpeg"), fmt("yuyv422")]), "mjpeg");
        assert_eq!(preferred_format(&[]), "yuv420p");
    }

    #[test]
    fn test_default_formats_offer_yuv420p() {
        assert_eq!(preferred_format(&default_formats()), DEFAULT_PIXEL_FORMAT);
    }
}
