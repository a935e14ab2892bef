//! Wire types of the capture backend, shared by the server functions and the UI.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";
pub const DEFAULT_OUTPUT: &str = "timelapse.mp4";
const OUTPUT_EXTENSIONS: [&str; 3] = ["mov", "mp4", "avi"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    #[serde(rename = "ancho")]
    pub width: u32,
    #[serde(rename = "alto")]
    pub height: u32,
    pub label: String,
}

impl Resolution {
    /// Parse a `WxH` label such as `1920x1080`.
    pub fn parse(label: &str) -> Option<Self> {
        let (w, h) = label.trim().split_once('x')?;
        let width = w.trim().parse().ok()?;
        let height = h.trim().parse().ok()?;
        Some(Self {
            width,
            height,
            label: label.trim().to_string(),
        })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionsResponse {
    pub status: String,
    #[serde(default, rename = "resoluciones")]
    pub resolutions: Vec<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelFormat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelFormatsResponse {
    pub status: String,
    #[serde(default, rename = "formatos")]
    pub formats: Vec<PixelFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSpace {
    pub status: String,
    #[serde(default)]
    pub total_gb: f64,
    #[serde(default)]
    pub used_gb: f64,
    #[serde(default)]
    pub free_gb: f64,
    #[serde(default)]
    pub percent_used: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl StartResponse {
    /// Only an explicit `status: "ok"` counts; error replies also carry `msg`.
    pub fn accepted(&self) -> bool {
        self.status.as_deref().is_some_and(is_ok)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub running: bool,
}

pub fn is_ok(status: &str) -> bool {
    status == "ok"
}

/// A validated timelapse job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelapseRequest {
    pub camera: u32,
    pub duration_sec: f64,
    pub interval_sec: f64,
    pub fps: u32,
    pub path: Option<String>,
    pub resolution: Option<String>,
    pub pix_fmt: String,
    pub output: String,
}

impl TimelapseRequest {
    /// Field names and values as the backend's `/start` form expects them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("camara", self.camera.to_string()),
            ("duracion", self.duration_sec.to_string()),
            ("intervalo", self.interval_sec.to_string()),
            ("fps", self.fps.to_string()),
            ("path", self.path.clone().unwrap_or_default()),
            ("resolucion", self.resolution.clone().unwrap_or_default()),
            ("pix_fmt", self.pix_fmt.clone()),
            ("salida", self.output.clone()),
        ]
    }
}

/// Raw form input, as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelapseForm {
    pub camera: String,
    pub duration: String,
    pub interval: String,
    pub fps: String,
    pub path: String,
    pub resolution: String,
    pub pix_fmt: String,
    pub output: String,
}

impl TimelapseForm {
    pub fn fields(&self) -> [(&'static str, String); 8] {
        [
            ("camara", self.camera.clone()),
            ("duracion", self.duration.clone()),
            ("intervalo", self.interval.clone()),
            ("fps", self.fps.clone()),
            ("path", self.path.clone()),
            ("resolucion", self.resolution.clone()),
            ("pix_fmt", self.pix_fmt.clone()),
            ("salida", self.output.clone()),
        ]
    }

    pub fn validate(&self) -> Result<TimelapseRequest, String> {
        let camera = self
            .camera
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid camera: {:?}", self.camera))?;
        let duration_sec = parse_positive(&self.duration, "duration")?;
        let interval_sec = parse_positive(&self.interval, "interval")?;
        if interval_sec > duration_sec {
            return Err("Interval cannot be longer than the duration".to_string());
        }
        let fps = self
            .fps
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|f| *f > 0)
            .ok_or_else(|| format!("Invalid fps: {:?}", self.fps))?;

        let resolution = non_empty(&self.resolution);
        if let Some(label) = &resolution {
            if Resolution::parse(label).is_none() {
                return Err(format!("Invalid resolution: {:?}", label));
            }
        }

        Ok(TimelapseRequest {
            camera,
            duration_sec,
            interval_sec,
            fps,
            path: non_empty(&self.path),
            resolution,
            pix_fmt: non_empty(&self.pix_fmt).unwrap_or_else(|| DEFAULT_PIXEL_FORMAT.to_string()),
            output: normalize_output(&self.output),
        })
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| format!("Invalid {}: {:?}", name, raw))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Default to `timelapse.mp4`; append `.mp4` unless the name already ends in
/// a supported container extension.
pub fn normalize_output(raw: &str) -> String {
    let Some(name) = non_empty(raw) else {
        return DEFAULT_OUTPUT.to_string();
    };
    let ext = name.rsplit('.').next().unwrap_or_default();
    if name.contains('.') && OUTPUT_EXTENSIONS.contains(&ext) {
        name
    } else {
        format!("{}.mp4", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TimelapseForm {
        TimelapseForm {
            camera: "0".into(),
            duration: "3600".into(),
            interval: "5".into(),
            fps: "24".into(),
            ..TimelapseForm::default()
        }
    }

    #[test]
    fn test_resolution_parse() {
        let r = Resolution::parse("1280x720").unwrap();
        assert_eq!((r.width, r.height), (1280, 720));
        assert_eq!(r.area(), 921_600);
        assert!(Resolution::parse("hd").is_none());
        assert!(Resolution::parse("1280x").is_none());
    }

    #[test]
    fn test_backend_json_field_names() {
        let body = r#"{"status":"ok","resoluciones":[{"ancho":640,"alto":480,"label":"640x480"}]}"#;
        let parsed: ResolutionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.resolutions[0].width, 640);

        let err: DiskSpace = serde_json::from_str(r#"{"status":"error","msg":"denied"}"#).unwrap();
        assert!(!is_ok(&err.status));
        assert_eq!(err.msg.as_deref(), Some("denied"));
    }

    #[test]
    fn test_start_response_acceptance() {
        let ok: StartResponse = serde_json::from_str(r#"{"status":"ok","msg":"started"}"#).unwrap();
        assert!(ok.accepted());
        let err: StartResponse = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert!(!err.accepted());
    }

    #[test]
    fn test_start_error_with_message_is_rejected() {
        let err: StartResponse =
            serde_json::from_str(r#"{"status":"error","msg":"invalid literal for int()"}"#).unwrap();
        assert!(!err.accepted());
        assert_eq!(err.msg.as_deref(), Some("invalid literal for int()"));

        let bare: StartResponse = serde_json::from_str(r#"{"msg":"started"}"#).unwrap();
        assert!(!bare.accepted());
    }

    #[test]
    fn test_validate_applies_defaults() {
        let req = form().validate().unwrap();
        assert_eq!(req.pix_fmt, "yuv420p");
        assert_eq!(req.output, "timelapse.mp4");
        assert_eq!(req.path, None);
        assert_eq!(req.resolution, None);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut bad = form();
        bad.fps = "0".into();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.duration = "-1".into();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.interval = "7200".into();
        assert!(bad.validate().is_err());

        let mut bad = form();
        bad.resolution = "big".into();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_output_extension_normalized() {
        assert_eq!(normalize_output(""), "timelapse.mp4");
        assert_eq!(normalize_output("garden.mov"), "garden.mov");
        assert_eq!(normalize_output("garden"), "garden.mp4");
        assert_eq!(normalize_output("garden.mkv"), "garden.mkv.mp4");
    }

    #[test]
    fn test_form_fields_use_backend_names() {
        let mut f = form();
        f.resolution = "1920x1080".into();
        let req = f.validate().unwrap();
        let fields = req.form_fields();
        assert!(fields.contains(&("camara", "0".to_string())));
        assert!(fields.contains(&("resolucion", "1920x1080".to_string())));
        assert!(fields.contains(&("salida", "timelapse.mp4".to_string())));
    }
}
