//! Backend location and camera list. Values come from the environment on the
//! server and from `.env` (baked in by build.rs) on clients.

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Base URL of the capture backend, without trailing slash.
pub fn capture_api_url() -> String {
    let raw = std::env::var("CAPTURE_API_URL")
        .ok()
        .or_else(|| option_env!("CAPTURE_API_URL").map(str::to_string))
        .unwrap_or_default();
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Camera indices offered in the form (`CAPTURE_CAMERAS=0,2`). Defaults to `[0]`.
pub fn cameras() -> Vec<u32> {
    let raw = std::env::var("CAPTURE_CAMERAS")
        .ok()
        .or_else(|| option_env!("CAPTURE_CAMERAS").map(str::to_string))
        .unwrap_or_default();
    parse_cameras(&raw)
}

fn parse_cameras(raw: &str) -> Vec<u32> {
    let mut cams: Vec<u32> = raw.split(',').filter_map(|s| s.trim().parse().ok()).collect();
    cams.sort_unstable();
    cams.dedup();
    if cams.is_empty() {
        cams.push(0);
    }
    cams
}

/// MJPEG stream URL for an `img` element.
pub fn stream_url(camera: u32, resolution: Option<&str>) -> String {
    let mut url = format!("{}/stream?camara={}", capture_api_url(), camera);
    if let Some(res) = resolution.filter(|r| !r.is_empty()) {
        url.push_str("&resolucion=");
        url.push_str(res);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cameras() {
        assert_eq!(parse_cameras(""), vec![0]);
        assert_eq!(parse_cameras("2, 0,2,x"), vec![0, 2]);
    }

    #[test]
    fn test_stream_url_params() {
        let base = capture_api_url();
        assert_eq!(stream_url(1, None), format!("{}/stream?camara=1", base));
        assert_eq!(stream_url(0, Some("")), format!("{}/stream?camara=0", base));
        assert_eq!(
            stream_url(0, Some("640x480")),
            format!("{}/stream?camara=0&resolucion=640x480", base)
        );
    }
}
