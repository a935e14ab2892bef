//! HTTP client for the capture backend (server-only).

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::capture_api_url;
use crate::model::{DiskSpace, JobStatus, PixelFormatsResponse, ResolutionsResponse, StartResponse, TimelapseRequest};

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let url = format!("{}{}", capture_api_url(), path);
    tracing::debug!("GET {}", url);
    let res = Client::new()
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("Request to {} failed: {}", path, e))?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        tracing::warn!("{} answered {}", path, status);
        return Err(format!("{} failed: {} - {}", path, status, body));
    }
    res.json::<T>()
        .await
        .map_err(|e| format!("Parse {} response: {}", path, e))
}

pub async fn fetch_resolutions(camera: u32) -> Result<ResolutionsResponse, String> {
    get_json(&format!("/resoluciones/{}", camera)).await
}

pub async fn fetch_pixel_formats(camera: u32) -> Result<PixelFormatsResponse, String> {
    get_json(&format!("/formatos_pixel/{}", camera)).await
}

pub async fn fetch_disk_space() -> Result<DiskSpace, String> {
    get_json("/disk_space").await
}

pub async fn fetch_status() -> Result<JobStatus, String> {
    get_json("/status").await
}

pub async fn start_timelapse(request: &TimelapseRequest) -> Result<StartResponse, String> {
    let url = format!("{}/start", capture_api_url());
    tracing::info!("Starting timelapse on camera {} ({} fps)", request.camera, request.fps);
    let res = Client::new()
        .post(&url)
        .form(&request.form_fields())
        .send()
        .await
        .map_err(|e| format!("Request to /start failed: {}", e))?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(format!("/start failed: {} - {}", status, body));
    }
    res.json::<StartResponse>()
        .await
        .map_err(|e| format!("Parse /start response: {}", e))
}
