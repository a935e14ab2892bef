//! Server functions bridging the console UI to the capture backend.
//! These are callable from both web (WASM) and desktop clients.

use dioxus::prelude::*;

use crate::model::{DiskSpace, JobStatus, PixelFormatsResponse, ResolutionsResponse, StartResponse, TimelapseRequest};

/// Camera indices the operator may pick from.
#[server]
pub async fn list_cameras() -> Result<Vec<u32>, ServerFnError> {
    Ok(crate::config::cameras())
}

/// Capture resolutions supported by `camera`. Backend-reported failures come
/// back as `status: "error"`; transport failures as `Err`.
#[server]
pub async fn get_resolutions(camera: u32) -> Result<ResolutionsResponse, ServerFnError> {
    crate::backend::fetch_resolutions(camera)
        .await
        .map_err(|e| ServerFnError::new(e))
}

#[server]
pub async fn get_pixel_formats(camera: u32) -> Result<PixelFormatsResponse, ServerFnError> {
    crate::backend::fetch_pixel_formats(camera)
        .await
        .map_err(|e| ServerFnError::new(e))
}

#[server]
pub async fn get_disk_space() -> Result<DiskSpace, ServerFnError> {
    crate::backend::fetch_disk_space()
        .await
        .map_err(|e| ServerFnError::new(e))
}

#[server]
pub async fn get_job_status() -> Result<JobStatus, ServerFnError> {
    crate::backend::fetch_status()
        .await
        .map_err(|e| ServerFnError::new(e))
}

#[server]
pub async fn start_timelapse(request: TimelapseRequest) -> Result<StartResponse, ServerFnError> {
    crate::backend::start_timelapse(&request)
        .await
        .map_err(|e| ServerFnError::new(e))
}
