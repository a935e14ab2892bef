//! Async delays. Web builds carry no timer driver, so there `sleep` resolves
//! immediately and `HAS_TIMER` is false.

use std::time::Duration;

#[cfg(any(feature = "desktop", feature = "server"))]
pub const HAS_TIMER: bool = true;

#[cfg(not(any(feature = "desktop", feature = "server")))]
pub const HAS_TIMER: bool = false;

#[cfg(any(feature = "desktop", feature = "server"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(not(any(feature = "desktop", feature = "server")))]
pub async fn sleep(_duration: Duration) {}
