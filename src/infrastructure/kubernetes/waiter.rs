// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded polling until an object reaches a wanted state.

use crate::infrastructure::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::shared::error::VolsyncError;
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

impl WaitSettings {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }
}

/// Fetch `resource` until `predicate` holds and return the object that
/// satisfied it.
///
/// The first fetch happens immediately. A fetch error ends the wait at once.
/// Sleeps never overshoot the deadline, and the wait only times out after a
/// check that happened at or past it, so an object that becomes ready just
/// before the deadline is still observed.
pub async fn wait_until<T, F, Fut, P>(
    resource: &str,
    settings: &WaitSettings,
    mut fetch: F,
    predicate: P,
) -> Result<T, VolsyncError>
where
    T: Serialize,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, VolsyncError>>,
    P: Fn(&T) -> bool,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        let object = fetch().await?;
        attempts += 1;

        if predicate(&object) {
            tracing::debug!(resource, attempts, "condition met");
            return Ok(object);
        }

        let elapsed = start.elapsed();
        if elapsed >= settings.timeout {
            let last_observed = serde_json::to_string(&object)
                .unwrap_or_else(|e| format!("<unserializable: {}>", e));
            return Err(VolsyncError::WaitTimeout {
                resource: resource.to_string(),
                timeout: settings.timeout,
                last_observed,
            });
        }

        let remaining = settings.timeout - elapsed;
        tracing::debug!(resource, attempts, ?remaining, "not ready yet");
        tokio::time::sleep(settings.poll_interval.min(remaining)).await;
    }
}
