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

//! Cron schedule grammar check.
//!
//! Accepts the standard five fields (minute, hour, day-of-month, month,
//! day-of-week), the `@` descriptors and `@every <duration>`. Only the
//! grammar is checked; no fire times are computed.

use crate::shared::error::VolsyncError;
use croner::Cron;
use regex::Regex;
use std::sync::LazyLock;

const FIELD_COUNT: usize = 5;

const DESCRIPTORS: &[(&str, &str)] = &[
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@midnight", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
];

static EVERY_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|((\d+(\.\d*)?|\.\d+)(ns|us|µs|ms|s|m|h))+)$")
        .expect("valid duration pattern")
});

/// Check that `expression` is a valid cron schedule.
pub fn validate_schedule(expression: &str) -> Result<(), VolsyncError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(VolsyncError::invalid_schedule(expression, "empty schedule"));
    }

    if let Some(duration) = trimmed.strip_prefix("@every ") {
        let duration = duration.trim();
        if EVERY_DURATION.is_match(duration) {
            return Ok(());
        }
        return Err(VolsyncError::invalid_schedule(
            expression,
            format!("invalid duration '{}'", duration),
        ));
    }

    let pattern = if trimmed.starts_with('@') {
        DESCRIPTORS
            .iter()
            .find(|(name, _)| *name == trimmed)
            .map(|(_, pattern)| *pattern)
            .ok_or_else(|| {
                VolsyncError::invalid_schedule(
                    expression,
                    format!("unrecognized descriptor '{}'", trimmed),
                )
            })?
    } else {
        trimmed
    };

    let fields = pattern.split_whitespace().count();
    if fields != FIELD_COUNT {
        return Err(VolsyncError::invalid_schedule(
            expression,
            format!("expected {} fields, found {}", FIELD_COUNT, fields),
        ));
    }

    Cron::new(pattern)
        .parse()
        .map_err(|e| VolsyncError::invalid_schedule(expression, e.to_string()))?;
    Ok(())
}
