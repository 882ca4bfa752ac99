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

//! Conditions the orchestrator waits on.

use crate::infrastructure::kubernetes::crd::{ReplicationDestination, ReplicationSource};

/// The controller has written any status at all. This is a weak signal: it
/// says the source was picked up, not that a backup finished.
pub fn status_present(source: &ReplicationSource) -> bool {
    source.status.is_some()
}

/// The destination published the address and key secret a source needs to
/// connect.
pub fn destination_endpoint_ready(destination: &ReplicationDestination) -> bool {
    destination
        .status
        .as_ref()
        .and_then(|s| s.rsync.as_ref())
        .is_some_and(|rsync| rsync.address.is_some() && rsync.ssh_keys.is_some())
}

/// The sync requested through `spec.trigger.manual` has completed.
///
/// Stricter than [`status_present`]. The backup flow does not wait on it;
/// callers that trigger a manual sync and need the data copied use it.
pub fn manual_sync_completed(source: &ReplicationSource) -> bool {
    let Some(requested) = source.spec.trigger.as_ref().and_then(|t| t.manual.as_ref()) else {
        return false;
    };
    source
        .status
        .as_ref()
        .and_then(|s| s.last_manual_sync.as_ref())
        .is_some_and(|done| done == requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::crd::{
        ReplicationDestinationRsyncStatus, ReplicationDestinationSpec,
        ReplicationDestinationStatus, ReplicationSourceSpec, ReplicationSourceStatus,
        ReplicationSourceTriggerSpec,
    };

    fn destination(rsync: Option<ReplicationDestinationRsyncStatus>) -> ReplicationDestination {
        let mut rd = ReplicationDestination::new("rd", ReplicationDestinationSpec::default());
        rd.status = Some(ReplicationDestinationStatus {
            rsync,
            ..Default::default()
        });
        rd
    }

    fn source(manual: Option<&str>, last_manual_sync: Option<&str>) -> ReplicationSource {
        let mut rs = ReplicationSource::new(
            "rs",
            ReplicationSourceSpec {
                source_pvc: "vol1".to_string(),
                trigger: Some(ReplicationSourceTriggerSpec {
                    schedule: None,
                    manual: manual.map(str::to_string),
                }),
                restic: None,
            },
        );
        rs.status = Some(ReplicationSourceStatus {
            last_manual_sync: last_manual_sync.map(str::to_string),
            ..Default::default()
        });
        rs
    }

    #[test]
    fn test_status_present_accepts_empty_status() {
        let mut rs = source(None, None);
        assert!(status_present(&rs));
        rs.status = None;
        assert!(!status_present(&rs));
    }

    #[test]
    fn test_destination_needs_address_and_keys() {
        let mut rd = ReplicationDestination::new("rd", ReplicationDestinationSpec::default());
        assert!(!destination_endpoint_ready(&rd));

        rd = destination(None);
        assert!(!destination_endpoint_ready(&rd));

        rd = destination(Some(ReplicationDestinationRsyncStatus {
            address: Some("10.0.0.7".to_string()),
            port: Some(22),
            ssh_keys: None,
        }));
        assert!(!destination_endpoint_ready(&rd));

        rd = destination(Some(ReplicationDestinationRsyncStatus {
            address: Some("10.0.0.7".to_string()),
            port: None,
            ssh_keys: Some("keys".to_string()),
        }));
        assert!(destination_endpoint_ready(&rd));
    }

    #[test]
    fn test_manual_sync_completed() {
        assert!(manual_sync_completed(&source(Some("initial"), Some("initial"))));
        assert!(!manual_sync_completed(&source(Some("second"), Some("initial"))));
        assert!(!manual_sync_completed(&source(Some("initial"), None)));
        assert!(!manual_sync_completed(&source(None, None)));
    }
}
