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

use std::time::Duration;

/// Field manager / creator name stamped on everything this tool creates
pub const FIELD_MANAGER: &str = "kubectl-volsync";

/// Resource labels
pub const LABEL_CREATED_BY: &str = "app.kubernetes.io/created-by";
pub const LABEL_RELATIONSHIP: &str = "volsync.backube/relationship";

/// Longest relationship name; the name is used as a label value
pub const MAX_RELATIONSHIP_NAME_LEN: usize = 63;

/// Intent object name suffixes
pub const MIGRATION_DEST_SUFFIX: &str = "-migration-dest";
pub const BACKUP_SOURCE_SUFFIX: &str = "-backup-source";

/// Restic credential keys, both in the credential file and in the Secret
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const RESTIC_REPOSITORY: &str = "RESTIC_REPOSITORY";
pub const RESTIC_PASSWORD: &str = "RESTIC_PASSWORD";
pub const REQUIRED_CREDENTIAL_KEYS: [&str; 4] = [
    AWS_ACCESS_KEY_ID,
    AWS_SECRET_ACCESS_KEY,
    RESTIC_REPOSITORY,
    RESTIC_PASSWORD,
];

/// Trigger value used for backups without a schedule
pub const INITIAL_MANUAL_TRIGGER: &str = "initial";

/// Readiness polling
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Relationship store
pub const RELATIONSHIP_DATA_VERSION: u32 = 1;
pub const RELATIONSHIP_FILE_EXTENSION: &str = "yaml";
pub const CONFIG_DIR_ENV: &str = "VOLSYNC_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".volsync";

/// Defaults for migration destinations
pub const DEFAULT_COPY_METHOD: &str = "Snapshot";
pub const DEFAULT_ACCESS_MODE: &str = "ReadWriteOnce";
pub const STORAGE_RESOURCE: &str = "storage";
