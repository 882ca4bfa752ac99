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

use super::commands::GlobalOptions;
use super::display::TableRenderer;
use crate::domain::relationship::RelationshipKind;
use crate::domain::transfer::{BackupRequest, BackupSourceFlow};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct BackupCommand {
    /// Relationship name
    #[arg(long, short = 'r')]
    pub relationship: String,

    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum BackupAction {
    /// Create the restic credential secret and ReplicationSource
    Create(BackupCreateArgs),

    /// Show a stored backup relationship
    Show,
}

#[derive(Parser, Debug, Clone)]
pub struct BackupCreateArgs {
    /// Backup name; also names the credential secret
    #[arg(long)]
    pub name: String,

    /// Restic credential file (yaml, json, toml or KEY=VALUE lines), deleted on success
    #[arg(long, value_name = "PATH")]
    pub restic_config: PathBuf,

    /// Source PVC as [cluster/]namespace/name
    #[arg(long)]
    pub pvcname: String,

    /// Cron schedule (e.g., "0 2 * * *"); omit for a single backup
    #[arg(long)]
    pub cronspec: Option<String>,
}

impl BackupCommand {
    pub async fn execute(&self, global: &GlobalOptions) -> anyhow::Result<()> {
        match &self.action {
            BackupAction::Create(args) => self.create(args, global).await,
            BackupAction::Show => self.show(global),
        }
    }

    async fn create(&self, args: &BackupCreateArgs, global: &GlobalOptions) -> anyhow::Result<()> {
        let request = BackupRequest::parse(
            &self.relationship,
            &args.name,
            &args.pvcname,
            args.restic_config.clone(),
            args.cronspec.as_deref(),
        )
        .with_context(|| format!("Invalid options for backup '{}'", self.relationship))?;

        let source = request.source.clone();
        let store = global.store()?;
        let factory = global.client_factory();
        let flow = BackupSourceFlow::new(&factory, &store, global.wait_settings());

        let record = flow.create(request).await.with_context(|| {
            format!(
                "Failed to create backup '{}' for PVC {} in namespace '{}' on cluster '{}'",
                self.relationship,
                source.name,
                source.namespace,
                source.cluster.as_deref().unwrap_or("<current>")
            )
        })?;

        println!("✓ Backup relationship '{}' created", record.name);
        if let Some(payload) = record.as_backup() {
            println!("  ReplicationSource: {}", payload.source_object_name);
            if payload.schedule.is_empty() {
                println!("  Schedule: manual (one backup)");
            } else {
                println!("  Schedule: {}", payload.schedule);
            }
        }
        Ok(())
    }

    fn show(&self, global: &GlobalOptions) -> anyhow::Result<()> {
        let store = global.store()?;
        let record = store
            .load(RelationshipKind::Backup, &self.relationship)
            .with_context(|| format!("Failed to load backup '{}'", self.relationship))?;

        println!("{}", TableRenderer::new().render_relationship(&record));
        Ok(())
    }
}
