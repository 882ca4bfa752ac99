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
use crate::domain::transfer::{MigrationDestinationFlow, MigrationRequest};
use crate::infrastructure::constants::{DEFAULT_ACCESS_MODE, DEFAULT_COPY_METHOD};
use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct MigrationCommand {
    /// Relationship name
    #[arg(long, short = 'r')]
    pub relationship: String,

    #[command(subcommand)]
    pub action: MigrationAction,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum MigrationAction {
    /// Create the destination PVC and ReplicationDestination
    Create(MigrationCreateArgs),

    /// Show a stored migration relationship
    Show,
}

#[derive(Parser, Debug, Clone)]
pub struct MigrationCreateArgs {
    /// Destination PVC as [cluster/]namespace/name
    #[arg(long)]
    pub pvcname: String,

    /// Service type exposing the rsync endpoint (ClusterIP, NodePort, LoadBalancer)
    #[arg(long)]
    pub servicetype: String,

    /// Copy method (Direct, Clone, Snapshot, None)
    #[arg(long, default_value = DEFAULT_COPY_METHOD)]
    pub copymethod: String,

    /// Comma separated access modes for a new PVC
    #[arg(long, default_value = DEFAULT_ACCESS_MODE)]
    pub accessmodes: String,

    /// Size of a new PVC (e.g., "10Gi"); required if the PVC does not exist
    #[arg(long)]
    pub capacity: Option<String>,

    /// Storage class for a new PVC
    #[arg(long)]
    pub storageclass: Option<String>,
}

impl MigrationCommand {
    pub async fn execute(&self, global: &GlobalOptions) -> anyhow::Result<()> {
        match &self.action {
            MigrationAction::Create(args) => self.create(args, global).await,
            MigrationAction::Show => self.show(global),
        }
    }

    async fn create(&self, args: &MigrationCreateArgs, global: &GlobalOptions) -> anyhow::Result<()> {
        let request = MigrationRequest::parse(
            &self.relationship,
            &args.pvcname,
            &args.copymethod,
            &args.accessmodes,
            args.capacity.as_deref(),
            args.storageclass.as_deref(),
            &args.servicetype,
        )
        .with_context(|| format!("Invalid options for migration '{}'", self.relationship))?;

        let target = request.destination.clone();
        let store = global.store()?;
        let factory = global.client_factory();
        let flow = MigrationDestinationFlow::new(&factory, &store, global.wait_settings());

        let record = flow.create(request).await.with_context(|| {
            format!(
                "Failed to create migration '{}' for PVC {} in namespace '{}' on cluster '{}'",
                self.relationship,
                target.name,
                target.namespace,
                target.cluster.as_deref().unwrap_or("<current>")
            )
        })?;

        println!("✓ Migration relationship '{}' created", record.name);
        if let Some(payload) = record.as_migration() {
            let destination = &payload.destination;
            println!(
                "  Destination: {}:{}",
                destination.address.as_deref().unwrap_or("-"),
                destination
                    .port
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "  SSH keys secret: {}",
                destination.ssh_keys.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }

    fn show(&self, global: &GlobalOptions) -> anyhow::Result<()> {
        let store = global.store()?;
        let record = store
            .load(RelationshipKind::Migration, &self.relationship)
            .with_context(|| format!("Failed to load migration '{}'", self.relationship))?;

        println!("{}", TableRenderer::new().render_relationship(&record));
        Ok(())
    }
}
