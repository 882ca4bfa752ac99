// CLI command definitions

use super::backup::BackupCommand;
use super::migration::MigrationCommand;
use crate::domain::relationship::RelationshipStore;
use crate::infrastructure::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
use crate::infrastructure::kubernetes::{KubeconfigClientFactory, WaitSettings};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "kubectl-volsync",
    version,
    about = "Manage VolSync replication relationships",
    long_about = "Creates VolSync ReplicationDestination / ReplicationSource objects across clusters and records the resulting relationships on local disk"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOptions {
    /// Directory holding relationship files
    /// If not specified, uses $HOME/.volsync
    #[arg(long, global = true, env = "VOLSYNC_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<String>,

    /// Seconds to wait for the VolSync controller to report status
    #[arg(long, global = true, default_value_t = DEFAULT_WAIT_TIMEOUT.as_secs(), value_name = "SECS")]
    pub wait_timeout: u64,

    /// Seconds between status checks
    #[arg(long, global = true, default_value_t = DEFAULT_POLL_INTERVAL.as_secs(), value_name = "SECS")]
    pub poll_interval: u64,
}

impl GlobalOptions {
    pub fn store(&self) -> anyhow::Result<RelationshipStore> {
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => RelationshipStore::default_dir()
                .context("Failed to resolve the relationship directory")?,
        };
        Ok(RelationshipStore::new(dir))
    }

    pub fn wait_settings(&self) -> WaitSettings {
        WaitSettings::new(
            Duration::from_secs(self.poll_interval.max(1)),
            Duration::from_secs(self.wait_timeout),
        )
    }

    pub fn client_factory(&self) -> KubeconfigClientFactory {
        KubeconfigClientFactory::new(self.kubeconfig.clone())
    }
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Migrate data into a PVC through an rsync destination
    Migration(MigrationCommand),

    /// Back up a PVC to a restic repository
    #[command(name = "pv-backup")]
    PvBackup(BackupCommand),
}

/// One-line rendering of a command failure, causes joined with `: `.
pub fn error_line(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}
