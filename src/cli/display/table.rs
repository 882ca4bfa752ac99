//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::relationship::{
    BackupPayload, MigrationPayload, RelationshipPayload, RelationshipRecord,
};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render a stored relationship as a two-column table
    pub fn render_relationship(&self, record: &RelationshipRecord) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("FIELD").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
            ]);

        match &record.payload {
            RelationshipPayload::Migration(payload) => self.add_migration_rows(&mut table, payload),
            RelationshipPayload::Backup(payload) => self.add_backup_rows(&mut table, payload),
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ {} {} ─╮\n",
            record.name,
            format!("[{} v{}]", record.kind().as_str(), record.version).bright_black()
        ));
        output.push_str(&table.to_string());
        output
    }

    fn add_migration_rows(&self, table: &mut Table, payload: &MigrationPayload) {
        let dest = &payload.destination;
        let connected = dest.is_connected();

        if let Some(source) = &payload.source {
            table.add_row(vec![Cell::new("Source volume"), Cell::new(&source.volume)]);
            table.add_row(vec![
                Cell::new("Source size"),
                Cell::new(or_dash(source.size.as_ref().map(|q| q.0.as_str()))),
            ]);
        }

        let access_modes = dest
            .access_modes
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let endpoint = match (&dest.address, dest.port) {
            (Some(address), Some(port)) => format!("{}:{}", address, port),
            (Some(address), None) => address.clone(),
            _ => "-".to_string(),
        };

        let rows = [
            ("Cluster", or_dash(Some(dest.cluster.as_str()))),
            ("Namespace", dest.namespace.clone()),
            ("PVC", dest.pvc_name.clone()),
            ("ReplicationDestination", dest.destination_object_name.clone()),
            ("Copy method", dest.copy_method.to_string()),
            ("Access modes", or_dash(Some(access_modes.as_str()))),
            (
                "Capacity",
                or_dash(dest.capacity.as_ref().map(|q| q.0.as_str())),
            ),
            ("Storage class", or_dash(dest.storage_class_name.as_deref())),
            ("Service type", dest.service_type.to_string()),
            ("SSH keys", or_dash(dest.ssh_keys.as_deref())),
        ];
        for (field, value) in rows {
            table.add_row(vec![Cell::new(field), Cell::new(value)]);
        }

        table.add_row(vec![
            Cell::new("Endpoint"),
            Cell::new(format!(
                "{} {} ({})",
                StatusIcon::get_endpoint_icon(connected),
                StatusIcon::get_endpoint_text(connected),
                endpoint
            ))
            .fg(self.theme.get_endpoint_color(connected)),
        ]);
    }

    fn add_backup_rows(&self, table: &mut Table, payload: &BackupPayload) {
        let rows = [
            ("Cluster", or_dash(Some(payload.cluster.as_str()))),
            ("Namespace", payload.namespace.clone()),
            ("Source PVC", payload.source_pvc_name.clone()),
            ("Backup", payload.backup_name.clone()),
            ("ReplicationSource", payload.source_object_name.clone()),
            ("Repository", payload.repository.clone()),
        ];
        for (field, value) in rows {
            table.add_row(vec![Cell::new(field), Cell::new(value)]);
        }

        let schedule = if payload.schedule.is_empty() {
            "manual".to_string()
        } else {
            payload.schedule.clone()
        };
        table.add_row(vec![
            Cell::new("Schedule"),
            Cell::new(format!(
                "{} {}",
                StatusIcon::get_schedule_icon(&payload.schedule),
                schedule
            ))
            .fg(self.theme.get_schedule_color(&payload.schedule)),
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{AccessMode, CopyMethod, ServiceType};
    use crate::domain::relationship::MigrationDestination;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

    fn migration_record(address: Option<&str>) -> RelationshipRecord {
        RelationshipRecord::new(
            "mig1",
            RelationshipPayload::Migration(MigrationPayload {
                source: None,
                destination: MigrationDestination {
                    cluster: "clusterA".to_string(),
                    namespace: "ns1".to_string(),
                    pvc_name: "vol1".to_string(),
                    destination_object_name: "ns1-vol1-migration-dest".to_string(),
                    ssh_key_secret_name: Some("keys".to_string()),
                    copy_method: CopyMethod::Snapshot,
                    access_modes: vec![AccessMode::ReadWriteOnce],
                    capacity: Some(Quantity("10Gi".to_string())),
                    storage_class_name: None,
                    service_type: ServiceType::ClusterIP,
                    address: address.map(str::to_string),
                    port: Some(22),
                    ssh_keys: Some("keys".to_string()),
                },
            }),
        )
    }

    #[test]
    fn test_render_migration() {
        let output = TableRenderer::new().render_relationship(&migration_record(Some("10.0.0.7")));
        assert!(output.contains("mig1"));
        assert!(output.contains("ns1-vol1-migration-dest"));
        assert!(output.contains("10Gi"));
        assert!(output.contains("10.0.0.7:22"));
        assert!(output.contains("Connected"));
    }

    #[test]
    fn test_render_pending_migration() {
        let output = TableRenderer::new().render_relationship(&migration_record(None));
        assert!(output.contains("Pending"));
    }

    #[test]
    fn test_render_manual_backup() {
        let record = RelationshipRecord::new(
            "once",
            RelationshipPayload::Backup(BackupPayload {
                cluster: String::new(),
                namespace: "ns1".to_string(),
                source_pvc_name: "vol1".to_string(),
                backup_name: "once".to_string(),
                source_object_name: "once-backup-source".to_string(),
                repository: "s3:repo".to_string(),
                schedule: String::new(),
            }),
        );
        let output = TableRenderer::new().render_relationship(&record);
        assert!(output.contains("once-backup-source"));
        assert!(output.contains("s3:repo"));
        assert!(output.contains("manual"));
        assert!(output.contains("PVBackup"));
    }
}
