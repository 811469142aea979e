//! Stored-table service
//!
//! Runs the pipeline against tables held in [`Storage`], persisting results
//! and writing an audit entry for every change and export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde_json::{Map, Value};

use crate::audit::{generate_diff, AuditEntry, EntityType};
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_groups_csv, export_table_csv};
use crate::import::{read_all, read_source, SourceTables};
use crate::models::{BudgetCategory, BudgetTable, Field, LineItem, Money, RawCell, TableKey};
use crate::services::aggregate::{group_totals, GroupKey};
use crate::services::budget::{BudgetService, BudgetSummary, FieldEdit, LoadReport};

/// Where to take tables from when importing
#[derive(Debug, Clone)]
pub struct ImportRequest<'p> {
    pub path: &'p Path,
    pub category: BudgetCategory,
    /// Unit for a single imported table; defaults to the sheet or file name
    pub unit: Option<String>,
    /// Worksheet to read; ignored for CSV and when `all_sheets` is set
    pub sheet: Option<String>,
    /// Import every worksheet, each as its own unit
    pub all_sheets: bool,
}

/// Service for tables held in storage
pub struct TableService<'a> {
    storage: &'a crate::storage::Storage,
    settings: &'a Settings,
}

impl<'a> TableService<'a> {
    pub fn new(storage: &'a crate::storage::Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    fn pipeline(&self) -> BudgetService<'a> {
        BudgetService::new(&self.settings.calculation)
    }

    /// Read, type and store tables from a source file
    ///
    /// A table that fails (for example, a missing required column) is
    /// reported in the result; the others are still stored.
    pub fn import(&self, request: &ImportRequest<'_>) -> BudgetResult<LoadReport> {
        let source: SourceTables = if request.all_sheets {
            read_all(request.path)?
        } else {
            read_source(request.path, request.sheet.as_deref())?.into()
        };

        let explicit_unit = if request.all_sheets {
            None
        } else {
            request.unit.clone()
        };
        let report = self.pipeline().load_source(source, request.category, |raw| {
            explicit_unit.clone().unwrap_or_else(|| raw.name.clone())
        });

        for table in &report.tables {
            let existed = self.storage.tables.get(&table.key())?.is_some();
            self.storage.tables.put(table)?;
            let entry = AuditEntry::create(
                EntityType::Table,
                table.key().to_string(),
                Some(format!(
                    "{} rows from {}{}",
                    table.len(),
                    request.path.display(),
                    if existed { ", replacing stored table" } else { "" }
                )),
                &table_snapshot(table),
            );
            self.storage.log(&entry)?;
        }

        Ok(report)
    }

    /// Every stored table, ordered by unit then category
    pub fn list(&self) -> BudgetResult<Vec<BudgetTable>> {
        self.storage
            .tables
            .keys()?
            .iter()
            .map(|key| self.settled(key))
            .collect()
    }

    /// A stored table with totals under the current calculation settings
    pub fn get(&self, unit: &str, category: BudgetCategory) -> BudgetResult<BudgetTable> {
        self.settled(&TableKey::new(unit, category))
    }

    fn settled(&self, key: &TableKey) -> BudgetResult<BudgetTable> {
        let mut table = self.storage.tables.require(key)?;
        self.pipeline().settle(&mut table);
        Ok(table)
    }

    /// Re-store every table whose totals differ under the current settings;
    /// returns how many were rewritten
    pub fn settle_all(&self) -> BudgetResult<usize> {
        let mut rewritten = 0;
        for key in self.storage.tables.keys()? {
            let stored = self.storage.tables.require(&key)?;
            let mut table = stored.clone();
            self.pipeline().settle(&mut table);
            if table != stored {
                self.storage.tables.put(&table)?;
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }

    /// Edit one cell, recompute the table and persist
    pub fn set_field(
        &self,
        unit: &str,
        category: BudgetCategory,
        row: usize,
        field: Field,
        value: &str,
    ) -> BudgetResult<FieldEdit> {
        let mut table = self.get(unit, category)?;
        let before = row_snapshot(table.row(row)?, &self.settings.calculation);

        let edit = self
            .pipeline()
            .set_field(&mut table, row, field, &RawCell::from_text(value))?;
        self.storage.tables.put(&table)?;

        let after = row_snapshot(table.row(row)?, &self.settings.calculation);
        let diff = generate_diff(&before, &after);
        self.storage.log(&AuditEntry::update(
            EntityType::LineItem,
            format!("{}#{}", table.key(), row),
            None,
            &before,
            &after,
            diff,
        ))?;

        Ok(edit)
    }

    /// Append a row built from `field=value` pairs; returns the new row index
    pub fn add_row(
        &self,
        unit: &str,
        category: BudgetCategory,
        values: &[(Field, String)],
    ) -> BudgetResult<usize> {
        let mut table = self.get(unit, category)?;
        let cells: Vec<(Field, RawCell)> = values
            .iter()
            .map(|(field, value)| (*field, RawCell::from_text(value)))
            .collect();

        let index = self.pipeline().add_row(&mut table, &cells)?;
        self.storage.tables.put(&table)?;

        let snapshot = row_snapshot(table.row(index)?, &self.settings.calculation);
        self.storage.log(&AuditEntry::create(
            EntityType::LineItem,
            format!("{}#{}", table.key(), index),
            None,
            &snapshot,
        ))?;

        Ok(index)
    }

    /// Remove a row; later rows shift down by one
    pub fn remove_row(
        &self,
        unit: &str,
        category: BudgetCategory,
        row: usize,
    ) -> BudgetResult<LineItem> {
        let mut table = self.get(unit, category)?;
        let removed = self.pipeline().remove_row(&mut table, row)?;
        self.storage.tables.put(&table)?;

        self.storage.log(&AuditEntry::delete(
            EntityType::LineItem,
            format!("{}#{}", table.key(), row),
            None,
            &row_snapshot(&removed, &self.settings.calculation),
        ))?;

        Ok(removed)
    }

    /// Recompute every total of a stored table; returns how many changed
    pub fn recompute(&self, unit: &str, category: BudgetCategory) -> BudgetResult<usize> {
        let mut table = self.storage.tables.require(&TableKey::new(unit, category))?;
        let before: Vec<Money> = table.rows.iter().map(|r| r.total).collect();
        let grand_before = table.grand_total();

        self.pipeline().refresh(&mut table);
        self.storage.tables.put(&table)?;

        let changed = table
            .rows
            .iter()
            .zip(&before)
            .filter(|(row, old)| row.total != **old)
            .count();

        if changed > 0 {
            let rounding = self.settings.calculation.rounding;
            let before_total = Value::String(grand_before.format_plain(rounding));
            let after_total = Value::String(table.grand_total().format_plain(rounding));
            let diff = generate_diff(&before_total, &after_total);
            self.storage.log(&AuditEntry::update(
                EntityType::Table,
                table.key().to_string(),
                Some(format!("{} row total(s) recomputed", changed)),
                &before_total,
                &after_total,
                diff,
            ))?;
        }

        Ok(changed)
    }

    /// Delete a stored table; returns whether it existed
    pub fn remove(&self, unit: &str, category: BudgetCategory) -> BudgetResult<bool> {
        let key = TableKey::new(unit, category);
        let Some(table) = self.storage.tables.get(&key)? else {
            return Ok(false);
        };
        self.storage.tables.remove(&key)?;
        self.storage.log(&AuditEntry::delete(
            EntityType::Table,
            key.to_string(),
            None,
            &table_snapshot(&table),
        ))?;
        Ok(true)
    }

    /// Summarize a stored table against its desired amount
    ///
    /// Totals follow the current calculation settings. `desired` overrides
    /// the amount saved in settings.
    pub fn summarize(
        &self,
        unit: &str,
        category: BudgetCategory,
        keys: &[GroupKey],
        desired: Option<Money>,
    ) -> BudgetResult<(BudgetTable, BudgetSummary)> {
        let table = self.get(unit, category)?;
        let desired = desired.or_else(|| self.settings.desired_for(unit, category));
        let summary = self.pipeline().summarize(&table, keys, desired);
        Ok((table, summary))
    }

    /// Write a table (or its grouped totals when `keys` is non-empty) as CSV
    pub fn export_csv(
        &self,
        unit: &str,
        category: BudgetCategory,
        keys: &[GroupKey],
        destination: &Path,
    ) -> BudgetResult<()> {
        let table = self.get(unit, category)?;
        let file = File::create(destination).map_err(|e| {
            BudgetError::Export(format!("Failed to create {}: {}", destination.display(), e))
        })?;
        let writer = BufWriter::new(file);
        let rounding = self.settings.calculation.rounding;

        if keys.is_empty() {
            export_table_csv(&table, rounding, writer)?;
        } else {
            export_groups_csv(&group_totals(&table, keys), rounding, writer)?;
        }

        self.log_export(&table.key(), destination)
    }

    /// Record an export of a table in the audit log
    pub fn log_export(&self, key: &TableKey, destination: &Path) -> BudgetResult<()> {
        self.storage.log(&AuditEntry::export(
            EntityType::Table,
            key.to_string(),
            destination.display().to_string(),
        ))
    }
}

/// Flat `field -> value` view of a row, used for audit diffs
fn row_snapshot(
    item: &LineItem,
    config: &crate::services::calculator::CalculationConfig,
) -> Value {
    let mut map = Map::new();
    for field in Field::fields_for(item.category()) {
        let value = item.display_value(*field, config.rounding);
        if !value.is_empty() {
            map.insert(field.name().to_string(), Value::String(value));
        }
    }
    for (header, value) in &item.extra {
        map.insert(header.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

/// Compact description of a table for create/delete audit entries
fn table_snapshot(table: &BudgetTable) -> Value {
    serde_json::json!({
        "name": table.name,
        "rows": table.len(),
        "columns": table.columns.iter().map(|c| c.header.clone()).collect::<Vec<_>>(),
        "grand_total": table.grand_total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::BudgetPaths;
    use crate::models::Rounding;
    use crate::services::calculator::MissionFormula;
    use crate::storage::Storage;
    use tempfile::TempDir;

    const MISSIONS_CSV: &str = "País,Cantidad de Funcionarios,Días,Costo de Pasaje,Alojamiento,Per-diem y Otros,Movilidad,Objetivo,Total\n\
        Chile,2,3,100,50,20,10,R,\n\
        Perú,1,2,300,80,40,0,E,999\n";

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        std::fs::write(temp_dir.path().join("VPO.csv"), MISSIONS_CSV).unwrap();
        (temp_dir, storage)
    }

    fn import(temp_dir: &TempDir, service: &TableService<'_>) -> LoadReport {
        let path = temp_dir.path().join("VPO.csv");
        service
            .import(&ImportRequest {
                path: &path,
                category: BudgetCategory::Missions,
                unit: None,
                sheet: None,
                all_sheets: false,
            })
            .unwrap()
    }

    #[test]
    fn test_import_stores_and_logs() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);

        let report = import(&temp_dir, &service);
        assert_eq!(report.tables.len(), 1);

        let table = service.get("VPO", BudgetCategory::Missions).unwrap();
        assert_eq!(table.rows[0].total, Money::from_units(640));
        assert_eq!(table.rows[1].total, Money::from_units(999));
        assert_eq!(service.list().unwrap().len(), 1);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::Table);
        assert_eq!(entries[0].entity_id, "VPO/Misiones");
    }

    #[test]
    fn test_edit_persists_and_logs_diff() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        let edit = service
            .set_field("VPO", BudgetCategory::Missions, 0, Field::Days, "4")
            .unwrap();
        assert_eq!(edit.total_after, Money::from_units(780));

        let stored = service.get("VPO", BudgetCategory::Missions).unwrap();
        assert_eq!(stored.rows[0].total, Money::from_units(780));

        let entries = storage.audit().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.operation, Operation::Update);
        assert_eq!(last.entity_id, "VPO/Misiones#0");
        let diff = last.diff_summary.as_deref().unwrap();
        assert!(diff.contains("days: \"3\" -> \"4\""));
        assert!(diff.contains("total: \"640\" -> \"780\""));
    }

    #[test]
    fn test_recompute_overrides_trusted_totals() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        assert_eq!(service.recompute("VPO", BudgetCategory::Missions).unwrap(), 1);
        let stored = service.get("VPO", BudgetCategory::Missions).unwrap();
        // 300 + 1*2*80 + 1*2*40 + 0
        assert_eq!(stored.rows[1].total, Money::from_units(540));
        assert_eq!(service.recompute("VPO", BudgetCategory::Missions).unwrap(), 0);
    }

    #[test]
    fn test_summarize_uses_saved_target() {
        let (temp_dir, storage) = setup();
        let mut settings = Settings::default();
        settings.set_target("VPO", BudgetCategory::Missions, Money::from_units(2000));
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        let (_, summary) = service
            .summarize("VPO", BudgetCategory::Missions, &[GroupKey::Objective], None)
            .unwrap();
        let rec = summary.reconciliation.unwrap();
        assert_eq!(rec.difference, Money::from_units(361));

        let (_, summary) = service
            .summarize(
                "VPO",
                BudgetCategory::Missions,
                &[],
                Some(Money::from_units(1639)),
            )
            .unwrap();
        assert!(summary.reconciliation.unwrap().is_balanced());
    }

    #[test]
    fn test_add_remove_and_missing_table() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        let index = service
            .add_row(
                "VPO",
                BudgetCategory::Missions,
                &[
                    (Field::Country, "Bolivia".into()),
                    (Field::StaffCount, "1".into()),
                    (Field::Days, "1".into()),
                    (Field::FareCost, "200".into()),
                ],
            )
            .unwrap();
        assert_eq!(index, 2);

        let removed = service.remove_row("VPO", BudgetCategory::Missions, 0).unwrap();
        assert_eq!(removed.text(Field::Country), Some("Chile"));
        let stored = service.get("VPO", BudgetCategory::Missions).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.grand_total(), Money::from_units(1199));

        assert!(service
            .get("VPO", BudgetCategory::Consulting)
            .unwrap_err()
            .is_not_found());
        assert!(service.remove("VPO", BudgetCategory::Missions).unwrap());
        assert!(!service.remove("VPO", BudgetCategory::Missions).unwrap());
    }

    const MIXED_CSV: &str = "País,Cantidad de Funcionarios,Días,Costo de Pasaje,Alojamiento,Per-diem y Otros,Movilidad,Objetivo,Total\n\
        Chile,2,3,100,50,20,10,R,\n\
        Perú,1,1,10.255,0,0,0,E,\n\
        Bolivia,1,1,100,0,0,0,R,1234.56\n";

    fn import_mixed(temp_dir: &TempDir, service: &TableService<'_>) {
        let path = temp_dir.path().join("VPE.csv");
        std::fs::write(&path, MIXED_CSV).unwrap();
        service
            .import(&ImportRequest {
                path: &path,
                category: BudgetCategory::Missions,
                unit: None,
                sheet: None,
                all_sheets: false,
            })
            .unwrap();
    }

    fn factored_integer() -> Settings {
        let mut settings = Settings::default();
        settings.calculation.formula_variant = MissionFormula::Factored;
        settings.calculation.rounding = Rounding::Integer;
        settings
    }

    #[test]
    fn test_summary_and_export_follow_changed_settings() {
        let (temp_dir, storage) = setup();
        let mut initial = Settings::default();
        initial.calculation.rounding = Rounding::TwoDecimal;
        import_mixed(&temp_dir, &TableService::new(&storage, &initial));

        let settings = factored_integer();
        let service = TableService::new(&storage, &settings);

        let (table, summary) = service
            .summarize("VPE", BudgetCategory::Missions, &[GroupKey::Country], None)
            .unwrap();
        assert_eq!(table.rows[0].total, Money::from_units(680));
        assert_eq!(table.rows[1].total, Money::from_units(10));
        assert_eq!(table.rows[2].total, Money::from_units(1235));
        assert_eq!(summary.grand_total, Money::from_units(1925));
        assert_eq!(summary.groups.unwrap().total(), summary.grand_total);

        let out = temp_dir.path().join("vpe.csv");
        service
            .export_csv("VPE", BudgetCategory::Missions, &[], &out)
            .unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].ends_with(",R,680"), "{}", lines[1]);
        assert!(lines[2].ends_with(",E,10"), "{}", lines[2]);
        assert!(lines[3].ends_with(",R,1235"), "{}", lines[3]);
    }

    #[test]
    fn test_edit_under_changed_settings_recomputes_whole_table() {
        let (temp_dir, storage) = setup();
        import_mixed(&temp_dir, &TableService::new(&storage, &Settings::default()));

        let settings = factored_integer();
        let service = TableService::new(&storage, &settings);
        service
            .set_field("VPE", BudgetCategory::Missions, 1, Field::Days, "2")
            .unwrap();

        let stored = storage
            .tables
            .require(&TableKey::new("VPE", BudgetCategory::Missions))
            .unwrap();
        assert_eq!(stored.rows[0].total, Money::from_units(680));
        assert_eq!(stored.rows[1].total, Money::from_units(10));
        assert_eq!(stored.rows[2].total, Money::from_units(1235));
    }

    #[test]
    fn test_settle_all_rewrites_stale_tables() {
        let (temp_dir, storage) = setup();
        import_mixed(&temp_dir, &TableService::new(&storage, &Settings::default()));

        let settings = factored_integer();
        let service = TableService::new(&storage, &settings);
        assert_eq!(service.settle_all().unwrap(), 1);
        assert_eq!(service.settle_all().unwrap(), 0);

        let stored = storage
            .tables
            .require(&TableKey::new("VPE", BudgetCategory::Missions))
            .unwrap();
        assert_eq!(stored.rows[0].total, Money::from_units(680));
    }

    #[test]
    fn test_huge_fare_is_stored_saturated() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        service
            .set_field("VPO", BudgetCategory::Missions, 0, Field::FareCost, "1e18")
            .unwrap();
        let (_, summary) = service
            .summarize("VPO", BudgetCategory::Missions, &[], None)
            .unwrap();
        assert_eq!(summary.grand_total.cents(), i64::MAX);
    }

    #[test]
    fn test_export_csv_logs_export() {
        let (temp_dir, storage) = setup();
        let settings = Settings::default();
        let service = TableService::new(&storage, &settings);
        import(&temp_dir, &service);

        let out = temp_dir.path().join("out.csv");
        service
            .export_csv("VPO", BudgetCategory::Missions, &[], &out)
            .unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",R,640"));

        let last = storage.audit().read_all().unwrap().pop().unwrap();
        assert_eq!(last.operation, Operation::Export);
    }
}
