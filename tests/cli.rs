use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MISSIONS: &str = "País,Operación,Cantidad de Funcionarios,Días,Costo de Pasaje,Alojamiento,Per-diem y Otros,Movilidad,Objetivo,Total\n\
Chile,Op-1,2,3,100,50,20,10,R,\n\
Perú,Op-2,1,2,300,80,40,0,E,999\n\
Chile,Op-3,1,1,50,10,10,10,X,\n";

const CONSULTING: &str = "Cargo,Nº,Monto Mensual,Cantidad de Meses,Área\n\
Especialista,3,\"1,000\",6,Salud\n";

fn budgetline(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("budgetline").unwrap();
    cmd.env("BUDGETLINE_DATA_DIR", data_dir);
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("VPO.csv"), MISSIONS).unwrap();
    fs::write(dir.path().join("consultorias.csv"), CONSULTING).unwrap();
    budgetline(dir.path())
        .args(["import", "-c", "misiones"])
        .arg(dir.path().join("VPO.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported VPO/Misiones (3 rows"));
    dir
}

#[test]
fn import_and_list() {
    let dir = setup();
    budgetline(dir.path())
        .arg("tables")
        .assert()
        .success()
        .stdout(predicate::str::contains("VPO"))
        .stdout(predicate::str::contains("$1,719.00"));
}

#[test]
fn import_missing_column_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "País,Días\nChile,3\n").unwrap();

    budgetline(dir.path())
        .args(["import", "-c", "misiones"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field 'staff_count'"));
}

#[test]
fn consulting_overhead_from_config() {
    let dir = setup();
    budgetline(dir.path())
        .args(["config", "set", "overhead.VPE", "1.6"])
        .assert()
        .success();
    budgetline(dir.path())
        .args(["import", "-c", "consultorias", "-u", "VPE"])
        .arg(dir.path().join("consultorias.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("$28,800.00"));
}

#[test]
fn summary_groups_and_warns() {
    let dir = setup();
    budgetline(dir.path())
        .args(["summary", "VPO", "-c", "misiones", "--by", "objective", "--detail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Totals by objective"))
        .stdout(predicate::str::contains("Grand total:"))
        .stdout(predicate::str::contains("Totals by cost component"))
        .stdout(predicate::str::contains("invalid objective 'X'"));
}

#[test]
fn edit_recomputes_row_total() {
    let dir = setup();
    budgetline(dir.path())
        .args([
            "edit", "set", "VPO", "-c", "misiones", "--row", "0", "--field", "days", "--value", "4",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Row total $640.00 -> $780.00"));

    budgetline(dir.path())
        .args(["audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE LineItem VPO/Misiones#0"));
}

#[test]
fn reconcile_with_target() {
    let dir = setup();
    budgetline(dir.path())
        .args(["reconcile", "VPO", "-c", "misiones"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No desired amount"));

    budgetline(dir.path())
        .args(["target", "set", "VPO", "-c", "misiones", "1719"])
        .assert()
        .success();
    budgetline(dir.path())
        .args(["reconcile", "VPO", "-c", "misiones"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:          Balanced"));
}

#[test]
fn export_csv_and_json() {
    let dir = setup();
    let csv_out = dir.path().join("out.csv");
    budgetline(dir.path())
        .args(["export", "VPO", "-c", "misiones", "-o"])
        .arg(&csv_out)
        .assert()
        .success();
    let text = fs::read_to_string(&csv_out).unwrap();
    assert!(text.starts_with("País,Operación,"));
    assert!(text.contains("Chile,Op-1,2,3,100,50,20,10,R,640"));

    let json_out = dir.path().join("summary.json");
    budgetline(dir.path())
        .args(["export", "VPO", "-c", "misiones", "-f", "json", "--by", "country", "-o"])
        .arg(&json_out)
        .assert()
        .success();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(value["summary"]["grand_total"], 171900);
}

#[test]
fn config_change_updates_stored_totals() {
    let dir = setup();
    budgetline(dir.path())
        .args(["config", "set", "formula_variant", "factored"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated totals in 1 stored table(s)"));

    budgetline(dir.path())
        .args(["summary", "VPO", "-c", "misiones"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,759.00"));

    let csv_out = dir.path().join("factored.csv");
    budgetline(dir.path())
        .args(["export", "VPO", "-c", "misiones", "-o"])
        .arg(&csv_out)
        .assert()
        .success();
    let text = fs::read_to_string(&csv_out).unwrap();
    assert!(text.contains("Chile,Op-1,2,3,100,50,20,10,R,680"));
}

#[test]
fn trusted_fractional_total_exported_at_integer_precision() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("VPE.csv");
    fs::write(
        &path,
        "País,Cantidad de Funcionarios,Días,Costo de Pasaje,Alojamiento,Per-diem y Otros,Movilidad,Total\n\
         Bolivia,1,1,100,0,0,0,1234.56\n",
    )
    .unwrap();
    budgetline(dir.path())
        .args(["import", "-c", "misiones"])
        .arg(&path)
        .assert()
        .success();

    let csv_out = dir.path().join("out.csv");
    budgetline(dir.path())
        .args(["export", "VPE", "-c", "misiones", "-o"])
        .arg(&csv_out)
        .assert()
        .success();
    let text = fs::read_to_string(&csv_out).unwrap();
    assert!(text.contains("Bolivia,1,1,100,0,0,0,1235"), "{}", text);
}

#[test]
fn huge_input_does_not_crash() {
    let dir = setup();
    budgetline(dir.path())
        .args([
            "edit", "set", "VPO", "-c", "misiones", "--row", "0", "--field", "fare_cost", "--value",
            "1e18",
        ])
        .assert()
        .success();
    budgetline(dir.path())
        .args(["summary", "VPO", "-c", "misiones"])
        .assert()
        .success();
}

#[test]
fn malformed_target_amount_is_rejected() {
    let dir = setup();
    for amount in ["1.5é", "10.-5"] {
        budgetline(dir.path())
            .args(["target", "set", "VPO", "-c", "misiones", amount])
            .assert()
            .failure()
            .stderr(predicate::str::contains("panicked").not());
    }
}
