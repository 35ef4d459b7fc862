use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER_ROW: &str =
    "Fecha contable;Fecha valor;Concepto;Importe;Moneda;Saldo;Moneda;Concepto ampliado";

fn write_rules(dir: &Path) -> PathBuf {
    let path = dir.join("reglas.csv");
    std::fs::write(
        &path,
        "palabra_clave;categoria\nCarrefour;supermercado\nDecathlon;ocio\n",
    )
    .unwrap();
    path
}

fn write_statement(dir: &Path, name: &str, descriptions: &[&str]) {
    let mut content = format!("{HEADER_ROW}\n");
    for desc in descriptions {
        content.push_str(&format!("02/01/2024;02/01/2024;{desc};-10,00;EUR;500,00;EUR;{desc}\n"));
    }
    std::fs::write(dir.join(name), content).unwrap();
}

fn outputs(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| {
            p.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("csv_procesado_")
        })
        .collect();
    found.sort();
    found
}

fn clasifica(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clasifica").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_classify_command() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    clasifica(dir.path())
        .args(["classify", "COMPRA CARREFOUR MADRID", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout("supermercado\n");
    clasifica(dir.path())
        .args(["classify", "OTRO COMERCIO", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("(uncategorized)"));
}

#[test]
fn test_rules_command_lists_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    clasifica(dir.path())
        .arg("rules")
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)carrefour.*supermercado.*decathlon.*ocio").unwrap());
}

#[test]
fn test_files_command() {
    let dir = tempfile::tempdir().unwrap();
    write_statement(dir.path(), "enero.csv", &["X"]);
    std::fs::write(dir.path().join("notas.txt"), "").unwrap();
    clasifica(dir.path())
        .arg("files")
        .arg("--input-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("enero.csv").and(predicate::str::contains("notas.txt").not()));
}

#[test]
fn test_run_writes_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    write_statement(dir.path(), "enero.csv", &["COMPRA CARREFOUR MADRID", "PAGO DECATHLON", "OTRO COMERCIO"]);
    clasifica(dir.path())
        .args(["run", "--yes", "--input-dir"])
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 records (1 uncategorized)"));
    let written = outputs(dir.path());
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].extension().unwrap(), "xlsx");
}

#[test]
fn test_run_csv_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    write_statement(dir.path(), "enero.csv", &["PAGO DECATHLON"]);
    clasifica(dir.path())
        .args(["run", "-y", "--format", "csv", "--input-dir"])
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules)
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success();
    let written = outputs(out.path());
    assert_eq!(written.len(), 1);
    let content = std::fs::read_to_string(&written[0]).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().nth(1).unwrap().ends_with(";ocio"));
}

#[cfg(unix)]
#[test]
fn test_run_reports_unreadable_file_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    write_statement(dir.path(), "enero.csv", &["COMPRA CARREFOUR", "PAGO DECATHLON", "OTRO"]);
    std::os::unix::fs::symlink(dir.path().join("gone.csv"), dir.path().join("febrero.csv")).unwrap();
    clasifica(dir.path())
        .args(["run", "--yes", "--input-dir"])
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("failed:").and(predicate::str::contains("febrero.csv")))
        .stdout(predicate::str::contains("3 records"));
}

#[test]
fn test_run_missing_rules_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    write_statement(dir.path(), "enero.csv", &["X"]);
    clasifica(dir.path())
        .args(["run", "--yes", "--input-dir"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Rule source unavailable"));
    assert!(outputs(dir.path()).is_empty());
}

#[test]
fn test_run_missing_input_dir_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    clasifica(dir.path())
        .args(["run", "--yes", "--input-dir"])
        .arg(dir.path().join("nope"))
        .arg("--rules")
        .arg(&rules)
        .assert()
        .code(4);
}

#[test]
fn test_config_save_then_show() {
    let home = tempfile::tempdir().unwrap();
    clasifica(home.path())
        .args(["config", "--save", "--format", "csv", "--ordered"])
        .assert()
        .success();
    assert!(home.path().join(".config/clasifica/settings.json").exists());
    clasifica(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"output_format\": \"csv\"").and(predicate::str::contains("\"ordered\": true")));
}

#[test]
fn test_relative_rules_resolved_from_input_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_rules(dir.path());
    // A same-named table in the working directory must not win.
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(cwd.path().join("reglas.csv"), "palabra_clave;categoria\nCarrefour;otra\n").unwrap();
    clasifica(dir.path())
        .current_dir(cwd.path())
        .args(["classify", "COMPRA CARREFOUR", "--rules", "reglas.csv", "--input-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("supermercado\n");
}

#[test]
fn test_interactive_run_waits_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_statement(dir.path(), "enero.csv", &["X"]);
    clasifica(dir.path())
        .args(["run", "--input-dir"])
        .arg(dir.path())
        .write_stdin("\n\n")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Press Enter to start").and(predicate::str::contains("Press Enter to exit")))
        .stderr(predicate::str::contains("Rule source unavailable"));
}

fn write_movements(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) {
    let mut content = format!("{HEADER_ROW}\n");
    for (date, desc, amount) in rows {
        content.push_str(&format!("{date};{date};{desc};{amount};EUR;0,00;EUR;{desc}\n"));
    }
    std::fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_summary_command() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    write_movements(
        dir.path(),
        "cuenta.csv",
        &[
            ("01/01/2024", "NOMINA ENERO", "1.500,00"),
            ("03/01/2024", "COMPRA CARREFOUR", "-120,50"),
            ("04/01/2024", "PAGO DECATHLON", "-60,00"),
            ("05/01/2024", "BAR PEPE", "-19,50"),
            ("20/12/2023", "COMPRA CARREFOUR", "-999,00"),
        ],
    );
    clasifica(dir.path())
        .args(["summary", "--year", "2024", "--input-dir"])
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.500,00 €"))
        .stdout(predicate::str::contains("200,00 €"))
        .stdout(predicate::str::contains("1.300,00 €"))
        .stdout(predicate::str::contains("86.7%"))
        .stdout(predicate::str::is_match("(?s)supermercado.*ocio.*\\(uncategorized\\)").unwrap())
        .stdout(predicate::str::contains("999").not())
        .stdout(predicate::str::contains("years present: 2024, 2023"));
    // Summaries never write a consolidated file.
    assert!(outputs(dir.path()).is_empty());
}

#[test]
fn test_summary_date_range() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_rules(dir.path());
    write_movements(
        dir.path(),
        "cuenta.csv",
        &[
            ("01/02/2024", "COMPRA CARREFOUR", "-10,00"),
            ("29/02/2024", "COMPRA CARREFOUR", "-20,00"),
            ("01/03/2024", "COMPRA CARREFOUR", "-40,00"),
        ],
    );
    clasifica(dir.path())
        .args(["summary", "--from", "01/02/2024", "--to", "29/02/2024", "--input-dir"])
        .arg(dir.path())
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("30,00 €"))
        .stdout(predicate::str::contains("2 transactions"));
    clasifica(dir.path())
        .args(["summary", "--from", "mañana", "--input-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a date"));
}
