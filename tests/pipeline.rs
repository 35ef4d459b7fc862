use std::path::{Path, PathBuf};

use calamine::Reader;

use clasifica::output::{XlsxSink, HEADER};
use clasifica::pipeline::{run, BlockOrder, RunConfig};

fn write_rules_xlsx(path: &Path, rows: &[(&str, &str)]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "palabra_clave").unwrap();
    sheet.write_string(0, 1, "categoria").unwrap();
    for (i, (keyword, category)) in rows.iter().enumerate() {
        sheet.write_string(i as u32 + 1, 0, *keyword).unwrap();
        sheet.write_string(i as u32 + 1, 1, *category).unwrap();
    }
    workbook.save(path).unwrap();
}

fn write_statement(dir: &Path, name: &str, descriptions: &[&str]) {
    let mut content = String::from(
        "Fecha contable;Fecha valor;Concepto;Importe;Moneda;Saldo;Moneda;Concepto ampliado\n",
    );
    for desc in descriptions {
        content.push_str(&format!("05/03/2024;05/03/2024;{desc};-3,20;EUR;90,00;EUR;\n"));
    }
    std::fs::write(dir.join(name), content).unwrap();
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = calamine::open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range("Datos").unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn config(dir: &Path, order: BlockOrder) -> RunConfig {
    RunConfig {
        input_dir: dir.to_path_buf(),
        rules_path: dir.join("relacion_clave_categoria.xlsx"),
        output_dir: dir.to_path_buf(),
        order,
    }
}

#[test]
fn test_end_to_end_categories() {
    let dir = tempfile::tempdir().unwrap();
    write_rules_xlsx(
        &dir.path().join("relacion_clave_categoria.xlsx"),
        &[("Carrefour", "Supermercado"), ("Decathlon", "ocio")],
    );
    write_statement(dir.path(), "cuenta.csv", &["COMPRA CARREFOUR MADRID", "PAGO DECATHLON", "OTRO COMERCIO"]);

    let report = run(&config(dir.path(), BlockOrder::Completion), &XlsxSink).unwrap();
    let rows = read_rows(&report.output);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], HEADER.to_vec());
    let categories: Vec<&str> = rows[1..].iter().map(|r| r[8].as_str()).collect();
    assert_eq!(categories, ["supermercado", "ocio", ""]);
}

#[test]
fn test_repeat_runs_give_distinct_files_with_same_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_rules_xlsx(&dir.path().join("relacion_clave_categoria.xlsx"), &[("Carrefour", "supermercado")]);
    write_statement(dir.path(), "a.csv", &["A1 CARREFOUR", "A2", "A3"]);
    write_statement(dir.path(), "b.csv", &["B1", "B2 carrefour"]);
    write_statement(dir.path(), "c.csv", &["C1"]);

    let first = run(&config(dir.path(), BlockOrder::Completion), &XlsxSink).unwrap();
    let second = run(&config(dir.path(), BlockOrder::Completion), &XlsxSink).unwrap();
    assert_ne!(first.output, second.output);
    // The first run's output is not picked up as an input by the second.
    assert_eq!(second.discovered, 3);

    let mut rows_a = read_rows(&first.output);
    let mut rows_b = read_rows(&second.output);
    assert_eq!(rows_a.len(), 7);
    // Within a file, order is fixed.
    for rows in [&rows_a, &rows_b] {
        let a_rows: Vec<&str> = rows.iter().filter(|r| r[2].starts_with('A')).map(|r| r[2].as_str()).collect();
        assert_eq!(a_rows, ["A1 CARREFOUR", "A2", "A3"]);
    }
    rows_a.sort();
    rows_b.sort();
    assert_eq!(rows_a, rows_b);
}

#[test]
fn test_ordered_run_follows_file_names() {
    let dir = tempfile::tempdir().unwrap();
    write_rules_xlsx(&dir.path().join("relacion_clave_categoria.xlsx"), &[("x", "y")]);
    for name in ["c", "a", "d", "b"] {
        write_statement(dir.path(), &format!("{name}.csv"), &[&name.to_uppercase()]);
    }
    let report = run(&config(dir.path(), BlockOrder::Discovery), &XlsxSink).unwrap();
    let rows = read_rows(&report.output);
    let descriptions: Vec<&str> = rows[1..].iter().map(|r| r[2].as_str()).collect();
    assert_eq!(descriptions, ["A", "B", "C", "D"]);
    let summary: Vec<PathBuf> = report.files.iter().map(|f| f.path.clone()).collect();
    let mut sorted = summary.clone();
    sorted.sort();
    assert_eq!(summary, sorted);
}
