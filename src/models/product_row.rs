//! 产品表的一行：JSONL 数据集导入数据库时使用的强类型记录
//!
//! 字段缺失或为 `null` 时为 `None`；类型不符（比如数字字段给了字符串）解析失败。
//! 列名与 JSON 键一致，只有 `strom_steuer_a_max` 在表里叫 `stroem_steuer_a_max`。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::BufRead;
use std::path::Path;

use super::product::{FieldKind, PRODUCT_FIELDS};
use crate::error::{ExtractError, Result};

/// 产品表名
pub const PRODUCT_TABLE: &str = "product_data";

/// JSON 键对应的列名
pub fn column_name(field: &str) -> &str {
    match field {
        "strom_steuer_a_max" => "stroem_steuer_a_max",
        other => other,
    }
}

/// 按列顺序的全部列名
pub fn product_columns() -> impl Iterator<Item = &'static str> {
    PRODUCT_FIELDS.iter().map(|(field, _)| column_name(*field))
}

fn sql_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "VARCHAR",
        FieldKind::Number => "REAL",
        FieldKind::TextList => "JSONB",
        FieldKind::Date => "DATE",
    }
}

/// 重建产品表的 DDL（先删后建）
pub fn create_table_sql() -> String {
    let columns = PRODUCT_FIELDS
        .iter()
        .map(|(field, kind)| format!("  {} {}", column_name(field), sql_type(*kind)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} (\n{columns}\n);",
        table = PRODUCT_TABLE,
        columns = columns
    )
}

/// 插入一行的参数化语句，占位符 `$1..$32` 与 [`ProductRow::insert_params`] 一一对应
pub fn insert_sql() -> String {
    let columns: Vec<&str> = product_columns().collect();
    let placeholders = (1..=columns.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        PRODUCT_TABLE,
        columns.join(", "),
        placeholders
    )
}

/// 产品表的一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: Option<String>,
    pub anwendungs_gebiete: Option<Vec<String>>,
    pub vorteile: Option<Vec<String>>,
    pub eigenschaften: Option<Vec<String>>,
    pub nenn_strom_a: Option<f64>,
    pub strom_steuer_a_min: Option<f64>,
    pub strom_steuer_a_max: Option<f64>,
    pub nenn_leistung_w: Option<f64>,
    pub nenn_spannung_v: Option<f64>,
    pub durchmesser_mm: Option<f64>,
    pub laenge_mm: Option<f64>,
    pub laenge_mit_sockel_mm: Option<f64>,
    pub lcl_mm: Option<f64>,
    pub kabel_laenge_mm: Option<f64>,
    pub elekroden_abstand_mm: Option<f64>,
    pub produkt_gewicht_g: Option<f64>,
    pub max_umgebungsgtemperatur_c: Option<f64>,
    pub lebensdauer_h: Option<f64>,
    pub sockel_anode: Option<String>,
    pub sockel_kathode: Option<String>,
    pub kuehlung: Option<String>,
    pub brennstellung: Option<String>,
    pub deklarations_datum: Option<String>,
    pub erzeugniss_nummern: Option<Vec<String>>,
    pub stoff: Option<String>,
    pub stoff_cas_nummer: Option<String>,
    pub scip_nummern: Option<Vec<String>>,
    pub ean: Option<String>,
    pub metel_code: Option<String>,
    pub seg_no: Option<String>,
    pub stk_nummer: Option<String>,
    pub uk_org: Option<String>,
}

impl ProductRow {
    /// 解析数据集中的一行
    pub fn from_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// 按列顺序的插入参数；数组字段以 JSON 数组传给 JSONB 列
    pub fn insert_params(&self) -> serde_json::Result<Vec<Value>> {
        let value = serde_json::to_value(self)?;
        Ok(PRODUCT_FIELDS
            .iter()
            .map(|(field, _)| value.get(*field).cloned().unwrap_or(Value::Null))
            .collect())
    }
}

/// 读取整个 JSONL 数据集，空行忽略
///
/// 任何一行解析失败都返回错误，并带上行号。
pub fn load_rows(path: &Path) -> Result<Vec<ProductRow>> {
    let path_str = path.display().to_string();
    let read_err = |source: std::io::Error| ExtractError::Read {
        path: path_str.clone(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_err)?;
    let mut rows = Vec::new();

    for (idx, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.map_err(read_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let row = ProductRow::from_line(&line).map_err(|source| ExtractError::DatasetLine {
            path: path_str.clone(),
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_sparse_line() {
        let row = ProductRow::from_line(
            r#"{"name": "XBO 2500 W/HS XL OFR", "nenn_strom_a": 90, "lcl_mm": null, "scip_nummern": ["a1b2"], "source_file": "xbo.pdf"}"#,
        )
        .unwrap();
        assert_eq!(row.name.as_deref(), Some("XBO 2500 W/HS XL OFR"));
        assert_eq!(row.nenn_strom_a, Some(90.0));
        assert_eq!(row.lcl_mm, None);
        assert_eq!(row.laenge_mm, None);
        assert_eq!(row.scip_nummern, Some(vec!["a1b2".to_string()]));
    }

    #[test]
    fn test_row_rejects_wrong_type() {
        assert!(ProductRow::from_line(r#"{"nenn_leistung_w": "40 W"}"#).is_err());
        assert!(ProductRow::from_line(r#"{"vorteile": "hell"}"#).is_err());
    }

    #[test]
    fn test_insert_params_follow_column_order() {
        let row = ProductRow {
            name: Some("XK-100".to_string()),
            strom_steuer_a_max: Some(12.5),
            uk_org: Some("UK".to_string()),
            ..ProductRow::default()
        };
        let params = row.insert_params().unwrap();
        let columns: Vec<&str> = product_columns().collect();

        assert_eq!(params.len(), columns.len());
        assert_eq!(params[0], "XK-100");
        let max_idx = columns.iter().position(|c| *c == "stroem_steuer_a_max").unwrap();
        assert_eq!(params[max_idx], 12.5);
        assert_eq!(params[columns.len() - 1], "UK");
        assert_eq!(params[1], Value::Null);
    }

    #[test]
    fn test_insert_sql_has_one_placeholder_per_column() {
        let sql = insert_sql();
        assert!(sql.starts_with("INSERT INTO product_data (name, anwendungs_gebiete"));
        assert!(sql.contains("stroem_steuer_a_max"));
        assert!(sql.contains("$32)"));
        assert!(!sql.contains("$33"));
    }

    #[test]
    fn test_create_table_sql_types() {
        let ddl = create_table_sql();
        assert!(ddl.starts_with("DROP TABLE IF EXISTS product_data;"));
        assert!(ddl.contains("  name VARCHAR,"));
        assert!(ddl.contains("  vorteile JSONB,"));
        assert!(ddl.contains("  stroem_steuer_a_max REAL,"));
        assert!(ddl.contains("  deklarations_datum DATE,"));
        assert!(ddl.ends_with("  uk_org VARCHAR\n);"));
    }

    #[test]
    fn test_load_rows_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        std::fs::write(
            &path,
            "{\"name\":\"A\"}\n\n{\"name\":\"B\",\"lebensdauer_h\":3000}\n",
        )
        .unwrap();
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].lebensdauer_h, Some(3000.0));

        std::fs::write(&path, "{\"name\":\"A\"}\n{\"name\": 5}\n").unwrap();
        assert!(matches!(
            load_rows(&path),
            Err(ExtractError::DatasetLine { line: 2, .. })
        ));
    }
}
