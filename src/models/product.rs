//! 产品记录：LLM 返回的 JSON 对象
//!
//! 记录按原样保存（不补默认值、保持键的顺序），
//! 写入前可按 [`PRODUCT_FIELDS`] 做类型校验。

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 字段的期望类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    TextList,
    /// `YYYY-MM-DD`
    Date,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "字符串",
            FieldKind::Number => "数字",
            FieldKind::TextList => "字符串数组",
            FieldKind::Date => "YYYY-MM-DD 日期",
        }
    }
}

/// 产品记录的字段表，与提示词里的 schema 一一对应
pub const PRODUCT_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::Text),
    ("anwendungs_gebiete", FieldKind::TextList),
    ("vorteile", FieldKind::TextList),
    ("eigenschaften", FieldKind::TextList),
    ("nenn_strom_a", FieldKind::Number),
    ("strom_steuer_a_min", FieldKind::Number),
    ("strom_steuer_a_max", FieldKind::Number),
    ("nenn_leistung_w", FieldKind::Number),
    ("nenn_spannung_v", FieldKind::Number),
    ("durchmesser_mm", FieldKind::Number),
    ("laenge_mm", FieldKind::Number),
    ("laenge_mit_sockel_mm", FieldKind::Number),
    ("lcl_mm", FieldKind::Number),
    ("kabel_laenge_mm", FieldKind::Number),
    ("elekroden_abstand_mm", FieldKind::Number),
    ("produkt_gewicht_g", FieldKind::Number),
    ("max_umgebungsgtemperatur_c", FieldKind::Number),
    ("lebensdauer_h", FieldKind::Number),
    ("sockel_anode", FieldKind::Text),
    ("sockel_kathode", FieldKind::Text),
    ("kuehlung", FieldKind::Text),
    ("brennstellung", FieldKind::Text),
    ("deklarations_datum", FieldKind::Date),
    ("erzeugniss_nummern", FieldKind::TextList),
    ("stoff", FieldKind::Text),
    ("stoff_cas_nummer", FieldKind::Text),
    ("scip_nummern", FieldKind::TextList),
    ("ean", FieldKind::Text),
    ("metel_code", FieldKind::Text),
    ("seg_no", FieldKind::Text),
    ("stk_nummer", FieldKind::Text),
    ("uk_org", FieldKind::Text),
];

/// 附加的来源文件字段名
pub const SOURCE_FILE_FIELD: &str = "source_file";

const CODE_FENCE_PATTERN: &str = r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$";

/// 一条产品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord(Map<String, Value>);

impl ProductRecord {
    /// 解析 LLM 返回的内容
    ///
    /// 部分兼容 OpenAI 的服务即使在 JSON 模式下也会包一层 Markdown 代码块，这里先去掉。
    /// 顶层不是对象时返回解析错误。
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        let body = strip_code_fence(content);
        serde_json::from_str::<Map<String, Value>>(body).map(ProductRecord)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert_source_file(&mut self, filename: &str) {
        self.0.insert(
            SOURCE_FILE_FIELD.to_string(),
            Value::String(filename.to_string()),
        );
    }

    /// 单行 JSON
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    /// 校验已出现的已知字段；缺失字段和未知字段都放行
    ///
    /// 返回全部违规项，而不是遇到第一个就停。
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let violations: Vec<String> = PRODUCT_FIELDS
            .iter()
            .filter_map(|(name, kind)| {
                let value = self.0.get(*name)?;
                check_field(value, *kind).map(|actual| {
                    format!("{}: 期望{}，实际为 {}", name, kind.describe(), actual)
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl From<Map<String, Value>> for ProductRecord {
    fn from(map: Map<String, Value>) -> Self {
        ProductRecord(map)
    }
}

fn strip_code_fence(content: &str) -> &str {
    let re = match Regex::new(CODE_FENCE_PATTERN) {
        Ok(re) => re,
        Err(_) => return content,
    };
    re.captures(content)
        .and_then(|cap| cap.get(1))
        .map_or(content, |m| m.as_str())
}

/// 类型不符时返回实际值的描述；null 总是允许
fn check_field(value: &Value, kind: FieldKind) -> Option<String> {
    let ok = match (kind, value) {
        (_, Value::Null) => true,
        (FieldKind::Text, Value::String(_)) => true,
        (FieldKind::Number, Value::Number(_)) => true,
        (FieldKind::TextList, Value::Array(items)) => items.iter().all(Value::is_string),
        (FieldKind::Date, Value::String(s)) => {
            s.is_empty() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        }
        _ => false,
    };

    if ok {
        None
    } else {
        Some(describe_value(value))
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("布尔值 {}", b),
        Value::Number(n) => format!("数字 {}", n),
        Value::String(s) => format!("字符串 \"{}\"", s),
        Value::Array(_) => "包含非字符串元素的数组".to_string(),
        Value::Object(_) => "对象".to_string(),
    }
}
