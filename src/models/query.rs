//! 结构化查询：LLM 把用户问题翻译成的查询对象，以及对应的参数化 SQL
//!
//! 字段名不会拼进 SQL 之前都要过一遍列名白名单，值一律走 `$n` 占位符。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::{FieldKind, PRODUCT_FIELDS};
use super::product_row::{column_name, PRODUCT_TABLE};
use crate::error::{ExtractError, Result};

/// 返回一行还是多行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Many,
    One,
}

/// 比较运算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Eq,
    Gte,
    Lte,
    Gt,
    Lt,
}

impl Operation {
    pub fn db_str(self) -> &'static str {
        match self {
            Operation::Eq => "=",
            Operation::Gte => ">=",
            Operation::Lte => "<=",
            Operation::Gt => ">",
            Operation::Lt => "<",
        }
    }
}

/// 单个过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Where {
    pub field: String,
    pub value: Value,
    pub op: Operation,
}

/// 查询对象，条件之间是 AND
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "type")]
    pub query_type: QueryType,
    #[serde(rename = "where", default)]
    pub conditions: Vec<Where>,
    pub return_fields: Vec<String>,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    query: Query,
}

impl Query {
    /// 解析 `{"query": {...}}` 形式的 LLM 回复
    pub fn from_reply(content: &str) -> Result<Self> {
        serde_json::from_str::<QueryEnvelope>(content)
            .map(|envelope| envelope.query)
            .map_err(|e| ExtractError::InvalidQuery(format!("无法解析查询对象: {}", e)))
    }

    /// 生成参数化 SQL 和参数列表
    ///
    /// 数组列（`erzeugniss_nummern`、`scip_nummern`）上的 `eq` 翻译成 JSONB 的 `?`，
    /// 即"数组里包含这个字符串"。
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        if self.return_fields.is_empty() {
            return Err(ExtractError::InvalidQuery("return_fields 不能为空".to_string()));
        }

        let columns = self
            .return_fields
            .iter()
            .map(|field| resolve_column(field).map(|(column, _)| column))
            .collect::<Result<Vec<_>>>()?;

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), PRODUCT_TABLE);
        let mut args = Vec::with_capacity(self.conditions.len());

        for (idx, condition) in self.conditions.iter().enumerate() {
            let (column, kind) = resolve_column(&condition.field)?;
            sql.push_str(if idx == 0 { " WHERE " } else { " AND " });
            sql.push_str(&where_clause(column, kind, condition.op, idx + 1));
            args.push(condition.value.clone());
        }

        Ok((sql, args))
    }
}

fn where_clause(column: &str, kind: FieldKind, op: Operation, arg: usize) -> String {
    if op == Operation::Eq && kind == FieldKind::TextList {
        format!("{} ? ${}", column, arg)
    } else {
        format!("{} {} ${}", column, op.db_str(), arg)
    }
}

/// 字段名（JSON 键或列名都可以）→ 列名和类型
fn resolve_column(field: &str) -> Result<(&'static str, FieldKind)> {
    PRODUCT_FIELDS
        .iter()
        .find(|(name, _)| *name == field || column_name(name) == field)
        .map(|(name, kind)| (column_name(*name), *kind))
        .ok_or_else(|| ExtractError::InvalidQuery(format!("未知字段: {}", field)))
}
