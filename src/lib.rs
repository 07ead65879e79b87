//! # Datasheet Extract
//!
//! 从 PDF 产品数据表中提取结构化产品属性的 Rust 应用程序：
//! 逐页提取文本，交给 LLM 按固定 JSON schema 解析，每个文档输出一行 JSON。
//!
//! ## 架构设计
//!
//! ### ① 模型层（Models）
//! - `models/` - `Document`（逐页文本）和 `ProductRecord`（LLM 返回的记录 + 字段表）
//! - `ProductRow` - 数据集导入数据库用的强类型行，附带建表和插入语句
//! - `Query` - 结构化查询及其参数化 SQL
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `PageExtractor` - PDF 逐页文本提取（lopdf）
//! - `build_prompt` - 提示词构建
//! - `LlmService` - JSON 模式的对话补全
//! - `DatasetWriter` / `SkipReport` - 写 JSONL 数据集 / 跳过报告
//! - `question_to_query` - 自然语言问题转查询对象
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 扫描目录、顺序处理、失败策略、统计
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::{Config, FailurePolicy};
pub use error::{ExtractError, LlmError, Result};
pub use models::{Document, ProductRecord, ProductRow, Query};
pub use orchestrator::{App, RunSummary};
pub use services::{build_prompt, question_to_query, CompletionClient, PageExtractor};
