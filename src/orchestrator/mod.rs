//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整个数据集的调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量数据集处理器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 扫描数据集目录
//! - 持有输出文件和跳过报告
//! - 按失败策略决定终止还是跳过
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理整个目录)
//!     ↓
//! services (能力层：pdf_reader / prompt / llm / dataset_writer / skip_report)
//!     ↓
//! models (Document / ProductRecord)
//! ```

pub mod batch_processor;

pub use batch_processor::{list_dataset, App, DatasetEntry, RunSummary, SkippedFile};
