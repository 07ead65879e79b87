//! 跳过报告写入服务 - 业务能力层
//!
//! 只负责"把跳过的文件写入报告"能力，不关心流程

use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::debug;

use crate::error::{ExtractError, Result};

/// 跳过报告
///
/// 每个被跳过的文件一行：文件名 + 原因
pub struct SkipReport {
    path: String,
}

impl SkipReport {
    /// 创建报告文件并写入带时间戳的表头（覆盖旧报告）
    pub fn create(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let header = format!(
            "{}\n跳过文件报告 - {}\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        fs::write(&path, header).map_err(|source| ExtractError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    /// 追加一条跳过记录
    pub fn record(&self, file: &str, reason: &ExtractError) -> Result<()> {
        debug!("写入跳过记录: {}", file);

        let write_err = |source: std::io::Error| ExtractError::Write {
            path: self.path.clone(),
            source,
        };

        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;

        // 原因里可能带换行（例如校验错误列表），压成一行
        let reason = reason.to_string().replace('\n', " ");
        writeln!(handle, "{} | {}", file, reason).map_err(write_err)?;

        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_one_line_per_skip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped.txt");
        fs::write(&path, "alter Inhalt\n").unwrap();

        let report = SkipReport::create(path.to_string_lossy().to_string()).unwrap();
        report
            .record(
                "b.pdf",
                &ExtractError::EmptyCompletion {
                    file: "b.pdf".to_string(),
                },
            )
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("alter Inhalt"));
        assert!(content.contains("跳过文件报告"));
        let last = content.lines().last().unwrap();
        assert!(last.starts_with("b.pdf | "));
    }
}
