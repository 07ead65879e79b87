//! 数据集写入服务 - 业务能力层
//!
//! 只负责"把一条产品记录追加为一行 JSON"，不关心流程

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::models::ProductRecord;

/// JSONL 数据集写入器
///
/// 创建时截断目标文件。写入器由调用方持有，
/// 在所有退出路径上调用 [`DatasetWriter::finish`] 落盘。
pub struct DatasetWriter {
    path: String,
    writer: BufWriter<File>,
    lines: usize,
}

impl DatasetWriter {
    /// 创建（或截断）输出文件，必要时创建父目录
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let write_err = |source: std::io::Error| ExtractError::Write {
            path: display.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let file = File::create(path).map_err(write_err)?;

        Ok(Self {
            path: display,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// 追加一行
    pub fn append(&mut self, record: &ProductRecord) -> Result<()> {
        let line = record.to_line().map_err(|e| self.write_error(e.into()))?;
        writeln!(self.writer, "{}", line).map_err(|e| self.write_error(e))?;
        self.lines += 1;
        debug!("写入第 {} 行 -> {}", self.lines, self.path);
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 落盘并关闭，返回写入的行数
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush().map_err(|e| self.write_error(e))?;
        Ok(self.lines)
    }

    fn write_error(&self, source: std::io::Error) -> ExtractError {
        ExtractError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.jsonl");
        fs::write(&path, "{\"alt\":true}\n{\"alt\":true}\n").unwrap();

        let writer = DatasetWriter::create(&path).unwrap();
        assert_eq!(writer.finish().unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("dataset.jsonl");

        let mut writer = DatasetWriter::create(&path).unwrap();
        writer
            .append(&ProductRecord::parse(r#"{"name": "A", "lcl_mm": 60}"#).unwrap())
            .unwrap();
        writer
            .append(&ProductRecord::parse(r#"{"name": "B", "vorteile": ["x", "y"]}"#).unwrap())
            .unwrap();
        assert_eq!(writer.lines_written(), 2);
        assert_eq!(writer.finish().unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"name":"A","lcl_mm":60}"#,
                r#"{"name":"B","vorteile":["x","y"]}"#
            ]
        );
    }
}
