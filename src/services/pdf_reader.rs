//! PDF 文本提取 - 业务能力层
//!
//! 只负责"把一个 PDF 变成逐页文本"，不关心流程

use crate::error::BoxError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// 逐页文本提取能力
///
/// 返回值按页码排序；没有可提取文本的页面为 `None`。
/// 文件打不开或不是合法 PDF 时返回错误。
pub trait PageExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>, BoxError>;
}

/// 基于 lopdf 的提取实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<Option<String>>, BoxError> {
        let doc = Document::load(path)?;
        let pages = doc.get_pages();
        debug!("{}: 共 {} 页", path.display(), pages.len());

        let texts = pages
            .keys()
            .map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    debug!("第 {} 页无法提取文本: {}", page_number, e);
                    None
                }
            })
            .collect();

        Ok(texts)
    }
}
