/// 一份输入 PDF：文件名 + 按页码排列的页面文本
///
/// 没有可提取文本的页面记为 `None`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub pages: Vec<Option<String>>,
}

impl Document {
    pub fn new(filename: impl Into<String>, pages: Vec<Option<String>>) -> Self {
        Self {
            filename: filename.into(),
            pages,
        }
    }

    /// 全文：页面之间以换行分隔，空页按空字符串处理
    pub fn text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 有文本的页数
    pub fn text_page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}
