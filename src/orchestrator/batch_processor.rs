//! 批量数据集处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责整个数据集目录的处理和输出文件的生命周期。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、创建 LLM 服务和 PDF 提取器
//! 2. **目录扫描**：列出数据集目录中的所有文件
//! 3. **逐个处理**：提取文本 → 构建提示词 → LLM → 解析 → 校验 → 追加一行
//! 4. **失败策略**：按 `FailurePolicy` 决定终止整批还是跳过
//! 5. **资源管理**：唯一持有输出文件，任何退出路径都先落盘
//! 6. **全局统计**：汇总处理结果
//!
//! 严格顺序执行：每个文件的请求完成后才开始下一个文件。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, FailurePolicy};
use crate::error::{BoxError, ExtractError, Result};
use crate::models::{Document, ProductRecord};
use crate::services::{
    build_prompt, CompletionClient, DatasetWriter, LlmService, LopdfExtractor, PageExtractor,
    SkipReport,
};
use crate::utils::logging::{
    log_files_found, log_startup, print_final_stats, progress_notice, truncate_text,
};

/// 数据集目录中的一个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub name: String,
    pub path: PathBuf,
}

/// 被跳过的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// 一次运行的统计
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// 目录中的文件数
    pub total: usize,
    /// 成功写入的记录数
    pub processed: usize,
    pub skipped: Vec<SkippedFile>,
    /// 输出文件最终的行数
    pub written: usize,
}

/// 应用主结构
pub struct App<E = LopdfExtractor, C = LlmService> {
    config: Config,
    extractor: Arc<E>,
    client: C,
}

impl App {
    /// 初始化应用（lopdf + async-openai）
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate()?;
        let client = LlmService::new(&config);
        Ok(Self::with_components(config, LopdfExtractor::new(), client))
    }
}

impl<E, C> App<E, C>
where
    E: PageExtractor + Send + Sync + 'static,
    C: CompletionClient,
{
    /// 使用自定义的提取器和 LLM 客户端
    pub fn with_components(config: Config, extractor: E, client: C) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            client,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        log_startup(&self.config);

        let entries = list_dataset(&self.config.dataset_dir, self.config.sort_entries).await?;
        if entries.is_empty() {
            warn!("⚠️ 数据集目录 {} 中没有文件", self.config.dataset_dir);
        }
        log_files_found(entries.len(), &self.config.dataset_dir);

        let mut writer = DatasetWriter::create(&self.config.output_file)?;
        let skip_report = SkipReport::create(self.config.skip_report_file.clone())?;

        let outcome = self.process_all(&entries, &mut writer, &skip_report).await;

        // 不论成功与否都先落盘，已写入的行不会丢
        let flushed = writer.finish();

        let summary = match (outcome, flushed) {
            (Err(e), _) => {
                error!("❌ 批处理中止: {}", e);
                return Err(e);
            }
            (Ok(_), Err(e)) => return Err(e),
            (Ok(mut summary), Ok(lines)) => {
                summary.written = lines;
                summary
            }
        };

        print_final_stats(&summary, &self.config);

        Ok(summary)
    }

    /// 依次处理所有文件
    async fn process_all(
        &self,
        entries: &[DatasetEntry],
        writer: &mut DatasetWriter,
        skip_report: &SkipReport,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary {
            total: entries.len(),
            ..Default::default()
        };

        for (idx, entry) in entries.iter().enumerate() {
            info!("[{}/{}] 📄 正在处理: {}", idx + 1, entries.len(), entry.name);

            match self.process_file(&entry.name, &entry.path).await {
                Ok(record) => {
                    writer.append(&record)?;
                    summary.processed += 1;
                    // 进度提示直接写 stdout，不受日志级别过滤
                    println!("{}", progress_notice(&entry.name));
                }
                Err(e) if self.should_skip(&e) => {
                    warn!("⚠️ 跳过文件 {}: {}", entry.name, e);
                    skip_report.record(&entry.name, &e)?;
                    summary.skipped.push(SkippedFile {
                        file: entry.name.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// 处理单个 PDF，返回要写入的产品记录
    pub async fn process_file(&self, name: &str, path: &Path) -> Result<ProductRecord> {
        // lopdf 解析是阻塞的，放到 blocking 线程池
        let extractor = Arc::clone(&self.extractor);
        let owned_path = path.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&owned_path))
            .await
            .map_err(|e| Box::new(e) as BoxError)
            .and_then(|extracted| extracted)
            .map_err(|source| ExtractError::Extraction {
                file: name.to_string(),
                source,
            })?;

        let document = Document::new(name, pages);
        if document.text_page_count() < document.pages.len() {
            debug!(
                "{}: {}/{} 页没有可提取的文本",
                name,
                document.pages.len() - document.text_page_count(),
                document.pages.len()
            );
        }

        let prompt = build_prompt(&document.text());

        let content = self
            .client
            .complete_json(&self.config.system_prompt, &prompt)
            .await
            .map_err(|source| ExtractError::Completion {
                file: name.to_string(),
                source,
            })?
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ExtractError::EmptyCompletion {
                file: name.to_string(),
            })?;

        debug!("LLM 响应: {}", truncate_text(&content, 200));

        let mut record =
            ProductRecord::parse(&content).map_err(|source| ExtractError::MalformedJson {
                file: name.to_string(),
                source,
            })?;

        if self.config.validate_records {
            record
                .validate()
                .map_err(|violations| ExtractError::Validation {
                    file: name.to_string(),
                    violations,
                })?;
        }

        if self.config.include_source_file {
            record.insert_source_file(name);
        }

        Ok(record)
    }

    fn should_skip(&self, err: &ExtractError) -> bool {
        match self.config.failure_policy {
            FailurePolicy::Skip => err.is_per_file(),
            FailurePolicy::Abort => err.is_recoverable(),
        }
    }
}

/// 列出数据集目录中的文件（不过滤扩展名，跳过子目录）
///
/// 默认保持目录列举的原始顺序，`sort` 为 true 时按文件名排序。
/// 无法读取元数据的条目（例如失效的符号链接）保留下来，
/// 由提取阶段报 `Extraction` 错误并按失败策略处理。
pub async fn list_dataset(dir: &str, sort: bool) -> Result<Vec<DatasetEntry>> {
    info!("\n📁 正在扫描数据集目录: {}", dir);

    let dir_err = |source: std::io::Error| ExtractError::DatasetDir {
        path: dir.to_string(),
        source,
    };

    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(dir_err)?;

    while let Some(entry) = read_dir.next_entry().await.map_err(dir_err)? {
        let path = entry.path();
        if is_directory(&entry, &path).await {
            debug!("跳过子目录: {}", path.display());
            continue;
        }
        entries.push(DatasetEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path,
        });
    }

    if sort {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(entries)
}

/// 目录（或指向目录的链接）返回 true；元数据读不到时按文件处理
async fn is_directory(entry: &tokio::fs::DirEntry, path: &Path) -> bool {
    match entry.file_type().await {
        Ok(file_type) if file_type.is_dir() => true,
        Ok(file_type) if file_type.is_symlink() => match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) => {
                warn!("⚠️ 无法解析链接 {}: {}", path.display(), e);
                false
            }
        },
        Ok(_) => false,
        Err(e) => {
            warn!("⚠️ 无法读取 {} 的文件类型: {}", path.display(), e);
            false
        }
    }
}
