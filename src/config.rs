use crate::error::{ExtractError, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 单个文件失败时的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 第一个失败的文件终止整批（坏 PDF 除外）
    #[default]
    Abort,
    /// 记录到跳过报告后继续下一个文件
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(ExtractError::Config(format!(
                "未知的失败策略 '{}'，可选值: abort | skip",
                other
            ))),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PDF 数据集目录
    pub dataset_dir: String,
    /// 输出的 JSONL 文件
    pub output_file: String,
    /// 跳过文件报告
    pub skip_report_file: String,
    pub failure_policy: FailurePolicy,
    /// 写入前按字段表校验
    pub validate_records: bool,
    /// 按文件名排序，否则沿用目录列举顺序
    pub sort_entries: bool,
    /// 在记录里附加 source_file 字段
    pub include_source_file: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub system_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_dir: "dataset".to_string(),
            output_file: "dataset.jsonl".to_string(),
            skip_report_file: "skipped.txt".to_string(),
            failure_policy: FailurePolicy::Abort,
            validate_records: true,
            sort_entries: false,
            include_source_file: false,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// 读取 TOML 配置文件，缺省的键使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ExtractError::Config(format!("无法解析配置文件 {}: {}", path.display(), e))
        })
    }

    /// CONFIG_FILE（可选）→ 环境变量覆盖 → 校验
    pub fn load() -> Result<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// 同 `load`，变量从 `lookup` 读取
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base = match lookup("CONFIG_FILE").filter(|v| !v.is_empty()) {
            Some(path) => Self::from_toml_file(Path::new(&path))?,
            None => Self::default(),
        };
        let config = base.apply_env_with(lookup);
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖已有的值，无法解析的值保持不变
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// 同 `apply_env`，变量从 `lookup` 读取；空字符串视为未设置
    pub fn apply_env_with(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let api_key = env("LLM_API_KEY").or_else(|| env("OPENAI_API_KEY"));

        Self {
            dataset_dir: env("DATASET_DIR").unwrap_or(self.dataset_dir),
            output_file: env("OUTPUT_FILE").unwrap_or(self.output_file),
            skip_report_file: env("SKIP_REPORT_FILE").unwrap_or(self.skip_report_file),
            failure_policy: env("FAILURE_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.failure_policy),
            validate_records: env("VALIDATE_RECORDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.validate_records),
            sort_entries: env("SORT_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.sort_entries),
            include_source_file: env("INCLUDE_SOURCE_FILE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.include_source_file),
            verbose_logging: env("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            llm_api_key: api_key.unwrap_or(self.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            system_prompt: env("SYSTEM_PROMPT").unwrap_or(self.system_prompt),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ExtractError::Config(
                "缺少 API Key，请设置 LLM_API_KEY 或 OPENAI_API_KEY".to_string(),
            ));
        }
        if self.llm_model_name.trim().is_empty() {
            return Err(ExtractError::Config("模型名称不能为空".to_string()));
        }
        if self.dataset_dir.trim().is_empty() || self.output_file.trim().is_empty() {
            return Err(ExtractError::Config("数据集目录和输出文件不能为空".to_string()));
        }
        Ok(())
    }
}
