use thiserror::Error;

/// 装箱的底层错误（PDF 解析器等第三方库错误）
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 批处理错误类型
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 数据集目录无法读取
    #[error("无法读取数据集目录 ({path}): {source}")]
    DatasetDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// PDF 无法打开或解析
    #[error("PDF 文本提取失败 ({file}): {source}")]
    Extraction {
        file: String,
        #[source]
        source: BoxError,
    },

    /// LLM 调用失败
    #[error("LLM 调用失败 ({file}): {source}")]
    Completion {
        file: String,
        #[source]
        source: LlmError,
    },

    /// LLM 没有返回任何内容
    #[error("LLM 没有返回内容 (文件: {file})")]
    EmptyCompletion { file: String },

    /// 返回内容不是 JSON 对象
    #[error("LLM 返回的 JSON 无法解析 ({file}): {source}")]
    MalformedJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// 产品记录与字段表不符
    #[error("产品记录校验失败 ({file}): {}", .violations.join("; "))]
    Validation {
        file: String,
        violations: Vec<String>,
    },

    /// 输出文件写入失败
    #[error("写入文件失败 ({path}): {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 输入文件读取失败
    #[error("读取文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 数据集中的某一行不是合法的产品记录
    #[error("数据集 {path} 第 {line} 行无法解析: {source}")]
    DatasetLine {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// 查询对象无效（未知字段、缺少返回字段、回复格式不对）
    #[error("查询无效: {0}")]
    InvalidQuery(String),

    /// 问题转查询时 LLM 调用失败
    #[error("问题转查询失败: {0}")]
    QueryPlanning(#[source] LlmError),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

impl ExtractError {
    /// 出错的文件名（仅单文件错误有）
    pub fn file(&self) -> Option<&str> {
        match self {
            ExtractError::Extraction { file, .. }
            | ExtractError::Completion { file, .. }
            | ExtractError::EmptyCompletion { file }
            | ExtractError::MalformedJson { file, .. }
            | ExtractError::Validation { file, .. } => Some(file.as_str()),
            _ => None,
        }
    }

    /// 单文件错误：只影响当前文件，可以按策略跳过
    pub fn is_per_file(&self) -> bool {
        self.file().is_some()
    }

    /// 无论何种策略都跳过的错误（坏 PDF）
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExtractError::Extraction { .. })
    }
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 请求构建失败
    #[error("构建 LLM 请求失败: {0}")]
    RequestBuildFailed(#[source] async_openai::error::OpenAIError),

    /// API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
}

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, ExtractError>;
