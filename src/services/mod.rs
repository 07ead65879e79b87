pub mod dataset_writer;
pub mod llm_service;
pub mod pdf_reader;
pub mod prompt;
pub mod query_planner;
pub mod skip_report;

pub use dataset_writer::DatasetWriter;
pub use llm_service::{CompletionClient, LlmService};
pub use pdf_reader::{LopdfExtractor, PageExtractor};
pub use prompt::build_prompt;
pub use query_planner::question_to_query;
pub use skip_report::SkipReport;
