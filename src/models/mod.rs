pub mod document;
pub mod product;
pub mod product_row;
pub mod query;

pub use document::Document;
pub use product::{FieldKind, ProductRecord, PRODUCT_FIELDS, SOURCE_FILE_FIELD};
pub use product_row::{create_table_sql, insert_sql, load_rows, ProductRow, PRODUCT_TABLE};
pub use query::{Operation, Query, QueryType, Where};
