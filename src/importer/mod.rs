// ==========================================
// GPL Cart - CSV import/export layer
// ==========================================
// One handler per entity (product, category, user, field, field_value).
// Jobs read the file in resumable chunks; every row runs in its own
// transaction and failed rows go to a per-job error log.
// ==========================================

pub mod csv_reader;
pub mod data_cleaner;
pub mod error;
pub mod error_log;
pub mod exporter;
pub mod handler_trait;
pub mod handlers;
pub mod job_runner;
pub mod registry;

pub use csv_reader::{CsvChunk, CsvReader, CsvRow};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use error_log::{ErrorLog, ErrorLogEntry};
pub use exporter::Exporter;
pub use handler_trait::{ImportContext, ImportHandler, RowOutcome};
pub use handlers::{
    CategoryImportHandler, FieldImportHandler, FieldValueImportHandler, ProductImportHandler,
    UserImportHandler,
};
pub use job_runner::{ImportJobRunner, JobExecutor};
pub use registry::HandlerRegistry;
