// ==========================================
// GPL Cart - CSV export
// ==========================================
// Writes the same column layout the import handlers read, so an
// exported file can be imported again.
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::ImportOptions;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::handler_trait::ImportContext;
use crate::importer::registry::HandlerRegistry;
use crate::repository::{Conditions, Database, QueryOptions};
use csv::WriterBuilder;
use std::path::Path;
use tracing::info;

pub struct Exporter {
    db: Database,
    registry: HandlerRegistry,
    ctx: ImportContext,
    delimiter: u8,
}

impl Exporter {
    /// Exporter with default delimiters
    pub fn new(db: Database) -> Self {
        Self {
            db,
            registry: HandlerRegistry::with_defaults(),
            ctx: ImportContext::default(),
            delimiter: b',',
        }
    }

    /// Exporter using the configured delimiters
    pub async fn from_config(db: Database, config: &dyn ImportConfigReader) -> ImportResult<Self> {
        Ok(Self {
            db,
            registry: HandlerRegistry::with_defaults(),
            ctx: ImportContext::load(config, ImportOptions::default()).await?,
            delimiter: config.get_csv_delimiter().await?,
        })
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Write the handler's header and one line per matching record
    ///
    /// # Returns
    /// - number of data lines written
    pub fn export(
        &self,
        handler_id: &str,
        path: &Path,
        conditions: &Conditions,
    ) -> ImportResult<usize> {
        let handler = self.registry.get(handler_id)?;
        let records = self.db.fetch_all(
            handler.table(),
            conditions,
            &QueryOptions::new().order_by(handler.id_column()),
        )?;

        let write_err = |e: csv::Error| ImportError::CsvWriteError(e.to_string());
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(write_err)?;

        writer.write_record(handler.columns()).map_err(write_err)?;
        for record in &records {
            writer
                .write_record(handler.export_row(record, &self.ctx))
                .map_err(write_err)?;
        }
        writer.flush()?;

        info!(handler = handler_id, path = %path.display(), rows = records.len(), "export done");
        Ok(records.len())
    }
}
