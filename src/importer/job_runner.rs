// ==========================================
// GPL Cart - resumable import job runner
// ==========================================
// A job is checkpointed in the `job` table by byte offset and line
// counter after every step, so it can be resumed by any later call.
// ==========================================
// Flow per step: read chunk -> one transaction per row -> error log ->
// advance offset/line/counters -> Finished at EOF
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{ImportOptions, Job, JobStatus};
use crate::i18n::t_with_args;
use crate::importer::csv_reader::{CsvChunk, CsvReader};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::error_log::{ErrorLog, ErrorLogEntry};
use crate::importer::handler_trait::{ImportContext, ImportHandler, RowOutcome};
use crate::importer::registry::HandlerRegistry;
use crate::repository::{Database, JobRepository};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// JobExecutor Trait
// ==========================================
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Register a new job
    ///
    /// # Errors
    /// - UnknownHandler / FileNotFound
    /// - HeaderMismatch: the header lacks a required column
    async fn create_job(
        &self,
        handler_id: &str,
        file: &Path,
        options: ImportOptions,
    ) -> ImportResult<Job>;

    /// Import the next chunk of a job
    ///
    /// Steps on finished, failed or cancelled jobs return the job unchanged.
    async fn process_step(&self, job_id: &str) -> ImportResult<Job>;

    /// Step until the job is no longer pending or running
    async fn run(&self, job_id: &str) -> ImportResult<Job>;

    /// Run several jobs concurrently; each result is independent
    async fn run_batch(&self, job_ids: Vec<String>) -> Vec<ImportResult<Job>>;

    async fn cancel(&self, job_id: &str) -> ImportResult<Job>;

    async fn get_job(&self, job_id: &str) -> ImportResult<Job>;

    /// Percent of the file's bytes processed
    async fn progress(&self, job_id: &str) -> ImportResult<u8>;
}

// ==========================================
// ImportJobRunner
// ==========================================
pub struct ImportJobRunner<C>
where
    C: ImportConfigReader,
{
    db: Database,
    jobs: JobRepository,
    registry: HandlerRegistry,
    config: Arc<C>,
    log_dir: PathBuf,
}

impl<C> ImportJobRunner<C>
where
    C: ImportConfigReader,
{
    /// # Arguments
    /// - db: shared database
    /// - config: settings reader
    /// - log_dir: directory for per-job error logs
    pub fn new(db: Database, config: Arc<C>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            jobs: JobRepository::new(db.clone()),
            db,
            registry: HandlerRegistry::with_defaults(),
            config,
            log_dir: log_dir.into(),
        }
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    fn load(&self, job_id: &str) -> ImportResult<Job> {
        self.jobs
            .find(job_id)?
            .ok_or_else(|| ImportError::JobNotFound(job_id.to_string()))
    }

    fn fail(&self, mut job: Job, err: &ImportError) -> ImportResult<Job> {
        error!(job_id = %job.job_id, error = %err, "import job failed");
        job.status = JobStatus::Failed;
        job.message = match err {
            ImportError::FileNotFound(path) => t_with_args("import.file_not_found", &[("path", path)]),
            other => t_with_args("import.unreadable", &[("error", &other.to_string())]),
        };
        job.modified = Utc::now().timestamp();
        if !self.jobs.save_active(&job)? {
            return self.load(&job.job_id);
        }
        Ok(job)
    }

    /// Store a step's checkpoint unless the job ended meanwhile
    ///
    /// A job cancelled during the step keeps its stored status; the
    /// counters of the rows already committed are still recorded.
    fn checkpoint(&self, mut job: Job) -> ImportResult<Job> {
        if self.jobs.save_active(&job)? {
            return Ok(job);
        }
        let stored = self.load(&job.job_id)?;
        info!(job_id = %job.job_id, status = %stored.status, "job ended during step");
        job.status = stored.status;
        job.message = stored.message;
        self.jobs.save(&job)?;
        Ok(job)
    }

    async fn read_chunk(&self, job: &Job) -> ImportResult<CsvChunk> {
        let rows = match job.options.limit_rows {
            Some(rows) => rows,
            None => self.config.get_import_limit().await?,
        };
        let bytes = match job.options.limit_bytes {
            Some(bytes) => bytes,
            None => self.config.get_import_limit_bytes().await?,
        };
        let delimiter = self.config.get_csv_delimiter().await?;

        CsvReader::open(&job.file)?
            .delimiter(delimiter)
            .offset(job.offset)
            .start_line(job.line)
            .max_rows(rows)
            .limit(bytes)
            .parse()
    }

    /// Import every row of a chunk, one transaction per row
    fn import_rows(
        &self,
        job: &mut Job,
        handler: &dyn ImportHandler,
        chunk: &CsvChunk,
        ctx: &ImportContext,
    ) -> Vec<ErrorLogEntry> {
        let mut failures = Vec::new();

        for row in &chunk.rows {
            let result = self.db.transaction(|ex| handler.import_row(ex, row, ctx));
            match result {
                Ok(RowOutcome::Inserted(_)) => job.inserted += 1,
                Ok(RowOutcome::Updated(_)) => job.updated += 1,
                Err(err) => {
                    job.errors += 1;
                    let messages = match &err {
                        ImportError::RowRejected { .. } => err.messages(),
                        other => vec![t_with_args("import.row_failed", &[("error", &other.to_string())])],
                    };
                    debug!(job_id = %job.job_id, line = row.line, error = %err, "row rejected");
                    failures.extend(messages.into_iter().map(|message| ErrorLogEntry {
                        line: row.line,
                        message,
                    }));
                }
            }
        }

        failures
    }
}

#[async_trait]
impl<C> JobExecutor for ImportJobRunner<C>
where
    C: ImportConfigReader + Send + Sync + 'static,
{
    #[instrument(skip(self, options), fields(handler = %handler_id))]
    async fn create_job(
        &self,
        handler_id: &str,
        file: &Path,
        options: ImportOptions,
    ) -> ImportResult<Job> {
        let handler = self.registry.get(handler_id)?;
        let delimiter = self.config.get_csv_delimiter().await?;
        let reader = CsvReader::open(file)?.delimiter(delimiter);

        let header = reader.read_header()?;
        let missing: Vec<String> = handler
            .required_columns()
            .iter()
            .filter(|column| !header.iter().any(|h| h == *column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            warn!(file = %file.display(), ?missing, "header lacks required columns");
            return Err(ImportError::HeaderMismatch { missing });
        }

        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let job = Job {
            log_file: self
                .log_dir
                .join(format!("{}.csv", job_id))
                .to_string_lossy()
                .into_owned(),
            job_id,
            handler_id: handler.id().to_string(),
            status: JobStatus::Pending,
            file: file.to_string_lossy().into_owned(),
            total: reader.total()?,
            offset: 0,
            line: 0,
            inserted: 0,
            updated: 0,
            errors: 0,
            options,
            message: String::new(),
            created: now,
            modified: now,
        };

        self.jobs.insert(&job)?;
        info!(job_id = %job.job_id, file = %job.file, total = job.total, "import job created");
        Ok(job)
    }

    #[instrument(skip(self))]
    async fn process_step(&self, job_id: &str) -> ImportResult<Job> {
        let mut job = self.load(job_id)?;
        if !job.status.is_active() {
            debug!(job_id, status = %job.status, "job already done");
            return Ok(job);
        }

        let handler = self.registry.get(&job.handler_id)?;
        let ctx = ImportContext::load(self.config.as_ref(), job.options.clone()).await?;

        let chunk = match self.read_chunk(&job).await {
            Ok(chunk) => chunk,
            Err(err @ (ImportError::FileNotFound(_)
            | ImportError::FileReadError(_)
            | ImportError::CsvParseError(_))) => return self.fail(job, &err),
            Err(err) => return Err(err),
        };

        // settings and chunk reads yield; a cancel may have landed meanwhile
        let current = self.load(job_id)?;
        if !current.status.is_active() {
            debug!(job_id, status = %current.status, "job ended before rows were imported");
            return Ok(current);
        }

        job.status = JobStatus::Running;
        let failures = self.import_rows(&mut job, handler.as_ref(), &chunk, &ctx);
        if let Err(err) = ErrorLog::new(&job.log_file).append(&failures) {
            warn!(job_id, error = %err, "error log write failed");
            job.message = t_with_args(
                "import.log_failed",
                &[("path", &job.log_file), ("error", &err.to_string())],
            );
        }

        job.offset = chunk.offset;
        job.line += chunk.lines;
        if chunk.eof {
            job.status = JobStatus::Finished;
            job.offset = job.offset.max(job.total);
        }
        job.modified = Utc::now().timestamp();
        let job = self.checkpoint(job)?;

        info!(
            job_id,
            line = job.line,
            rows = chunk.rows.len(),
            inserted = job.inserted,
            updated = job.updated,
            errors = job.errors,
            progress = job.progress(),
            "import step done"
        );
        Ok(job)
    }

    async fn run(&self, job_id: &str) -> ImportResult<Job> {
        loop {
            let job = self.process_step(job_id).await?;
            if job.is_done() {
                info!(job_id, status = %job.status, "import job ended");
                return Ok(job);
            }
            tokio::task::yield_now().await;
        }
    }

    async fn run_batch(&self, job_ids: Vec<String>) -> Vec<ImportResult<Job>> {
        use futures::future::join_all;

        info!(count = job_ids.len(), "running import jobs");

        let tasks = job_ids.iter().map(|job_id| async move {
            let result = self.run(job_id).await;
            if let Err(e) = &result {
                error!(job_id = %job_id, error = %e, "import job aborted");
            }
            result
        });
        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "import jobs done"
        );
        results
    }

    async fn cancel(&self, job_id: &str) -> ImportResult<Job> {
        let mut job = self.load(job_id)?;
        if job.status.is_active() {
            job.status = JobStatus::Cancelled;
            job.modified = Utc::now().timestamp();
            self.jobs.save(&job)?;
            info!(job_id, "import job cancelled");
        }
        Ok(job)
    }

    async fn get_job(&self, job_id: &str) -> ImportResult<Job> {
        self.load(job_id)
    }

    async fn progress(&self, job_id: &str) -> ImportResult<u8> {
        Ok(self.load(job_id)?.progress())
    }
}
