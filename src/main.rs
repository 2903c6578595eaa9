// ==========================================
// GPL Cart - command line entry point
// ==========================================
// gplcart install
// gplcart import <handler> <file> [--update] [--store <id>]
// gplcart export <handler> <file>
// gplcart job <job_id>
// Database path: $GPLCART_DB or the user data directory
// GPLCART_LOG_JSON=1 switches to JSON log lines
// ==========================================

use anyhow::{bail, Context};
use gplcart::config::{AppConfig, ConfigManager};
use gplcart::importer::{Exporter, ImportJobRunner, JobExecutor};
use gplcart::repository::{Conditions, Database};
use gplcart::{ImportOptions, Job};
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage:
  gplcart install
  gplcart import <handler> <file> [--update] [--store <id>]
  gplcart export <handler> <file>
  gplcart job <job_id>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("GPLCART_LOG_JSON").is_ok_and(|v| v == "1") {
        gplcart::logging::init_json();
    } else {
        gplcart::logging::init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let app = AppConfig::from_env();
    tracing::info!(version = gplcart::VERSION, db = %app.db_path.display(), "{}", gplcart::APP_NAME);

    let db = Database::open(&app.db_path_str())
        .with_context(|| format!("cannot open database {}", app.db_path.display()))?;

    match (command.as_str(), &args[1..]) {
        ("install", []) => {
            db.install().context("install failed")?;
            println!("installed: {}", app.db_path.display());
        }
        ("import", [handler, file, flags @ ..]) => {
            let options = parse_import_flags(flags)?;
            let runner = ImportJobRunner::new(db.clone(), Arc::new(ConfigManager::new(db)), &app.log_dir);
            let job = runner.create_job(handler, &PathBuf::from(file), options).await?;
            let job = runner.run(&job.job_id).await?;
            print_job(&job);
        }
        ("export", [handler, file]) => {
            let config = ConfigManager::new(db.clone());
            let exporter = Exporter::from_config(db, &config).await?;
            let rows = exporter.export(handler, &PathBuf::from(file), &Conditions::new())?;
            println!("exported {} rows to {}", rows, file);
        }
        ("job", [job_id]) => {
            let runner = ImportJobRunner::new(db.clone(), Arc::new(ConfigManager::new(db)), &app.log_dir);
            print_job(&runner.get_job(job_id).await?);
        }
        _ => bail!("unknown command\n{}", USAGE),
    }

    Ok(())
}

fn parse_import_flags(flags: &[String]) -> anyhow::Result<ImportOptions> {
    let mut options = ImportOptions {
        update: false,
        ..ImportOptions::default()
    };
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--update" => options.update = true,
            "--store" => {
                let value = iter.next().context("--store needs a value")?;
                options.store_id = Some(value.parse().context("--store must be an integer")?);
            }
            other => bail!("unknown option {}", other),
        }
    }
    Ok(options)
}

fn print_job(job: &Job) {
    println!("job:      {}", job.job_id);
    println!("handler:  {}", job.handler_id);
    println!("status:   {} ({}%)", job.status, job.progress());
    println!("inserted: {}", job.inserted);
    println!("updated:  {}", job.updated);
    println!("errors:   {}", job.errors);
    if job.errors > 0 {
        println!("log:      {}", job.log_file);
    }
    if !job.message.is_empty() {
        println!("message:  {}", job.message);
    }
}
