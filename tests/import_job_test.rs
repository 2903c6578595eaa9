// ==========================================
// Import job integration tests
// ==========================================
// Chunked steps, resume, error log, update mode, cancel, batch runs
// ==========================================

mod test_helpers;

use async_trait::async_trait;
use gplcart::config::{config_keys, ConfigManager, ImportConfigReader};
use gplcart::domain::{ImportOptions, JobStatus};
use gplcart::importer::{ErrorLog, ImportError, ImportJobRunner, JobExecutor};
use gplcart::logging;
use gplcart::repository::{
    CategoryRepository, ProductRepository, RepositoryResult, UserRepository,
};
use serde_json::json;
use std::sync::Arc;
use test_helpers::{product_csv, TestEnv};

fn rows(limit_rows: usize) -> ImportOptions {
    ImportOptions {
        limit_rows: Some(limit_rows),
        ..ImportOptions::default()
    }
}

#[tokio::test]
async fn test_import_products_step_by_step() {
    logging::init_test();
    let env = TestEnv::new().expect("test env");
    let file = env.write_csv("products.csv", &product_csv(5)).unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, rows(2)).await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.total, std::fs::metadata(&file).unwrap().len());
    assert_eq!(runner.progress(&job.job_id).await.unwrap(), 0);

    let step = runner.process_step(&job.job_id).await.unwrap();
    assert_eq!(step.status, JobStatus::Running);
    assert_eq!(step.inserted, 2);
    // header + two rows
    assert_eq!(step.line, 3);
    assert!(step.offset > 0 && step.offset < step.total);
    assert!(step.progress() > 0 && step.progress() < 100);

    let done = runner.run(&job.job_id).await.unwrap();
    assert_eq!(done.status, JobStatus::Finished);
    assert_eq!(done.inserted, 5);
    assert_eq!(done.errors, 0);
    assert_eq!(done.line, 6);
    assert_eq!(done.progress(), 100);
    assert!(!std::path::Path::new(&done.log_file).exists());

    let products = ProductRepository::new(env.db.clone());
    assert_eq!(products.list_by_store(1).unwrap().len(), 5);
    let third = products.find_by_sku(1, "SKU-3").unwrap().unwrap();
    assert_eq!(third.price, 350);
    assert_eq!(third.stock, 3);
    assert!(third.status);
}

#[tokio::test]
async fn test_job_resumes_with_new_runner() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", &product_csv(5)).unwrap();

    let job = env.runner().create_job("product", &file, rows(2)).await.unwrap();
    env.runner().process_step(&job.job_id).await.unwrap();

    // a fresh runner picks the job up from the stored offset
    let done = env.runner().run(&job.job_id).await.unwrap();
    assert_eq!(done.status, JobStatus::Finished);
    assert_eq!(done.inserted, 5);
    assert_eq!(ProductRepository::new(env.db.clone()).count().unwrap(), 5);
}

#[tokio::test]
async fn test_byte_limit_reads_one_row_per_step() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", &product_csv(3)).unwrap();
    let runner = env.runner();

    let options = ImportOptions {
        limit_rows: Some(100),
        limit_bytes: Some(1),
        ..ImportOptions::default()
    };
    let job = runner.create_job("product", &file, options).await.unwrap();

    let mut steps = 0;
    loop {
        let job = runner.process_step(&job.job_id).await.unwrap();
        steps += 1;
        assert_eq!(job.inserted, steps);
        if job.is_done() {
            break;
        }
    }
    assert_eq!(steps, 3);
}

#[tokio::test]
async fn test_configured_import_limit() {
    let env = TestEnv::new().unwrap();
    env.config.set(config_keys::IMPORT_LIMIT, &json!(1)).unwrap();
    let file = env.write_csv("products.csv", &product_csv(3)).unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    let step = runner.process_step(&job.job_id).await.unwrap();
    assert_eq!(step.inserted, 1);
}

#[tokio::test]
async fn test_generated_sku() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", "title,price\nNo SKU,1\n").unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    runner.run(&job.job_id).await.unwrap();

    let products = ProductRepository::new(env.db.clone()).list_by_store(1).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].sku, format!("PRODUCT-{}", products[0].product_id));
}

#[tokio::test]
async fn test_rejected_rows_are_logged() {
    let env = TestEnv::new().unwrap();
    let csv = "title,sku,price,stock\n\
               Good,G-1,10,1\n\
               ,G-2,abc,-1\n\
               Dup,G-1,5,1\n";
    let file = env.write_csv("products.csv", csv).unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    let done = runner.run(&job.job_id).await.unwrap();

    assert_eq!(done.status, JobStatus::Finished);
    assert_eq!(done.inserted, 1);
    assert_eq!(done.errors, 2);

    // missing title, bad price, negative stock on line 3; duplicate sku on line 4
    let entries = ErrorLog::new(&done.log_file).read_all().unwrap();
    assert_eq!(entries.iter().filter(|e| e.line == 3).count(), 3);
    assert_eq!(entries.iter().filter(|e| e.line == 4).count(), 1);
    assert!(entries.iter().all(|e| !e.message.is_empty()));

    assert_eq!(ProductRepository::new(env.db.clone()).count().unwrap(), 1);
}

#[tokio::test]
async fn test_update_mode() {
    let env = TestEnv::new().unwrap();
    let runner = env.runner();
    let first = env.write_csv("products.csv", &product_csv(1)).unwrap();
    let job = runner.create_job("product", &first, ImportOptions::default()).await.unwrap();
    runner.run(&job.job_id).await.unwrap();

    let products = ProductRepository::new(env.db.clone());
    let product = products.find_by_sku(1, "SKU-1").unwrap().unwrap();
    let update = env
        .write_csv("update.csv", &format!("product_id,title,price\n{},,20\n", product.product_id))
        .unwrap();

    // updates disabled: the row is rejected
    let no_update = ImportOptions {
        update: false,
        ..ImportOptions::default()
    };
    let job = runner.create_job("product", &update, no_update).await.unwrap();
    let done = runner.run(&job.job_id).await.unwrap();
    assert_eq!((done.updated, done.errors), (0, 1));

    let job = runner.create_job("product", &update, ImportOptions::default()).await.unwrap();
    let done = runner.run(&job.job_id).await.unwrap();
    assert_eq!((done.updated, done.errors), (1, 0));

    let updated = products.find(product.product_id).unwrap().unwrap();
    assert_eq!(updated.price, 2000);
    // empty cells leave the stored value alone
    assert_eq!(updated.title, "Product 1");
}

#[tokio::test]
async fn test_create_job_checks() {
    let env = TestEnv::new().unwrap();
    let runner = env.runner();

    let file = env.write_csv("products.csv", "sku,price\nA,1\n").unwrap();
    match runner.create_job("product", &file, ImportOptions::default()).await {
        Err(ImportError::HeaderMismatch { missing }) => assert_eq!(missing, vec!["title".to_string()]),
        other => panic!("unexpected: {:?}", other.map(|j| j.job_id)),
    }

    assert!(matches!(
        runner.create_job("order", &file, ImportOptions::default()).await,
        Err(ImportError::UnknownHandler(_))
    ));
    assert!(matches!(
        runner
            .create_job("product", &env.path("missing.csv"), ImportOptions::default())
            .await,
        Err(ImportError::FileNotFound(_))
    ));
    assert!(matches!(
        runner.get_job("no-such-job").await,
        Err(ImportError::JobNotFound(_))
    ));
}

#[tokio::test]
async fn test_removed_file_fails_job() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", &product_csv(2)).unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    std::fs::remove_file(&file).unwrap();

    let failed = runner.run(&job.job_id).await.unwrap();
    assert_eq!(failed.status, JobStatus::Failed);
    assert!(!failed.message.is_empty());
    assert_eq!(runner.get_job(&job.job_id).await.unwrap().status, JobStatus::Failed);
}

#[tokio::test]
async fn test_cancel_stops_job() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", &product_csv(3)).unwrap();
    let runner = env.runner();

    let job = runner.create_job("product", &file, rows(1)).await.unwrap();
    runner.process_step(&job.job_id).await.unwrap();

    let cancelled = runner.cancel(&job.job_id).await.unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);

    let after = runner.run(&job.job_id).await.unwrap();
    assert_eq!(after.status, JobStatus::Cancelled);
    assert_eq!(after.inserted, 1);

    // cancelling a finished job changes nothing
    let other = env.write_csv("one.csv", &product_csv(1)).unwrap();
    let job = runner.create_job("product", &other, ImportOptions::default()).await.unwrap();
    runner.run(&job.job_id).await.unwrap();
    assert_eq!(runner.cancel(&job.job_id).await.unwrap().status, JobStatus::Finished);
}

/// Settings that hand control back to the runtime while the row limit is read
struct YieldingConfig(Arc<ConfigManager>);

#[async_trait]
impl ImportConfigReader for YieldingConfig {
    async fn get_csv_delimiter(&self) -> RepositoryResult<u8> {
        self.0.get_csv_delimiter().await
    }

    async fn get_csv_delimiter_multiple(&self) -> RepositoryResult<String> {
        self.0.get_csv_delimiter_multiple().await
    }

    async fn get_csv_delimiter_key_value(&self) -> RepositoryResult<String> {
        self.0.get_csv_delimiter_key_value().await
    }

    async fn get_import_limit(&self) -> RepositoryResult<usize> {
        tokio::task::yield_now().await;
        self.0.get_import_limit().await
    }

    async fn get_import_limit_bytes(&self) -> RepositoryResult<u64> {
        self.0.get_import_limit_bytes().await
    }

    async fn get_default_currency(&self) -> RepositoryResult<String> {
        self.0.get_default_currency().await
    }

    async fn get_default_store_id(&self) -> RepositoryResult<i64> {
        self.0.get_default_store_id().await
    }

    async fn get_password_min_length(&self) -> RepositoryResult<usize> {
        self.0.get_password_min_length().await
    }

    async fn get_password_max_length(&self) -> RepositoryResult<usize> {
        self.0.get_password_max_length().await
    }

    async fn get_product_sku_pattern(&self) -> RepositoryResult<String> {
        self.0.get_product_sku_pattern().await
    }
}

#[tokio::test]
async fn test_cancel_during_step_wins() {
    let env = TestEnv::new().unwrap();
    let file = env.write_csv("products.csv", &product_csv(3)).unwrap();
    let runner = ImportJobRunner::new(
        env.db.clone(),
        Arc::new(YieldingConfig(env.config.clone())),
        env.log_dir(),
    );

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    let (step, cancelled) = tokio::join!(runner.process_step(&job.job_id), runner.cancel(&job.job_id));

    assert_eq!(cancelled.unwrap().status, JobStatus::Cancelled);
    let step = step.unwrap();
    assert_eq!(step.status, JobStatus::Cancelled);
    assert_eq!(step.inserted, 0);

    let stored = runner.get_job(&job.job_id).await.unwrap();
    assert_eq!(stored.status, JobStatus::Cancelled);
    assert_eq!(ProductRepository::new(env.db.clone()).count().unwrap(), 0);

    // later steps leave the job alone
    assert_eq!(runner.run(&job.job_id).await.unwrap().status, JobStatus::Cancelled);
}

#[tokio::test]
async fn test_unwritable_error_log_reported() {
    let env = TestEnv::new().unwrap();
    // a plain file where the log directory should be
    let blocked = env.write_csv("blocked", "").unwrap();
    let runner = ImportJobRunner::new(env.db.clone(), env.config.clone(), blocked);
    let file = env
        .write_csv("products.csv", "title,price\nGood,1\n,bad\n")
        .unwrap();

    let job = runner.create_job("product", &file, ImportOptions::default()).await.unwrap();
    let done = runner.run(&job.job_id).await.unwrap();

    assert_eq!(done.status, JobStatus::Finished);
    assert_eq!(done.inserted, 1);
    assert_eq!(done.errors, 1);
    assert!(done.message.contains(&done.log_file), "{}", done.message);
    assert_eq!(runner.get_job(&job.job_id).await.unwrap().message, done.message);
}

#[tokio::test]
async fn test_run_batch() {
    logging::init_test();
    let env = TestEnv::new().unwrap();
    let runner = env.runner();

    let products = env.write_csv("products.csv", &product_csv(4)).unwrap();
    let categories = env
        .write_csv("categories.csv", "title,category_group_id,weight\nShoes,1,0\nHats,1,1\nAcme,2,0\n")
        .unwrap();
    let users = env
        .write_csv(
            "users.csv",
            "email,name,password,status\nJane@Example.com,Jane,secret-pass,1\n",
        )
        .unwrap();

    let mut ids = Vec::new();
    for (handler, file) in [("product", &products), ("category", &categories), ("user", &users)] {
        ids.push(runner.create_job(handler, file, rows(2)).await.unwrap().job_id);
    }
    ids.push("no-such-job".to_string());

    let results = runner.run_batch(ids).await;
    assert_eq!(results.len(), 4);
    for result in &results[..3] {
        let job = result.as_ref().unwrap();
        assert_eq!(job.status, JobStatus::Finished, "{}", job.handler_id);
        assert_eq!(job.errors, 0, "{}", job.handler_id);
    }
    assert!(matches!(results[3], Err(ImportError::JobNotFound(_))));

    assert_eq!(results[0].as_ref().unwrap().inserted, 4);
    assert_eq!(CategoryRepository::new(env.db.clone()).list_by_group(1).unwrap().len(), 2);

    let users = UserRepository::new(env.db.clone());
    let user = users
        .authenticate("jane@example.com", "secret-pass")
        .unwrap()
        .expect("imported user can log in");
    assert_eq!(user.name, "Jane");
    assert!(users.authenticate("jane@example.com", "wrong-pass").unwrap().is_none());
}
