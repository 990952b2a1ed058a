//! Scan runner integration tests (dry-run mode, no scanners required).

use std::path::PathBuf;
use std::time::Duration;

use sqlx::PgPool;
use trinity_core::scan::{ScanType, SCAN_STATUS_COMPLETED, SCAN_STATUS_FAILED};
use trinity_db::models::scan::{CreateScan, Scan};
use trinity_db::repositories::ScanRepo;
use trinity_worker::{RunnerConfig, ScanRunner};

fn dry_run_config() -> RunnerConfig {
    RunnerConfig {
        dry_run: true,
        max_scan_time: Duration::from_secs(5),
        max_concurrent: 2,
        sqlmap_path: PathBuf::from("/nonexistent/sqlmap.py"),
    }
}

async fn pending_scan(pool: &PgPool, target: &str, scan_type: ScanType) -> Scan {
    ScanRepo::create(
        pool,
        &CreateScan {
            target: target.to_string(),
            scan_type: scan_type.as_str().to_string(),
            requested_by: None,
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dry_run_completes(pool: PgPool) {
    let runner = ScanRunner::new(pool.clone(), dry_run_config());
    let scan = pending_scan(&pool, "127.0.0.1", ScanType::Nmap).await;

    runner
        .submit(scan.id, scan.target.clone(), ScanType::Nmap)
        .await
        .unwrap();

    let done = ScanRepo::find_by_id(&pool, scan.id).await.unwrap().unwrap();
    assert_eq!(done.status, SCAN_STATUS_COMPLETED);
    assert_eq!(done.command, "nmap -sV -Pn 127.0.0.1");
    assert!(done.output.starts_with("[DRY RUN] Would run: nmap -sV -Pn 127.0.0.1"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_sqlmap_fails_scan(pool: PgPool) {
    let runner = ScanRunner::new(pool.clone(), dry_run_config());
    let scan = pending_scan(&pool, "lab.local", ScanType::Sqlmap).await;

    runner
        .submit(scan.id, scan.target.clone(), ScanType::Sqlmap)
        .await
        .unwrap();

    let done = ScanRepo::find_by_id(&pool, scan.id).await.unwrap().unwrap();
    assert_eq!(done.status, SCAN_STATUS_FAILED);
    assert_eq!(done.output, "sqlmap not available in container");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_many_submissions_all_finish(pool: PgPool) {
    let runner = ScanRunner::new(pool.clone(), dry_run_config());
    let mut handles = Vec::new();
    let mut ids = Vec::new();
    for i in 1..=5 {
        let scan = pending_scan(&pool, &format!("10.0.0.{i}"), ScanType::Nmap).await;
        ids.push(scan.id);
        handles.push(runner.submit(scan.id, scan.target, ScanType::Nmap));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    for id in ids {
        let scan = ScanRepo::find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(scan.status, SCAN_STATUS_COMPLETED);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fail_orphaned(pool: PgPool) {
    let runner = ScanRunner::new(pool.clone(), dry_run_config());
    let scan = pending_scan(&pool, "127.0.0.1", ScanType::Nmap).await;

    assert_eq!(runner.fail_orphaned().await.unwrap(), 1);
    let failed = ScanRepo::find_by_id(&pool, scan.id).await.unwrap().unwrap();
    assert_eq!(failed.status, SCAN_STATUS_FAILED);
    assert_eq!(failed.output, "Interrupted by restart");
}
