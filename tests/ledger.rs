//! End-to-end ledger behaviour over a temporary data directory.

use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

use payroll::config::Config;
use payroll::error::LedgerError;
use payroll::model::document::Document;
use payroll::model::payroll::PayBasis;
use payroll::service::Services;
use payroll::service::payroll_ledger::PayrollLedger;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn employee_ids_strictly_increase_across_deletes() {
    let dir = tempdir().unwrap();
    let services = Services::new(&Config::for_dir(dir.path()));

    let mut seen = Vec::new();
    for round in 0..4 {
        let emp = services
            .employees
            .add(&format!("emp{}", round), "Ops", 100.0)
            .unwrap();
        seen.push(emp.id);
        if round % 2 == 1 {
            assert!(services.employees.delete(emp.id).unwrap());
        }
    }

    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen, vec![1, 2, 3, 4]);
    let next = services.employees.add("last", "Ops", 1.0).unwrap();
    assert_eq!(next.id, 5);
}

#[test]
fn process_then_backup_flow() {
    let dir = tempdir().unwrap();
    let config = Config::for_dir(dir.path());
    let services = Services::new(&config);

    let emp = services.employees.add("Ada", "Ops", 3000.0).unwrap();
    let record = services
        .ledger
        .process(emp.id, 15, PayBasis::Monthly { salary: emp.salary }, date(2024, 3, 15))
        .unwrap();
    assert_eq!(
        (record.gross_pay, record.tax, record.net_pay),
        (1500.0, 75.0, 1425.0)
    );

    let backup = services.backups.snapshot(services.store.path()).unwrap();
    assert!(backup.starts_with(&config.storage.backup_dir));
    let name = backup.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("backup_") && name.ends_with(".json"));

    let copied: Document = serde_json::from_str(&fs::read_to_string(&backup).unwrap()).unwrap();
    assert_eq!(copied, services.store.load());
}

#[test]
fn duplicate_payment_leaves_ledger_and_file_unchanged() {
    let dir = tempdir().unwrap();
    let services = Services::new(&Config::for_dir(dir.path()));
    let emp = services.employees.add("Ada", "Ops", 3000.0).unwrap();
    let basis = PayBasis::Daily { rate: 100.0 };

    services.ledger.process(emp.id, 5, basis, date(2024, 6, 3)).unwrap();
    let before = fs::read(services.store.path()).unwrap();

    let err = services
        .ledger
        .process(emp.id, 5, basis, date(2024, 6, 28))
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicatePayment { .. }));
    assert_eq!(services.ledger.records().len(), 1);
    assert_eq!(fs::read(services.store.path()).unwrap(), before);

    // batch runs ignore the month rule
    services.ledger.run_batch(date(2024, 6, 30)).unwrap();
    services.ledger.run_batch(date(2024, 6, 30)).unwrap();
    assert_eq!(services.ledger.batch_history().unwrap().len(), 2);
}

#[test]
fn corrupt_data_file_reads_as_empty_and_recovers() {
    let dir = tempdir().unwrap();
    let config = Config::for_dir(dir.path());
    fs::create_dir_all(config.storage.data_file.parent().unwrap()).unwrap();
    fs::write(&config.storage.data_file, [0xff, 0xfe, 0x00]).unwrap();

    let services = Services::new(&config);
    assert_eq!(services.store.load(), Document::default());
    assert!(services.employees.list().is_empty());

    let emp = services.employees.add("Ada", "Ops", 1.0).unwrap();
    assert_eq!(emp.id, 1);
    assert_eq!(services.employees.list(), vec![emp]);
}

#[test]
fn summary_over_ledger_records() {
    let dir = tempdir().unwrap();
    let services = Services::new(&Config::for_dir(dir.path()));
    let a = services.employees.add("Ada", "Ops", 0.0).unwrap();
    let b = services.employees.add("Bo", "Ops", 0.0).unwrap();
    let c = services.employees.add("Cy", "Ops", 0.0).unwrap();
    let when = date(2024, 1, 15);

    services.ledger.process(a.id, 1, PayBasis::Daily { rate: 100.0 }, when).unwrap();
    services.ledger.process(b.id, 0, PayBasis::Daily { rate: 100.0 }, when).unwrap();
    services.ledger.process(c.id, 1, PayBasis::Daily { rate: 50.0 }, when).unwrap();

    let summary = PayrollLedger::summarize(&services.ledger.records());
    assert_eq!(summary.count, 2);
    assert_eq!(summary.total_gross, 150.0);
    assert_eq!(summary.total_net, 142.5);
    assert_eq!(summary.total_tax, 7.5);
}
