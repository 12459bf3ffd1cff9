//! CSV exports and dashboard figures derived from the persisted document.

use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{LedgerError, Result};
use crate::model::document::Document;
use crate::model::payroll::PayrollRecord;
use crate::store::PersistentStore;
use crate::utils::csv::write_row;
use crate::utils::dates::{month_label, parse_record_date, same_month, trailing_months};
use crate::utils::money::{format_amount, round2};

pub const EXPORT_HEADER: [&str; 6] = ["id", "employee_name", "date", "gross_pay", "tax", "net_pay"];

const RECENT_RECORDS: usize = 10;
const CHART_MONTHS: u32 = 6;
const TOP_EMPLOYEES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthTotal {
    #[schema(example = "2024-03")]
    pub month: String,
    pub net_pay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeTally {
    pub employee_name: String,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Dashboard {
    pub total_employees: usize,
    pub total_payroll_records: usize,
    pub num_admins: usize,
    pub avg_salary: f64,
    pub total_gross: f64,
    pub total_tax: f64,
    pub total_net: f64,
    pub total_paid_this_month: f64,
    pub company_budget: f64,
    pub budget_remaining: f64,
    pub recent_records: Vec<PayrollRecord>,
    pub monthly_net: Vec<MonthTotal>,
    pub top_employees: Vec<EmployeeTally>,
}

#[derive(Debug, Clone)]
pub struct ReportService {
    store: PersistentStore,
    export_dir: PathBuf,
    company_budget: f64,
}

impl ReportService {
    pub fn new(store: PersistentStore, export_dir: impl Into<PathBuf>, company_budget: f64) -> Self {
        Self {
            store,
            export_dir: export_dir.into(),
            company_budget,
        }
    }

    /// Writes the whole ledger to `<export_dir>/payroll.csv`.
    pub fn export_payroll_csv(&self) -> Result<PathBuf> {
        let records = self.store.load().payroll;
        let path = self.export_dir.join("payroll.csv");
        write_payroll_csv(&records, &path)?;
        info!(path = %path.display(), records = records.len(), "payroll exported");
        Ok(path)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        build_dashboard(&self.store.load(), today, self.company_budget)
    }
}

/// CSV text for the ledger export, header row first.
pub fn render_payroll_csv(records: &[PayrollRecord]) -> String {
    let mut out = write_row(&EXPORT_HEADER);
    for r in records {
        out.push_str(&write_row(&[
            r.id.to_string(),
            r.employee_name.clone(),
            r.date.clone(),
            format_amount(r.gross_pay),
            format_amount(r.tax),
            format_amount(r.net_pay),
        ]));
    }
    out
}

pub fn write_payroll_csv(records: &[PayrollRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| LedgerError::io(format!("failed to create {}", parent.display()), e))?;
    }
    fs::write(path, render_payroll_csv(records))
        .map_err(|e| LedgerError::io(format!("failed to write {}", path.display()), e))
}

fn build_dashboard(doc: &Document, today: NaiveDate, company_budget: f64) -> Dashboard {
    let records = &doc.payroll;

    let avg_salary = if doc.employees.is_empty() {
        0.0
    } else {
        doc.employees.iter().map(|e| e.salary).sum::<f64>() / doc.employees.len() as f64
    };

    let total_gross: f64 = records.iter().map(|r| r.gross_pay).sum();
    let total_tax: f64 = records.iter().map(|r| r.tax).sum();
    let total_net: f64 = records.iter().map(|r| r.net_pay).sum();

    let net_in_month = |year: i32, month: u32| -> f64 {
        records
            .iter()
            .filter(|r| {
                parse_record_date(&r.date)
                    .and_then(|d| NaiveDate::from_ymd_opt(year, month, 1).map(|m| same_month(d, m)))
                    .unwrap_or(false)
            })
            .map(|r| r.net_pay)
            .sum()
    };

    let total_paid_this_month: f64 = records
        .iter()
        .filter(|r| parse_record_date(&r.date).is_some_and(|d| same_month(d, today)))
        .map(|r| r.net_pay)
        .sum();

    let mut recent_records = records.clone();
    recent_records.sort_by(|a, b| b.date.cmp(&a.date));
    recent_records.truncate(RECENT_RECORDS);

    let monthly_net = trailing_months(today, CHART_MONTHS)
        .into_iter()
        .map(|(year, month)| MonthTotal {
            month: month_label(year, month),
            net_pay: round2(net_in_month(year, month)),
        })
        .collect();

    // first-seen order breaks ties
    let mut tally: Vec<EmployeeTally> = Vec::new();
    for r in records {
        match tally.iter_mut().find(|t| t.employee_name == r.employee_name) {
            Some(t) => t.records += 1,
            None => tally.push(EmployeeTally {
                employee_name: r.employee_name.clone(),
                records: 1,
            }),
        }
    }
    tally.sort_by(|a, b| b.records.cmp(&a.records));
    tally.truncate(TOP_EMPLOYEES);

    Dashboard {
        total_employees: doc.employees.len(),
        total_payroll_records: records.len(),
        num_admins: doc.admins.len(),
        avg_salary: round2(avg_salary),
        total_gross: round2(total_gross),
        total_tax: round2(total_tax),
        total_net: round2(total_net),
        total_paid_this_month: round2(total_paid_this_month),
        company_budget,
        budget_remaining: round2((company_budget - total_net).max(0.0)),
        recent_records,
        monthly_net,
        top_employees: tally,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::Employee;
    use tempfile::tempdir;

    fn record(id: u64, name: &str, net: f64, date: &str) -> PayrollRecord {
        PayrollRecord {
            id,
            employee_id: id,
            employee_name: name.into(),
            days_worked: 0,
            basis: None,
            gross_pay: round2(net / 0.95),
            tax: round2(net / 0.95 - net),
            net_pay: net,
            date: date.into(),
        }
    }

    #[test]
    fn csv_has_header_and_quotes_names() {
        let csv = render_payroll_csv(&[
            record(1, "Ada", 95.0, "2024-03-01"),
            record(2, "Doe, Jane", 47.5, "2024-03-02"),
        ]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "id,employee_name,date,gross_pay,tax,net_pay");
        assert_eq!(lines[1], "1,Ada,2024-03-01,100.00,5.00,95.00");
        assert_eq!(lines[2], "2,\"Doe, Jane\",2024-03-02,50.00,2.50,47.50");
    }

    #[test]
    fn empty_ledger_exports_header_only() {
        let dir = tempdir().unwrap();
        let store = PersistentStore::new(dir.path().join("payroll.json"));
        let reports = ReportService::new(store, dir.path().join("exports"), 1000.0);

        let path = reports.export_payroll_csv().unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "id,employee_name,date,gross_pay,tax,net_pay\n"
        );
    }

    #[test]
    fn dashboard_figures() {
        let mut doc = Document::default();
        doc.employees = vec![
            Employee { id: 1, name: "Ada".into(), department: "Ops".into(), salary: 3000.0 },
            Employee { id: 2, name: "Bo".into(), department: "Ops".into(), salary: 1000.0 },
        ];
        doc.payroll = vec![
            record(1, "Ada", 95.0, "2024-01-10"),
            record(2, "Bo", 47.5, "2024-03-05"),
            record(3, "Ada", 190.0, "2024-03-20"),
            record(4, "Ada", 10.0, "not a date"),
        ];

        let today = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
        let dash = build_dashboard(&doc, today, 300.0);

        assert_eq!(dash.total_employees, 2);
        assert_eq!(dash.total_payroll_records, 4);
        assert_eq!(dash.avg_salary, 2000.0);
        assert_eq!(dash.total_net, 342.5);
        assert_eq!(dash.total_paid_this_month, 237.5);
        assert_eq!(dash.budget_remaining, 0.0);
        assert_eq!(dash.recent_records[0].date, "not a date");
        assert_eq!(dash.recent_records[1].date, "2024-03-20");

        let labels: Vec<_> = dash.monthly_net.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(labels, vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]);
        assert_eq!(dash.monthly_net[3].net_pay, 95.0);
        assert_eq!(dash.monthly_net[5].net_pay, 237.5);

        assert_eq!(dash.top_employees[0].employee_name, "Ada");
        assert_eq!(dash.top_employees[0].records, 3);
        assert_eq!(dash.top_employees[1].employee_name, "Bo");
    }
}
