//! The payroll ledger: single payments with the month-uniqueness rule, bulk
//! batch runs into the payroll-history CSV, and summaries.

use chrono::{Datelike, NaiveDate};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::model::document::Document;
use crate::model::payroll::{BatchEntry, PayBasis, Payable, PayrollRecord, PayrollSummary};
use crate::store::PersistentStore;
use crate::utils::csv::{split_records, split_row, write_row};
use crate::utils::dates::{parse_record_date, same_month};
use crate::utils::money::{TAX_RATE, format_amount, parse_amount, round2};

pub const HISTORY_HEADER: [&str; 6] = ["EmpID", "Name", "GrossPay", "Tax", "NetPay", "ProcessedDate"];

#[derive(Debug, Clone)]
pub struct PayrollLedger {
    store: PersistentStore,
    history_file: PathBuf,
}

impl PayrollLedger {
    pub fn new(store: PersistentStore, history_file: impl Into<PathBuf>) -> Self {
        Self {
            store,
            history_file: history_file.into(),
        }
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    /// Whether the employee already has a ledger record dated in `as_of`'s month.
    pub fn has_been_paid_this_month(&self, employee_id: u64, as_of: NaiveDate) -> bool {
        paid_in_month(&self.store.load(), employee_id, as_of)
    }

    /// Computes, appends and persists one payment.
    ///
    /// At most one record per employee per calendar month: a second payment
    /// in the same month fails with [`LedgerError::DuplicatePayment`] and
    /// nothing is written.
    pub fn process(
        &self,
        employee_id: u64,
        days_worked: u32,
        basis: PayBasis,
        as_of: NaiveDate,
    ) -> Result<PayrollRecord> {
        validate_basis(&basis)?;

        let outcome = self.store.with_document(|doc| {
            let employee_name = doc
                .employee(employee_id)
                .map(|e| e.name.clone())
                .ok_or_else(|| LedgerError::not_found("employee", employee_id))?;

            if paid_in_month(doc, employee_id, as_of) {
                return Err(LedgerError::DuplicatePayment {
                    employee_id,
                    year: as_of.year(),
                    month: as_of.month(),
                });
            }

            let gross = basis.gross(days_worked);
            let tax = gross * TAX_RATE;
            let record = PayrollRecord {
                id: doc.next_payroll_id(),
                employee_id,
                employee_name,
                days_worked,
                basis: Some(basis),
                gross_pay: round2(gross),
                tax: round2(tax),
                net_pay: round2(gross - tax),
                date: as_of.format("%Y-%m-%d").to_string(),
            };
            doc.payroll.push(record.clone());
            Ok(record)
        });

        match outcome {
            Ok(record) => {
                info!(
                    record_id = record.id,
                    employee_id,
                    gross = record.gross_pay,
                    net = record.net_pay,
                    "payroll processed"
                );
                Ok(record)
            }
            Err(e) => {
                warn!(employee_id, error = %e, "payroll rejected");
                Err(e)
            }
        }
    }

    /// Pays every employee their full monthly salary into the payroll-history
    /// ledger.
    ///
    /// Unlike [`PayrollLedger::process`] this does not look at earlier
    /// payments: two runs in the same month append two sets of rows.
    pub fn run_batch(&self, as_of: NaiveDate) -> Result<Vec<BatchEntry>> {
        let employees = self.store.load().employees;
        if employees.is_empty() {
            info!("batch payroll skipped, no employees");
            return Ok(Vec::new());
        }

        let processed_on = as_of.format("%Y-%m-%d").to_string();
        let entries: Vec<BatchEntry> = employees
            .iter()
            .map(|e| {
                let gross = e.salary;
                let tax = gross * TAX_RATE;
                BatchEntry {
                    employee_id: e.id,
                    name: e.name.clone(),
                    gross_pay: round2(gross),
                    tax: round2(tax),
                    net_pay: round2(gross - tax),
                    processed_on: processed_on.clone(),
                }
            })
            .collect();

        self.append_history(&entries)?;
        info!(count = entries.len(), date = %processed_on, "batch payroll completed");
        Ok(entries)
    }

    fn append_history(&self, entries: &[BatchEntry]) -> Result<()> {
        let path = &self.history_file;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::io(format!("failed to create {}", parent.display()), e)
            })?;
        }

        let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let mut out = String::new();
        if needs_header {
            out.push_str(&write_row(&HISTORY_HEADER));
        }
        for entry in entries {
            out.push_str(&write_row(&[
                entry.employee_id.to_string(),
                entry.name.clone(),
                format_amount(entry.gross_pay),
                format_amount(entry.tax),
                format_amount(entry.net_pay),
                entry.processed_on.clone(),
            ]));
        }

        // one write call so a failure cannot interleave half a batch
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(out.as_bytes()))
            .map_err(|e| LedgerError::io(format!("failed to append {}", path.display()), e))
    }

    /// Reads back the payroll-history ledger. Amounts that do not parse read as 0.
    pub fn batch_history(&self) -> Result<Vec<BatchEntry>> {
        let text = match fs::read_to_string(&self.history_file) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::io(
                    format!("failed to read {}", self.history_file.display()),
                    e,
                ));
            }
        };

        Ok(split_records(&text)
            .iter()
            .filter(|record| !record.trim().is_empty())
            .map(|record| split_row(record))
            .filter(|fields| fields.first().map(String::as_str) != Some(HISTORY_HEADER[0]))
            .map(|fields| {
                let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");
                BatchEntry {
                    employee_id: field(0).trim().parse().unwrap_or(0),
                    name: field(1).to_string(),
                    gross_pay: parse_amount(field(2)),
                    tax: parse_amount(field(3)),
                    net_pay: parse_amount(field(4)),
                    processed_on: field(5).to_string(),
                }
            })
            .collect())
    }

    /// Totals over any payable records. Non-finite amounts count as zero and a
    /// record whose gross and net are both zero is left out entirely.
    pub fn summarize<'a, P, I>(records: I) -> PayrollSummary
    where
        P: Payable + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };

        let mut summary = records
            .into_iter()
            .fold(PayrollSummary::default(), |mut acc, record| {
                let gross = finite(record.gross_pay());
                let net = finite(record.net_pay());
                if gross == 0.0 && net == 0.0 {
                    return acc;
                }
                acc.count += 1;
                acc.total_gross += gross;
                acc.total_tax += finite(record.tax());
                acc.total_net += net;
                acc
            });

        summary.total_gross = round2(summary.total_gross);
        summary.total_tax = round2(summary.total_tax);
        summary.total_net = round2(summary.total_net);
        summary
    }

    /// The ledger in insertion order.
    pub fn records(&self) -> Vec<PayrollRecord> {
        self.store.load().payroll
    }

    /// The ledger, newest date first.
    pub fn history(&self) -> Vec<PayrollRecord> {
        let mut records = self.records();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    pub fn records_for(&self, employee_id: u64) -> Vec<PayrollRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.employee_id == employee_id)
            .collect()
    }

    pub fn get(&self, record_id: u64) -> Option<PayrollRecord> {
        self.records().into_iter().find(|r| r.id == record_id)
    }
}

fn paid_in_month(doc: &Document, employee_id: u64, as_of: NaiveDate) -> bool {
    doc.payroll
        .iter()
        .filter(|r| r.employee_id == employee_id)
        .filter_map(|r| parse_record_date(&r.date))
        .any(|paid_on| same_month(paid_on, as_of))
}

fn validate_basis(basis: &PayBasis) -> Result<()> {
    let figure = basis.figure();
    if !figure.is_finite() || figure < 0.0 {
        return Err(LedgerError::Validation(format!(
            "pay rate must be a non-negative amount, got {}",
            figure
        )));
    }
    Ok(())
}
