use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::money::{lenient_amount, lenient_u32, lenient_u64};

/// How gross pay is derived from the days worked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayBasis {
    /// `rate` per hour over a standard working day
    Hourly { rate: f64 },
    /// `rate` per day worked
    Daily { rate: f64 },
    /// monthly `salary` prorated over a 30-day month
    Monthly { salary: f64 },
}

impl PayBasis {
    pub const STANDARD_HOURS_PER_DAY: f64 = 8.0;
    pub const DAYS_PER_MONTH: f64 = 30.0;

    /// The rate or salary figure carried by the basis.
    pub fn figure(&self) -> f64 {
        match *self {
            PayBasis::Hourly { rate } | PayBasis::Daily { rate } => rate,
            PayBasis::Monthly { salary } => salary,
        }
    }

    /// Unrounded gross pay for `days_worked`.
    pub fn gross(&self, days_worked: u32) -> f64 {
        let days = f64::from(days_worked);
        match *self {
            PayBasis::Hourly { rate } => rate * Self::STANDARD_HOURS_PER_DAY * days,
            PayBasis::Daily { rate } => rate * days,
            PayBasis::Monthly { salary } => salary / Self::DAYS_PER_MONTH * days,
        }
    }
}

/// One entry of the append-only payroll ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1,
        "employee_name": "John Doe",
        "days_worked": 15,
        "basis": { "kind": "monthly", "salary": 3000.0 },
        "gross_pay": 1500.0,
        "tax": 75.0,
        "net_pay": 1425.0,
        "date": "2024-03-15"
    })
)]
pub struct PayrollRecord {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: u64,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub employee_id: u64,

    /// Copied from the employee when the record was created
    #[serde(default)]
    pub employee_name: String,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub days_worked: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<PayBasis>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub gross_pay: f64,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub tax: f64,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub net_pay: f64,

    /// ISO-8601 date the payment was made
    #[schema(example = "2024-03-15", format = "date")]
    #[serde(default)]
    pub date: String,
}

/// Row of the payroll-history ledger written by batch runs.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatchEntry {
    pub employee_id: u64,
    pub name: String,
    pub gross_pay: f64,
    pub tax: f64,
    pub net_pay: f64,
    #[schema(example = "2024-03-31", format = "date")]
    pub processed_on: String,
}

/// Anything carrying gross/tax/net amounts that can be summarized.
pub trait Payable {
    fn gross_pay(&self) -> f64;
    fn tax(&self) -> f64;
    fn net_pay(&self) -> f64;
}

impl Payable for PayrollRecord {
    fn gross_pay(&self) -> f64 {
        self.gross_pay
    }
    fn tax(&self) -> f64 {
        self.tax
    }
    fn net_pay(&self) -> f64 {
        self.net_pay
    }
}

impl Payable for BatchEntry {
    fn gross_pay(&self) -> f64 {
        self.gross_pay
    }
    fn tax(&self) -> f64 {
        self.tax
    }
    fn net_pay(&self) -> f64 {
        self.net_pay
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PayrollSummary {
    #[schema(example = 2)]
    pub count: usize,
    #[schema(example = 150.0)]
    pub total_gross: f64,
    #[schema(example = 7.5)]
    pub total_tax: f64,
    #[schema(example = 142.5)]
    pub total_net: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gross_by_basis() {
        assert_eq!(PayBasis::Monthly { salary: 3000.0 }.gross(15), 1500.0);
        assert_eq!(PayBasis::Daily { rate: 120.0 }.gross(10), 1200.0);
        assert_eq!(PayBasis::Hourly { rate: 10.0 }.gross(2), 160.0);
        assert_eq!(PayBasis::Daily { rate: 120.0 }.gross(0), 0.0);
    }

    #[test]
    fn basis_is_tagged_by_kind() {
        let json = serde_json::to_value(PayBasis::Daily { rate: 50.0 }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "daily", "rate": 50.0 }));

        let basis: PayBasis =
            serde_json::from_str(r#"{"kind":"monthly","salary":2400}"#).unwrap();
        assert_eq!(basis, PayBasis::Monthly { salary: 2400.0 });
        assert_eq!(basis.figure(), 2400.0);
    }

    #[test]
    fn legacy_record_loads_with_defaults() {
        let record: PayrollRecord = serde_json::from_str(
            r#"{"employee_id": "3", "employee_name": "Ann", "rate": 20,
                "gross_pay": "100", "tax": 5, "net_pay": 95, "date": "2024-01-02"}"#,
        )
        .unwrap();
        assert_eq!(record.id, 0);
        assert_eq!(record.employee_id, 3);
        assert_eq!(record.basis, None);
        assert_eq!(record.gross_pay, 100.0);
        assert_eq!(record.net_pay, 95.0);
    }
}
