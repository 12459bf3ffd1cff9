use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::money::{lenient_amount, lenient_u64};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "John Doe",
        "department": "Engineering",
        "salary": 3000.0
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: u64,

    #[schema(example = "John Doe")]
    #[serde(default)]
    pub name: String,

    #[schema(example = "Engineering")]
    #[serde(default)]
    pub department: String,

    /// Monthly salary
    #[schema(example = 3000.0)]
    #[serde(default, deserialize_with = "lenient_amount")]
    pub salary: f64,
}

/// Replacement values for the mutable employee fields; `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeeUpdate {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,

    #[schema(example = "Finance")]
    pub department: Option<String>,

    #[schema(example = 3200.0)]
    pub salary: Option<f64>,
}
