use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

use crate::store::Record;
use crate::utils::db_utils::WhereClause;

/// Named amounts, e.g. `{"hra": 5000.0, "transport": 1200.0}`.
pub type LineItems = BTreeMap<String, f64>;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayrollStatus {
    #[default]
    Pending,
    Processed,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    pub id: String,
    #[schema(example = "E1")]
    pub employee_id: String,
    /// First day of the pay month.
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    #[schema(example = 50000.0)]
    pub basic_salary: f64,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"hra": 5000.0}))]
    pub allowances: Json<LineItems>,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"tax": 2000.0}))]
    pub deductions: Json<LineItems>,
    #[schema(example = 53000.0)]
    pub net_pay: f64,
    #[serde(default)]
    pub status: PayrollStatus,
}

pub fn total(items: &LineItems) -> f64 {
    items.values().sum()
}

/// Normalises any date within a month to the first of that month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl Payroll {
    pub fn total_allowances(&self) -> f64 {
        total(&self.allowances)
    }

    pub fn total_deductions(&self) -> f64 {
        total(&self.deductions)
    }

    pub fn gross_pay(&self) -> f64 {
        self.basic_salary + self.total_allowances()
    }

    /// `basic + Σallowances − Σdeductions`
    pub fn compute_net_pay(&self) -> f64 {
        self.gross_pay() - self.total_deductions()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PayrollPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 52000.0)]
    pub basic_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub allowances: Option<LineItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub deductions: Option<LineItems>,
    /// Derived by the payroll service; ignored on input.
    #[serde(skip_serializing_if = "Option::is_none", skip_deserializing)]
    #[schema(read_only)]
    pub net_pay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PayrollStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayrollFilter {
    pub employee_id: Option<String>,
    pub month: Option<NaiveDate>,
}

impl Record for Payroll {
    const TABLE: &'static str = "payroll";
    const KIND: &'static str = "Payroll record";
    const ORDER_BY: &'static str = "month DESC, employee_id";

    type Patch = PayrollPatch;
    type Filter = PayrollFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.employee_id, self.month))
    }

    fn apply(&mut self, patch: &PayrollPatch) {
        if let Some(v) = patch.basic_salary {
            self.basic_salary = v;
        }
        if let Some(v) = &patch.allowances {
            self.allowances = Json(v.clone());
        }
        if let Some(v) = &patch.deductions {
            self.deductions = Json(v.clone());
        }
        if let Some(v) = patch.net_pay {
            self.net_pay = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }

    fn matches(&self, filter: &PayrollFilter) -> bool {
        filter
            .employee_id
            .as_deref()
            .is_none_or(|e| e == self.employee_id)
            && filter.month.is_none_or(|m| month_start(m) == self.month)
    }

    fn where_clause(filter: &PayrollFilter) -> WhereClause {
        WhereClause::new()
            .eq_opt("employee_id", filter.employee_id.clone())
            .eq_opt("month", filter.month.map(month_start))
    }
}
