use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Record;
use crate::utils::db_utils::WhereClause;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Office,
    Remote,
    Hybrid,
}

/// One employee's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": "5f0c6f1e-8d0b-4a59-9a55-0a3c1e1c2f10",
    "employee_id": "E1",
    "date": "2026-01-05",
    "check_in": "09:00",
    "check_out": "17:30",
    "status": "present",
    "work_mode": "remote",
    "total_hours": 8.5
}))]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    #[schema(value_type = String, format = "date", example = "2026-01-05")]
    pub date: NaiveDate,
    /// Absent only on records entered administratively (e.g. a marked absence).
    #[serde(with = "crate::utils::time_format::option", default)]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub check_in: Option<NaiveTime>,
    #[serde(with = "crate::utils::time_format::option", default)]
    #[schema(value_type = Option<String>, example = "17:30")]
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    pub work_mode: WorkMode,
    #[schema(example = 8.5)]
    pub total_hours: f64,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}

/// Fields that may change after creation. `check_in`, `date`, `employee_id`
/// and `work_mode` are fixed for the life of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendancePatch {
    #[serde(
        with = "crate::utils::time_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Inclusive lower bound on `date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn for_employee(employee_id: &str) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            ..Self::default()
        }
    }

    pub fn on_day(employee_id: &str, date: NaiveDate) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            from: Some(start),
            to: Some(end),
            ..Self::default()
        }
    }

    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}

impl Record for AttendanceRecord {
    const TABLE: &'static str = "attendance";
    const KIND: &'static str = "Attendance record";
    const ORDER_BY: &'static str = "date, check_in";

    type Patch = AttendancePatch;
    type Filter = AttendanceFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.employee_id, self.date))
    }

    fn apply(&mut self, patch: &AttendancePatch) {
        if let Some(check_out) = patch.check_out {
            self.check_out = Some(check_out);
        }
        if let Some(total_hours) = patch.total_hours {
            self.total_hours = total_hours;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn matches(&self, filter: &AttendanceFilter) -> bool {
        filter
            .employee_id
            .as_deref()
            .is_none_or(|e| e == self.employee_id)
            && filter.date.is_none_or(|d| d == self.date)
            && filter.from.is_none_or(|d| self.date >= d)
            && filter.to.is_none_or(|d| self.date <= d)
    }

    fn where_clause(filter: &AttendanceFilter) -> WhereClause {
        WhereClause::new()
            .eq_opt("employee_id", filter.employee_id.clone())
            .eq_opt("date", filter.date)
            .from_opt("date", filter.from)
            .until_opt("date", filter.to)
    }
}
