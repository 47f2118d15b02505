use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Record;
use crate::utils::db_utils::WhereClause;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Festival,
    Maternity,
    Paternity,
    Emergency,
    Unpaid,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = "b2a1c0de-0000-4000-8000-000000000001")]
    pub id: String,
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Flu")]
    pub reason: String,
    #[serde(default)]
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub applied_on: DateTime<Utc>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub approved_by: Option<String>,
}

impl LeaveRequest {
    /// Inclusive number of calendar days covered.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LeavePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveFilter {
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
}

impl Record for LeaveRequest {
    const TABLE: &'static str = "leave_requests";
    const KIND: &'static str = "Leave request";
    const ORDER_BY: &'static str = "applied_on DESC";

    type Patch = LeavePatch;
    type Filter = LeaveFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: &LeavePatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(by) = &patch.approved_by {
            self.approved_by = Some(by.clone());
        }
    }

    fn matches(&self, filter: &LeaveFilter) -> bool {
        filter
            .employee_id
            .as_deref()
            .is_none_or(|e| e == self.employee_id)
            && filter.status.is_none_or(|s| s == self.status)
    }

    fn where_clause(filter: &LeaveFilter) -> WhereClause {
        WhereClause::new()
            .eq_opt("employee_id", filter.employee_id.clone())
            .eq_opt("status", filter.status.map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_counts_both_ends() {
        let leave = LeaveRequest {
            id: "l1".into(),
            employee_id: "E1".into(),
            leave_type: LeaveType::Sick,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            reason: "Flu".into(),
            status: LeaveStatus::Pending,
            applied_on: Utc::now(),
            approved_by: None,
        };
        assert_eq!(leave.duration_days(), 4);
    }
}
