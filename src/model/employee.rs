use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Record;
use crate::utils::db_utils::WhereClause;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, strum::Display, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "E1",
        "employee_code": "EMP0421",
        "name": "John Doe",
        "email": "john.doe@company.com",
        "phone": "+8801712345678",
        "department": "Engineering",
        "designation": "Software Engineer",
        "join_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = "E1")]
    pub id: String,

    #[schema(example = "EMP0421")]
    pub employee_code: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "+8801712345678", nullable = true)]
    #[serde(default)]
    pub phone: Option<String>,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Software Engineer")]
    pub designation: String,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub join_date: NaiveDate,

    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub join_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
    /// Case-insensitive substring of name or employee code.
    pub search: Option<String>,
}

impl Record for Employee {
    const TABLE: &'static str = "employees";
    const KIND: &'static str = "Employee";
    const ORDER_BY: &'static str = "employee_code";

    type Patch = EmployeePatch;
    type Filter = EmployeeFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn natural_key(&self) -> Option<String> {
        Some(self.employee_code.clone())
    }

    fn apply(&mut self, patch: &EmployeePatch) {
        if let Some(v) = &patch.employee_code {
            self.employee_code = v.clone();
        }
        if let Some(v) = &patch.name {
            self.name = v.clone();
        }
        if let Some(v) = &patch.email {
            self.email = v.clone();
        }
        if let Some(v) = &patch.phone {
            self.phone = Some(v.clone());
        }
        if let Some(v) = &patch.department {
            self.department = v.clone();
        }
        if let Some(v) = &patch.designation {
            self.designation = v.clone();
        }
        if let Some(v) = patch.join_date {
            self.join_date = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }

    fn matches(&self, filter: &EmployeeFilter) -> bool {
        let search = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        filter
            .department
            .as_deref()
            .is_none_or(|d| d == self.department)
            && filter.status.is_none_or(|s| s == self.status)
            && search.is_none_or(|q| {
                self.name.to_lowercase().contains(&q)
                    || self.employee_code.to_lowercase().contains(&q)
            })
    }

    fn where_clause(filter: &EmployeeFilter) -> WhereClause {
        WhereClause::new()
            .eq_opt("department", filter.department.clone())
            .eq_opt("status", filter.status.map(|s| s.to_string()))
            .search_opt(&["name", "employee_code"], filter.search.as_deref())
    }
}
