use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AppError;
use crate::model::employee::{Employee, EmployeeFilter, EmployeePatch, EmployeeStatus};
use crate::store::RecordStore;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEmployee {
    /// Generated when omitted.
    #[schema(example = "EMP0421", nullable = true)]
    #[serde(default)]
    pub employee_code: Option<String>,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@email.com", format = "email")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Software Engineer")]
    pub designation: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub join_date: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
}

pub struct EmployeeDirectory {
    store: Arc<dyn RecordStore<Employee>>,
    clock: Arc<dyn Clock>,
}

impl EmployeeDirectory {
    pub fn new(store: Arc<dyn RecordStore<Employee>>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<Employee>, AppError> {
        self.store.query(&EmployeeFilter::default()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Employee>, AppError> {
        self.store.get(id).await
    }

    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.store.query(filter).await
    }

    /// Name or employee code contains `query`, ignoring case.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Employee>, AppError> {
        self.store
            .query(&EmployeeFilter {
                search: Some(query.to_string()),
                ..EmployeeFilter::default()
            })
            .await
    }

    pub async fn get_by_department(&self, department: &str) -> Result<Vec<Employee>, AppError> {
        self.store
            .query(&EmployeeFilter {
                department: Some(department.to_string()),
                ..EmployeeFilter::default()
            })
            .await
    }

    /// `EMP` followed by the last four digits of the current epoch millis.
    fn generate_code(&self) -> String {
        let millis = self.clock.now_utc().timestamp_millis();
        format!("EMP{:04}", millis.rem_euclid(10_000))
    }

    pub async fn create(&self, payload: CreateEmployee) -> Result<Employee, AppError> {
        if payload.name.trim().is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }
        if !payload.email.contains('@') {
            return Err(AppError::bad_request("A valid email is required"));
        }

        let employee_code = payload
            .employee_code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.generate_code());

        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            employee_code,
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone,
            department: payload.department,
            designation: payload.designation,
            join_date: payload.join_date,
            status: payload.status,
        };

        let employee = self.store.create(employee).await?;
        info!(id = %employee.id, code = %employee.employee_code, "Employee created");
        Ok(employee)
    }

    pub async fn update(&self, id: &str, patch: EmployeePatch) -> Result<Employee, AppError> {
        let updated = self.store.update(id, patch).await?;
        info!(id, "Employee updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Employee, AppError> {
        let removed = self.store.delete(id).await?;
        info!(id, "Employee deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    fn directory() -> EmployeeDirectory {
        EmployeeDirectory::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::at("2026-01-02", "10:00")),
        )
    }

    fn hire(name: &str, department: &str) -> CreateEmployee {
        CreateEmployee {
            employee_code: None,
            name: name.into(),
            email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            department: department.into(),
            designation: "Engineer".into(),
            join_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            status: EmployeeStatus::Active,
        }
    }

    #[actix_web::test]
    async fn generated_codes_use_emp_prefix() {
        let directory = directory();
        let employee = directory.create(hire("Ana Silva", "Engineering")).await.unwrap();

        assert!(employee.employee_code.starts_with("EMP"));
        assert_eq!(employee.employee_code.len(), 7);
    }

    #[actix_web::test]
    async fn supplied_code_is_kept() {
        let directory = directory();
        let mut payload = hire("Ana Silva", "Engineering");
        payload.employee_code = Some("EMP9000".into());

        let employee = directory.create(payload).await.unwrap();
        assert_eq!(employee.employee_code, "EMP9000");
    }

    #[actix_web::test]
    async fn rejects_missing_name_and_bad_email() {
        let directory = directory();

        let mut nameless = hire("x", "Engineering");
        nameless.name = "  ".into();
        assert!(matches!(
            directory.create(nameless).await.unwrap_err(),
            AppError::BadRequest(_)
        ));

        let mut bad_email = hire("Ana", "Engineering");
        bad_email.email = "nope".into();
        assert!(matches!(
            directory.create(bad_email).await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }

    #[actix_web::test]
    async fn search_and_department_filters() {
        let directory = directory();
        directory.create(hire("Ana Silva", "Engineering")).await.unwrap();
        directory.create(hire("Bob Stone", "Sales")).await.unwrap();
        directory.create(hire("Carla Silva", "Sales")).await.unwrap();

        assert_eq!(directory.search_by_name("SILVA").await.unwrap().len(), 2);
        assert_eq!(directory.get_by_department("Sales").await.unwrap().len(), 2);
        assert_eq!(directory.get_all().await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn update_and_delete() {
        let directory = directory();
        let employee = directory.create(hire("Ana Silva", "Engineering")).await.unwrap();

        let updated = directory
            .update(
                &employee.id,
                EmployeePatch {
                    department: Some("Platform".into()),
                    ..EmployeePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.department, "Platform");

        directory.delete(&employee.id).await.unwrap();
        assert!(matches!(
            directory.delete(&employee.id).await.unwrap_err(),
            AppError::NotFound("Employee")
        ));
    }
}
