use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::AppError;
use crate::model::leave_request::{LeaveFilter, LeavePatch, LeaveRequest, LeaveStatus, LeaveType};
use crate::store::RecordStore;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLeave {
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
}

pub struct LeaveService {
    store: Arc<dyn RecordStore<LeaveRequest>>,
    clock: Arc<dyn Clock>,
}

impl LeaveService {
    pub fn new(store: Arc<dyn RecordStore<LeaveRequest>>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get_all(&self) -> Result<Vec<LeaveRequest>, AppError> {
        self.store.query(&LeaveFilter::default()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<LeaveRequest>, AppError> {
        self.store.get(id).await
    }

    pub async fn get_by_employee_id(&self, employee_id: &str) -> Result<Vec<LeaveRequest>, AppError> {
        self.store
            .query(&LeaveFilter {
                employee_id: Some(employee_id.to_string()),
                status: None,
            })
            .await
    }

    pub async fn list(&self, filter: &LeaveFilter) -> Result<Vec<LeaveRequest>, AppError> {
        self.store.query(filter).await
    }

    /// Submits a request in `pending` state.
    pub async fn create(&self, payload: CreateLeave) -> Result<LeaveRequest, AppError> {
        if payload.start_date > payload.end_date {
            return Err(AppError::bad_request("start_date cannot be after end_date"));
        }
        if payload.reason.trim().is_empty() {
            return Err(AppError::bad_request("Reason is required"));
        }

        let applied_on = self.clock.now_utc();
        let leave = LeaveRequest {
            id: Uuid::new_v4().to_string(),
            employee_id: payload.employee_id,
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason.trim().to_string(),
            status: LeaveStatus::Pending,
            applied_on,
            approved_by: None,
        };

        let leave = self.store.create(leave).await?;
        info!(id = %leave.id, employee_id = %leave.employee_id, leave_type = %leave.leave_type, "Leave request submitted");
        Ok(leave)
    }

    pub async fn approve(&self, id: &str, approved_by: &str) -> Result<LeaveRequest, AppError> {
        self.decide(id, LeaveStatus::Approved, approved_by).await
    }

    pub async fn reject(&self, id: &str, approved_by: &str) -> Result<LeaveRequest, AppError> {
        self.decide(id, LeaveStatus::Rejected, approved_by).await
    }

    /// Only pending requests can be decided.
    async fn decide(
        &self,
        id: &str,
        status: LeaveStatus,
        approved_by: &str,
    ) -> Result<LeaveRequest, AppError> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or(AppError::NotFound("Leave request"))?;

        if current.status != LeaveStatus::Pending {
            warn!(id, current = %current.status, "Leave request already processed");
            return Err(AppError::bad_request("Leave request already processed"));
        }

        let updated = self
            .store
            .update(
                id,
                LeavePatch {
                    status: Some(status),
                    approved_by: Some(approved_by.to_string()),
                },
            )
            .await?;

        info!(id, status = %status, approved_by, "Leave request decided");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<LeaveRequest, AppError> {
        let removed = self.store.delete(id).await?;
        info!(id, "Leave request deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    fn service() -> LeaveService {
        LeaveService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::at("2026-01-02", "10:00")),
        )
    }

    fn request(start: u32, end: u32) -> CreateLeave {
        CreateLeave {
            employee_id: "E1".into(),
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(2026, 1, start).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, end).unwrap(),
            reason: " Family trip ".into(),
        }
    }

    #[actix_web::test]
    async fn new_requests_are_pending() {
        let service = service();
        let leave = service.create(request(10, 12)).await.unwrap();

        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.reason, "Family trip");
        assert_eq!(leave.applied_on.to_rfc3339(), "2026-01-02T10:00:00+00:00");
        assert_eq!(leave.duration_days(), 3);
    }

    #[actix_web::test]
    async fn inverted_dates_and_blank_reason_are_rejected() {
        let service = service();

        let err = service.create(request(12, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut blank = request(10, 10);
        blank.reason = "   ".into();
        assert!(matches!(
            service.create(blank).await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn approval_records_approver_once() {
        let service = service();
        let leave = service.create(request(10, 12)).await.unwrap();

        let approved = service.approve(&leave.id, "HR Manager").await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("HR Manager"));

        let err = service.reject(&leave.id, "HR Manager").await.unwrap_err();
        assert_eq!(err.to_string(), "Leave request already processed");
    }

    #[actix_web::test]
    async fn deciding_unknown_request_is_not_found() {
        let service = service();
        assert!(matches!(
            service.approve("missing", "HR").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[actix_web::test]
    async fn filters_by_employee_and_status() {
        let service = service();
        let first = service.create(request(10, 12)).await.unwrap();
        service.create(request(20, 21)).await.unwrap();
        service.reject(&first.id, "HR").await.unwrap();

        assert_eq!(service.get_by_employee_id("E1").await.unwrap().len(), 2);
        let pending = service
            .list(&LeaveFilter {
                employee_id: None,
                status: Some(LeaveStatus::Pending),
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
    }
}
