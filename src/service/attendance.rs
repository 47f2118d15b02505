//! The attendance day-cycle.
//!
//! Per `(employee, calendar day)` a record moves `NoRecord → CheckedIn →
//! CheckedOut`. A new day starts again at `NoRecord`. The store is only
//! written on the success path of each transition.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::clock::{Clock, minute_of};
use crate::error::AppError;
use crate::model::attendance::{
    AttendanceFilter, AttendancePatch, AttendanceRecord, AttendanceStatus, WorkMode,
};
use crate::store::RecordStore;

/// Hours between two times of day, rounded to 2 decimals. A check-out that
/// reads earlier than its check-in yields zero.
pub fn worked_hours(check_in: NaiveTime, check_out: NaiveTime) -> f64 {
    let minutes = (check_out - check_in).num_minutes().max(0);
    round2(minutes as f64 / 60.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Administrative entry, e.g. an absence recorded after the fact.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAttendance {
    pub employee_id: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[serde(with = "crate::utils::time_format::option", default)]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub check_in: Option<NaiveTime>,
    #[serde(with = "crate::utils::time_format::option", default)]
    #[schema(value_type = Option<String>, example = "17:30")]
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub work_mode: WorkMode,
}

/// Monthly attendance figures as shown on the attendance page.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    pub total_days: usize,
    pub present_days: usize,
    pub absent_days: usize,
    pub late_days: usize,
    pub total_hours: f64,
    /// Present days as a percentage of recorded days, 1 decimal.
    pub attendance_rate: f64,
    /// Hours per present day, 1 decimal.
    pub avg_hours_per_day: f64,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let count = |status: AttendanceStatus| records.iter().filter(|r| r.status == status).count();

        let total_days = records.len();
        let present_days = count(AttendanceStatus::Present);
        let total_hours = round2(records.iter().map(|r| r.total_hours).sum());

        Self {
            total_days,
            present_days,
            absent_days: count(AttendanceStatus::Absent),
            late_days: count(AttendanceStatus::Late),
            total_hours,
            attendance_rate: if total_days > 0 {
                round1(present_days as f64 / total_days as f64 * 100.0)
            } else {
                0.0
            },
            avg_hours_per_day: if present_days > 0 {
                round1(total_hours / present_days as f64)
            } else {
                0.0
            },
        }
    }
}

/// First and last day of a month, `None` for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

pub struct AttendanceDayCycle {
    store: Arc<dyn RecordStore<AttendanceRecord>>,
    clock: Arc<dyn Clock>,
}

impl AttendanceDayCycle {
    pub fn new(store: Arc<dyn RecordStore<AttendanceRecord>>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn record_on(
        &self,
        employee_id: &str,
        day: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        let mut found = self
            .store
            .query(&AttendanceFilter::on_day(employee_id, day))
            .await?;
        Ok(found.pop())
    }

    /// `NoRecord → CheckedIn`
    pub async fn check_in(
        &self,
        employee_id: &str,
        work_mode: WorkMode,
    ) -> Result<AttendanceRecord, AppError> {
        let now = self.clock.now();
        if self.record_on(employee_id, now.date()).await?.is_some() {
            warn!(employee_id, "Duplicate check-in rejected");
            return Err(AppError::DuplicateCheckIn);
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.to_string(),
            date: now.date(),
            check_in: Some(minute_of(now)),
            check_out: None,
            status: AttendanceStatus::Present,
            work_mode,
            total_hours: 0.0,
        };

        // a concurrent check-in that won the race shows up as a natural-key conflict
        let record = self.store.create(record).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::DuplicateCheckIn,
            other => other,
        })?;

        info!(employee_id, id = %record.id, work_mode = %record.work_mode, "Checked in");
        Ok(record)
    }

    /// `CheckedIn → CheckedOut`
    pub async fn check_out(&self, employee_id: &str) -> Result<AttendanceRecord, AppError> {
        let now = self.clock.now();
        let record = match self.record_on(employee_id, now.date()).await? {
            Some(r) if r.is_open() => r,
            _ => {
                warn!(employee_id, "Check-out without an open check-in rejected");
                return Err(AppError::NoActiveCheckIn);
            }
        };

        let check_out = minute_of(now);
        let total_hours = record
            .check_in
            .map(|check_in| worked_hours(check_in, check_out))
            .unwrap_or_default();

        let updated = self
            .store
            .update(
                &record.id,
                AttendancePatch {
                    check_out: Some(check_out),
                    total_hours: Some(total_hours),
                    status: None,
                },
            )
            .await?;

        info!(employee_id, id = %updated.id, total_hours, "Checked out");
        Ok(updated)
    }

    pub async fn get_all(&self) -> Result<Vec<AttendanceRecord>, AppError> {
        self.store.query(&AttendanceFilter::default()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AttendanceRecord>, AppError> {
        self.store.get(id).await
    }

    pub async fn get_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        self.store
            .query(&AttendanceFilter::for_employee(employee_id))
            .await
    }

    /// Records with `start_date <= date <= end_date`.
    pub async fn get_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        self.store
            .query(&AttendanceFilter::between(start_date, end_date))
            .await
    }

    pub async fn get_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        self.store.query(&AttendanceFilter::on_date(date)).await
    }

    /// Administrative entry outside the day-cycle. Still one record per day.
    pub async fn create_record(&self, new: NewAttendance) -> Result<AttendanceRecord, AppError> {
        if new.check_out.is_some() && new.check_in.is_none() {
            return Err(AppError::bad_request("check_out requires check_in"));
        }
        let total_hours = match (new.check_in, new.check_out) {
            (Some(i), Some(o)) => worked_hours(i, o),
            _ => 0.0,
        };

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            employee_id: new.employee_id,
            date: new.date,
            check_in: new.check_in,
            check_out: new.check_out,
            status: new.status,
            work_mode: new.work_mode,
            total_hours,
        };

        let record = self.store.create(record).await?;
        info!(employee_id = %record.employee_id, date = %record.date, status = %record.status, "Attendance recorded");
        Ok(record)
    }

    /// Changes only the status of an existing record.
    pub async fn correct_status(
        &self,
        id: &str,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, AppError> {
        let updated = self
            .store
            .update(
                id,
                AttendancePatch {
                    status: Some(status),
                    ..AttendancePatch::default()
                },
            )
            .await?;
        info!(id, status = %status, "Attendance status corrected");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<AttendanceRecord, AppError> {
        let removed = self.store.delete(id).await?;
        info!(id, "Attendance record deleted");
        Ok(removed)
    }

    pub async fn monthly_summary(
        &self,
        employee_id: Option<&str>,
        year: i32,
        month: u32,
    ) -> Result<AttendanceSummary, AppError> {
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| AppError::bad_request(format!("Invalid month: {}-{}", year, month)))?;

        let filter = AttendanceFilter {
            employee_id: employee_id.map(str::to_string),
            ..AttendanceFilter::between(start, end)
        };
        let records = self.store.query(&filter).await?;
        Ok(AttendanceSummary::from_records(&records))
    }

    /// Summary for the month containing today.
    pub async fn current_month_summary(
        &self,
        employee_id: Option<&str>,
    ) -> Result<AttendanceSummary, AppError> {
        let today = self.clock.today();
        self.monthly_summary(employee_id, today.year(), today.month())
            .await
    }
}
