use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::model::attendance::{AttendanceStatus, WorkMode};
use crate::service::AppState;
use crate::service::attendance::NewAttendance;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = "E1")]
    pub employee_id: String,
    /// Defaults to `office`.
    #[serde(default)]
    #[schema(example = "remote")]
    pub work_mode: WorkMode,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckOutRequest {
    #[schema(example = "E1")]
    pub employee_id: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only this employee's records
    pub employee_id: Option<String>,
    /// Inclusive range start, requires `end_date`
    #[param(value_type = Option<String>, format = "date", example = "2026-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end, requires `start_date`
    #[param(value_type = Option<String>, format = "date", example = "2026-01-31")]
    pub end_date: Option<NaiveDate>,
    /// A single day
    #[param(value_type = Option<String>, format = "date", example = "2026-01-05")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusCorrection {
    #[schema(example = "late")]
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub employee_id: Option<String>,
    /// Defaults to the current month together with `month`
    #[param(example = 2026)]
    pub year: Option<i32>,
    #[param(example = 1)]
    pub month: Option<u32>,
}

/// Start the working day
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in", body = crate::model::attendance::AttendanceRecord),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    state: web::Data<AppState>,
    body: web::Json<CheckInRequest>,
) -> Result<HttpResponse, AppError> {
    let CheckInRequest {
        employee_id,
        work_mode,
    } = body.into_inner();
    let record = state.attendance.check_in(&employee_id, work_mode).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Close today's open record
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = CheckOutRequest,
    responses(
        (status = 200, description = "Checked out, total_hours computed", body = crate::model::attendance::AttendanceRecord),
        (status = 400, description = "No open check-in today", body = Object, example = json!({
            "message": "No active check-in found or already checked out"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    state: web::Data<AppState>,
    body: web::Json<CheckOutRequest>,
) -> Result<HttpResponse, AppError> {
    let record = state.attendance.check_out(&body.employee_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Matching records", body = [crate::model::attendance::AttendanceRecord]),
        (status = 400, description = "Incomplete date range")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();

    let records = match (query.employee_id, query.start_date, query.end_date, query.date) {
        (Some(employee_id), None, None, None) => {
            state.attendance.get_by_employee_id(&employee_id).await?
        }
        (None, Some(start), Some(end), None) => {
            state.attendance.get_by_date_range(start, end).await?
        }
        (None, None, None, Some(date)) => state.attendance.get_by_date(date).await?,
        (None, None, None, None) => state.attendance.get_all().await?,
        (employee_id, start, end, date) => {
            // combined filters are narrowed in memory
            let mut records = match (start, end) {
                (Some(start), Some(end)) => state.attendance.get_by_date_range(start, end).await?,
                (None, None) => state.attendance.get_all().await?,
                _ => {
                    return Err(AppError::bad_request(
                        "start_date and end_date must be given together",
                    ));
                }
            };
            records.retain(|r| {
                employee_id.as_deref().is_none_or(|e| r.employee_id == e)
                    && date.is_none_or(|d| r.date == d)
            });
            records
        }
    };

    Ok(HttpResponse::Ok().json(records))
}

/// Get a single attendance record
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = String, Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Record found", body = crate::model::attendance::AttendanceRecord),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = state
        .attendance
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound("Attendance record"))?;
    Ok(HttpResponse::Ok().json(record))
}

/// Record attendance after the fact, e.g. an absence
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Record created", body = crate::model::attendance::AttendanceRecord),
        (status = 400, description = "Invalid record"),
        (status = 409, description = "A record already exists for that day")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    state: web::Data<AppState>,
    body: web::Json<NewAttendance>,
) -> Result<HttpResponse, AppError> {
    let record = state.attendance.create_record(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Correct the status of a record
#[utoipa::path(
    put,
    path = "/api/attendance/{id}/status",
    params(("id" = String, Path, description = "Attendance record id")),
    request_body = StatusCorrection,
    responses(
        (status = 200, description = "Status updated", body = crate::model::attendance::AttendanceRecord),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn correct_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusCorrection>,
) -> Result<HttpResponse, AppError> {
    let record = state.attendance.correct_status(&path, body.status).await?;
    Ok(HttpResponse::Ok().json(record))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = String, Path, description = "Attendance record id")),
    responses(
        (status = 200, description = "Record deleted", body = crate::model::attendance::AttendanceRecord),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = state.attendance.delete(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Monthly attendance summary
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary for the month", body = crate::service::attendance::AttendanceSummary),
        (status = 400, description = "Invalid month")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    state: web::Data<AppState>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = query.employee_id.as_deref();
    let summary = match (query.year, query.month) {
        (Some(year), Some(month)) => {
            state
                .attendance
                .monthly_summary(employee_id, year, month)
                .await?
        }
        (None, None) => state.attendance.current_month_summary(employee_id).await?,
        _ => return Err(AppError::bad_request("year and month must be given together")),
    };
    Ok(HttpResponse::Ok().json(summary))
}
