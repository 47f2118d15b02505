use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::service::AppState;
use crate::service::report::DEFAULT_TREND_MONTHS;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Number of months ending with the current one (1-24, default 6)
    #[param(example = 6)]
    pub months: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    responses(
        (status = 200, description = "Head-line counts for today", body = crate::service::report::Dashboard)
    ),
    tag = "Reports"
)]
pub async fn dashboard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.reports.dashboard().await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/attendance-trend",
    params(TrendQuery),
    responses(
        (status = 200, description = "Present/absent counts per month, oldest first", body = [crate::service::report::AttendanceTrendPoint]),
        (status = 400, description = "months out of range")
    ),
    tag = "Reports"
)]
pub async fn attendance_trend(
    state: web::Data<AppState>,
    query: web::Query<TrendQuery>,
) -> Result<HttpResponse, AppError> {
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    Ok(HttpResponse::Ok().json(state.reports.attendance_trend(months).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/departments",
    responses(
        (status = 200, description = "Employees per department", body = Object, example = json!({
            "Engineering": 12,
            "Sales": 4
        }))
    ),
    tag = "Reports"
)]
pub async fn department_distribution(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.reports.department_distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/leave-types",
    responses(
        (status = 200, description = "Leave requests per leave type", body = Object, example = json!({
            "annual": 3,
            "sick": 5
        }))
    ),
    tag = "Reports"
)]
pub async fn leave_type_distribution(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.reports.leave_type_distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/payroll",
    responses(
        (status = 200, description = "Net pay per month, oldest first", body = [crate::service::report::MonthlyPayroll])
    ),
    tag = "Reports"
)]
pub async fn monthly_payroll(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.reports.monthly_payroll().await?))
}
