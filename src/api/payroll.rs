use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::paginate;
use crate::error::AppError;
use crate::model::payroll::{Payroll, PayrollFilter, PayrollPatch};
use crate::service::AppState;
use crate::service::payroll::CreatePayroll;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayrollQuery {
    pub employee_id: Option<String>,
    /// Any day inside the pay month
    #[param(value_type = Option<String>, format = "date", example = "2026-01-01")]
    pub month: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<Payroll>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

/// Store a payroll draft (`pending`)
#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll created", body = Payroll),
        (status = 400, description = "Invalid amounts"),
        (status = 409, description = "Payroll already exists for that month")
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    state: web::Data<AppState>,
    payload: web::Json<CreatePayroll>,
) -> Result<HttpResponse, AppError> {
    let payroll = state.payroll.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(payroll))
}

/// Compute net pay and store the record as `processed`
#[utoipa::path(
    post,
    path = "/api/payroll/process",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll processed", body = Payroll),
        (status = 400, description = "Invalid amounts"),
        (status = 409, description = "Payroll already exists for that month")
    ),
    tag = "Payroll"
)]
pub async fn process_payroll(
    state: web::Data<AppState>,
    payload: web::Json<CreatePayroll>,
) -> Result<HttpResponse, AppError> {
    let payroll = state.payroll.process(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(payroll))
}

#[utoipa::path(
    put,
    path = "/api/payroll/{id}",
    params(("id" = String, Path, description = "Payroll ID")),
    request_body = PayrollPatch,
    responses(
        (status = 200, description = "Payroll updated, net pay recomputed", body = Payroll),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll"
)]
pub async fn update_payroll(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<PayrollPatch>,
) -> Result<HttpResponse, AppError> {
    let payroll = state.payroll.update(&path, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/payroll/{id}",
    params(("id" = String, Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payroll found", body = Payroll),
        (status = 404, description = "Payroll record not found", body = Object, example = json!({
            "message": "Payroll record not found"
        }))
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payroll = state
        .payroll
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound("Payroll record"))?;
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    delete,
    path = "/api/payroll/{id}",
    params(("id" = String, Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payroll deleted", body = Payroll),
        (status = 404, description = "Payroll record not found")
    ),
    tag = "Payroll"
)]
pub async fn delete_payroll(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payroll = state.payroll.delete(&path).await?;
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Paginated payroll records", body = PaginatedPayrollResponse)
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    state: web::Data<AppState>,
    query: web::Query<PayrollQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let records = match (query.employee_id, query.month) {
        (Some(employee_id), None) => state.payroll.get_by_employee_id(&employee_id).await?,
        (None, Some(month)) => state.payroll.get_by_month(month).await?,
        (None, None) => state.payroll.get_all().await?,
        (employee_id, month) => {
            state
                .payroll
                .list(&PayrollFilter { employee_id, month })
                .await?
        }
    };
    let (data, page, per_page, total) = paginate(records, query.page, query.per_page);

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Gross, deductions and net pay per month
#[utoipa::path(
    get,
    path = "/api/payroll/totals",
    responses(
        (status = 200, description = "Totals per month, oldest first", body = [crate::service::payroll::PayrollTotals])
    ),
    tag = "Payroll"
)]
pub async fn payroll_totals(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let totals = state.payroll.monthly_totals().await?;
    Ok(HttpResponse::Ok().json(totals))
}
