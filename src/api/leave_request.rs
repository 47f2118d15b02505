use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::paginate;
use crate::error::AppError;
use crate::model::leave_request::{LeaveFilter, LeaveRequest, LeaveStatus};
use crate::service::AppState;
use crate::service::leave::CreateLeave;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaveQuery {
    /// Filter by employee ID
    pub employee_id: Option<String>,
    /// Filter by leave status
    #[param(value_type = Option<String>, example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveDecision {
    /// Name of the approver recorded on the request
    #[schema(example = "HR Manager")]
    pub approved_by: String,
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid leave request", body = Object, example = json!({
            "message": "start_date cannot be after end_date"
        }))
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    state: web::Data<AppState>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leaves.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(leave))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Paginated leave requests, newest first", body = LeaveListResponse)
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    state: web::Data<AppState>,
    query: web::Query<LeaveQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let leaves = state
        .leaves
        .list(&LeaveFilter {
            employee_id: query.employee_id,
            status: query.status,
        })
        .await?;
    let (data, page, per_page, total) = paginate(leaves, query.page, query.per_page);

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/leave/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let leave = state
        .leaves
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound("Leave request"))?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Approve / reject
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{id}/approve",
    params(("id" = String, Path, description = "Leave request ID")),
    request_body = LeaveDecision,
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Leave request already processed", body = Object, example = json!({
            "message": "Leave request already processed"
        })),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<LeaveDecision>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leaves.approve(&path, &body.approved_by).await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    put,
    path = "/api/leave/{id}/reject",
    params(("id" = String, Path, description = "Leave request ID")),
    request_body = LeaveDecision,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Leave request already processed"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<LeaveDecision>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leaves.reject(&path, &body.approved_by).await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    delete,
    path = "/api/leave/{id}",
    params(("id" = String, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request deleted", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leaves.delete(&path).await?;
    Ok(HttpResponse::Ok().json(leave))
}
