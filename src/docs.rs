use crate::api::attendance::{CheckInRequest, CheckOutRequest, StatusCorrection};
use crate::api::employee::EmployeeListResponse;
use crate::api::leave_request::{LeaveDecision, LeaveListResponse};
use crate::api::payroll::PaginatedPayrollResponse;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, WorkMode};
use crate::model::employee::{Employee, EmployeePatch, EmployeeStatus};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::payroll::{Payroll, PayrollPatch, PayrollStatus};
use crate::service::attendance::{AttendanceSummary, NewAttendance};
use crate::service::employee::CreateEmployee;
use crate::service::leave::CreateLeave;
use crate::service::payroll::{CreatePayroll, PayrollTotals};
use crate::service::report::{AttendanceTrendPoint, Dashboard, MonthlyPayroll};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Portal API",
        version = "1.0.0",
        description = r#"
## Human Resource Management Portal

### 🔹 Key Features
- **Attendance**
  - Daily check-in / check-out with computed working hours
  - Administrative entries, status corrections and monthly summaries
- **Employee Directory**
  - Create, update, search and list employee profiles
- **Leave Management**
  - Apply for leave, approve/reject pending requests
- **Payroll**
  - Draft and process payroll, monthly totals
- **Reports**
  - Dashboard counts, attendance trend and distributions

### 📦 Response Format
- JSON with snake_case fields, dates as `YYYY-MM-DD`, times as `HH:MM`
- Errors are returned as `{"message": "..."}`
- Pagination supported for employee, leave and payroll lists

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::correct_status,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::attendance_summary,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::delete_leave,

        crate::api::payroll::create_payroll,
        crate::api::payroll::process_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::delete_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::payroll_totals,

        crate::api::report::dashboard,
        crate::api::report::attendance_trend,
        crate::api::report::department_distribution,
        crate::api::report::leave_type_distribution,
        crate::api::report::monthly_payroll
    ),
    components(
        schemas(
            AttendanceRecord,
            AttendanceStatus,
            WorkMode,
            CheckInRequest,
            CheckOutRequest,
            StatusCorrection,
            NewAttendance,
            AttendanceSummary,
            Employee,
            EmployeeStatus,
            EmployeePatch,
            CreateEmployee,
            EmployeeListResponse,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            CreateLeave,
            LeaveDecision,
            LeaveListResponse,
            Payroll,
            PayrollStatus,
            PayrollPatch,
            CreatePayroll,
            PayrollTotals,
            PaginatedPayrollResponse,
            Dashboard,
            AttendanceTrendPoint,
            MonthlyPayroll
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance day-cycle APIs"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
        (name = "Reports", description = "Reporting APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_check_in_and_check_out() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/attendance/check-in"));
        assert!(paths.contains_key("/api/attendance/check-out"));
        assert!(paths.contains_key("/api/reports/dashboard"));
    }

    #[test]
    fn response_bodies_reference_registered_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = |path: &str, method: &str| {
            doc["paths"][path][method]["responses"]["200"]["content"]["application/json"]["schema"]
                .clone()
        };

        assert_eq!(
            schema("/api/attendance/check-in", "post")["$ref"],
            "#/components/schemas/AttendanceRecord"
        );
        assert_eq!(
            schema("/api/reports/dashboard", "get")["$ref"],
            "#/components/schemas/Dashboard"
        );
        assert_eq!(
            schema("/api/reports/attendance-trend", "get")["items"]["$ref"],
            "#/components/schemas/AttendanceTrendPoint"
        );

        let schemas = &doc["components"]["schemas"];
        for name in ["AttendanceRecord", "AttendanceSummary", "PayrollTotals", "Dashboard", "MonthlyPayroll"] {
            assert!(schemas.get(name).is_some(), "{name} missing from components");
        }
    }
}
