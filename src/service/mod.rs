pub mod attendance;
pub mod employee;
pub mod leave;
pub mod payroll;
pub mod report;

use std::sync::Arc;

use crate::clock::Clock;
use crate::store::Stores;

pub use attendance::AttendanceDayCycle;
pub use employee::EmployeeDirectory;
pub use leave::LeaveService;
pub use payroll::PayrollService;
pub use report::ReportService;

/// Everything the HTTP handlers need, shared through `web::Data`.
pub struct AppState {
    pub attendance: AttendanceDayCycle,
    pub employees: EmployeeDirectory,
    pub leaves: LeaveService,
    pub payroll: PayrollService,
    pub reports: ReportService,
}

impl AppState {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>) -> Self {
        Self {
            attendance: AttendanceDayCycle::new(stores.attendance.clone(), clock.clone()),
            employees: EmployeeDirectory::new(stores.employees.clone(), clock.clone()),
            leaves: LeaveService::new(stores.leaves.clone(), clock.clone()),
            payroll: PayrollService::new(stores.payroll.clone()),
            reports: ReportService::new(
                stores.attendance,
                stores.employees,
                stores.leaves,
                stores.payroll,
                clock,
            ),
        }
    }
}
