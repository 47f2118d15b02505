use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::clock::Clock;
use crate::error::AppError;
use crate::model::attendance::{AttendanceFilter, AttendanceRecord, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeFilter};
use crate::model::leave_request::{LeaveFilter, LeaveRequest, LeaveStatus};
use crate::model::payroll::{Payroll, PayrollFilter, month_start};
use crate::service::attendance::month_bounds;
use crate::store::RecordStore;

pub const DEFAULT_TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Dashboard {
    pub total_employees: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub pending_leaves: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceTrendPoint {
    /// `YYYY-MM`
    #[schema(example = "2026-01")]
    pub month: String,
    pub present: usize,
    pub absent: usize,
    /// Whole-number percentage of present records.
    pub rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyPayroll {
    #[schema(example = "2026-01")]
    pub month: String,
    pub total_net_pay: f64,
    pub records: usize,
}

pub struct ReportService {
    attendance: Arc<dyn RecordStore<AttendanceRecord>>,
    employees: Arc<dyn RecordStore<Employee>>,
    leaves: Arc<dyn RecordStore<LeaveRequest>>,
    payroll: Arc<dyn RecordStore<Payroll>>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        attendance: Arc<dyn RecordStore<AttendanceRecord>>,
        employees: Arc<dyn RecordStore<Employee>>,
        leaves: Arc<dyn RecordStore<LeaveRequest>>,
        payroll: Arc<dyn RecordStore<Payroll>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            attendance,
            employees,
            leaves,
            payroll,
            clock,
        }
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let total_employees = self.employees.query(&EmployeeFilter::default()).await?.len();
        let today = self
            .attendance
            .query(&AttendanceFilter::on_date(self.clock.today()))
            .await?;
        let pending_leaves = self
            .leaves
            .query(&LeaveFilter {
                employee_id: None,
                status: Some(LeaveStatus::Pending),
            })
            .await?
            .len();

        Ok(Dashboard {
            total_employees,
            present_today: count_status(&today, AttendanceStatus::Present),
            absent_today: count_status(&today, AttendanceStatus::Absent),
            pending_leaves,
        })
    }

    /// The last `months` calendar months, oldest first, ending with the current one.
    pub async fn attendance_trend(&self, months: u32) -> Result<Vec<AttendanceTrendPoint>, AppError> {
        if months == 0 || months > 24 {
            return Err(AppError::bad_request("months must be between 1 and 24"));
        }

        let current = month_start(self.clock.today());
        let mut points = Vec::with_capacity(months as usize);

        for back in (0..months).rev() {
            let month = current
                .checked_sub_months(Months::new(back))
                .ok_or_else(|| AppError::internal("month arithmetic out of range"))?;
            let (start, end) = month_bounds(month.year(), month.month())
                .ok_or_else(|| AppError::internal("month arithmetic out of range"))?;

            let records = self
                .attendance
                .query(&AttendanceFilter::between(start, end))
                .await?;
            let present = count_status(&records, AttendanceStatus::Present);
            let absent = count_status(&records, AttendanceStatus::Absent);
            let rate = if records.is_empty() {
                0
            } else {
                (present as f64 / records.len() as f64 * 100.0).round() as u32
            };

            points.push(AttendanceTrendPoint {
                month: month_label(month),
                present,
                absent,
                rate,
            });
        }

        Ok(points)
    }

    /// Employee head-count per department.
    pub async fn department_distribution(&self) -> Result<BTreeMap<String, usize>, AppError> {
        let mut counts = BTreeMap::new();
        for employee in self.employees.query(&EmployeeFilter::default()).await? {
            *counts.entry(employee.department).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of leave requests per leave type.
    pub async fn leave_type_distribution(&self) -> Result<BTreeMap<String, usize>, AppError> {
        let mut counts = BTreeMap::new();
        for leave in self.leaves.query(&LeaveFilter::default()).await? {
            *counts.entry(leave.leave_type.to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Net pay per month, oldest first.
    pub async fn monthly_payroll(&self) -> Result<Vec<MonthlyPayroll>, AppError> {
        let mut by_month: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for p in self.payroll.query(&PayrollFilter::default()).await? {
            let entry = by_month.entry(month_start(p.month)).or_default();
            entry.0 += p.net_pay;
            entry.1 += 1;
        }

        Ok(by_month
            .into_iter()
            .map(|(month, (total_net_pay, records))| MonthlyPayroll {
                month: month_label(month),
                total_net_pay,
                records,
            })
            .collect())
    }
}

fn count_status(records: &[AttendanceRecord], status: AttendanceStatus) -> usize {
    records.iter().filter(|r| r.status == status).count()
}

fn month_label(month: NaiveDate) -> String {
    month.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::attendance::WorkMode;
    use crate::model::employee::EmployeeStatus;
    use crate::model::leave_request::LeaveType;
    use crate::model::payroll::{LineItems, PayrollStatus};
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use sqlx::types::Json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attendance(id: &str, employee_id: &str, date: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: id.into(),
            employee_id: employee_id.into(),
            date,
            check_in: None,
            check_out: None,
            status,
            work_mode: WorkMode::Office,
            total_hours: 0.0,
        }
    }

    fn employee(id: &str, department: &str) -> Employee {
        Employee {
            id: id.into(),
            employee_code: format!("EMP{}", id),
            name: id.into(),
            email: format!("{}@company.com", id),
            phone: None,
            department: department.into(),
            designation: "Engineer".into(),
            join_date: day(2024, 1, 1),
            status: EmployeeStatus::Active,
        }
    }

    fn leave(id: &str, leave_type: LeaveType, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: id.into(),
            employee_id: "E1".into(),
            leave_type,
            start_date: day(2026, 3, 1),
            end_date: day(2026, 3, 2),
            reason: "r".into(),
            status,
            applied_on: Utc.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap(),
            approved_by: None,
        }
    }

    fn payroll(id: &str, employee_id: &str, month: NaiveDate, net_pay: f64) -> Payroll {
        Payroll {
            id: id.into(),
            employee_id: employee_id.into(),
            month,
            basic_salary: net_pay,
            allowances: Json(LineItems::new()),
            deductions: Json(LineItems::new()),
            net_pay,
            status: PayrollStatus::Processed,
        }
    }

    fn reports() -> ReportService {
        let attendance = MemoryStore::seeded(vec![
            attendance("A1", "E1", day(2026, 3, 10), AttendanceStatus::Present),
            attendance("A2", "E2", day(2026, 3, 10), AttendanceStatus::Absent),
            attendance("A3", "E3", day(2026, 3, 10), AttendanceStatus::Late),
            attendance("A4", "E1", day(2026, 2, 3), AttendanceStatus::Present),
            attendance("A5", "E1", day(2026, 2, 4), AttendanceStatus::Present),
            attendance("A6", "E1", day(2026, 2, 5), AttendanceStatus::Absent),
            attendance("A7", "E1", day(2025, 6, 5), AttendanceStatus::Present),
        ])
        .unwrap();
        let employees = MemoryStore::seeded(vec![
            employee("E1", "Engineering"),
            employee("E2", "Engineering"),
            employee("E3", "Sales"),
        ])
        .unwrap();
        let leaves = MemoryStore::seeded(vec![
            leave("L1", LeaveType::Sick, LeaveStatus::Pending),
            leave("L2", LeaveType::Sick, LeaveStatus::Approved),
            leave("L3", LeaveType::Annual, LeaveStatus::Pending),
        ])
        .unwrap();
        let payroll = MemoryStore::seeded(vec![
            payroll("P1", "E1", day(2026, 2, 1), 1000.0),
            payroll("P2", "E2", day(2026, 2, 1), 500.0),
            payroll("P3", "E1", day(2026, 1, 1), 1000.0),
        ])
        .unwrap();

        ReportService::new(
            Arc::new(attendance),
            Arc::new(employees),
            Arc::new(leaves),
            Arc::new(payroll),
            Arc::new(ManualClock::at("2026-03-10", "12:00")),
        )
    }

    #[actix_web::test]
    async fn dashboard_counts_today() {
        let dashboard = reports().dashboard().await.unwrap();
        assert_eq!(
            dashboard,
            Dashboard {
                total_employees: 3,
                present_today: 1,
                absent_today: 1,
                pending_leaves: 2,
            }
        );
    }

    #[actix_web::test]
    async fn trend_covers_last_months_oldest_first() {
        let trend = reports().attendance_trend(DEFAULT_TREND_MONTHS).await.unwrap();

        let months: Vec<_> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, ["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03"]);

        let february = &trend[4];
        assert_eq!((february.present, february.absent, february.rate), (2, 1, 67));
        let march = &trend[5];
        assert_eq!((march.present, march.absent, march.rate), (1, 1, 33));
        assert_eq!(trend[0].rate, 0);
    }

    #[actix_web::test]
    async fn trend_rejects_zero_months() {
        assert!(matches!(
            reports().attendance_trend(0).await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }

    #[actix_web::test]
    async fn distributions() {
        let reports = reports();

        let departments = reports.department_distribution().await.unwrap();
        assert_eq!(departments.get("Engineering"), Some(&2));
        assert_eq!(departments.get("Sales"), Some(&1));

        let leave_types = reports.leave_type_distribution().await.unwrap();
        assert_eq!(leave_types.get("sick"), Some(&2));
        assert_eq!(leave_types.get("annual"), Some(&1));
    }

    #[actix_web::test]
    async fn payroll_by_month_ascending() {
        let payroll = reports().monthly_payroll().await.unwrap();
        assert_eq!(
            payroll,
            vec![
                MonthlyPayroll {
                    month: "2026-01".into(),
                    total_net_pay: 1000.0,
                    records: 1,
                },
                MonthlyPayroll {
                    month: "2026-02".into(),
                    total_net_pay: 1500.0,
                    records: 2,
                },
            ]
        );
    }
}
