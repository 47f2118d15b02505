use sqlx::MySqlPool;
use tracing::info;

use crate::error::AppError;

/// Tables are created when missing. Unique keys back the
/// one-record-per-day and one-payroll-per-month rules. Enumerations are
/// `ENUM` columns, which is what the derived `sqlx::Type` impls decode from.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS employees (
        id            VARCHAR(36)  NOT NULL PRIMARY KEY,
        employee_code VARCHAR(32)  NOT NULL UNIQUE,
        name          VARCHAR(255) NOT NULL,
        email         VARCHAR(255) NOT NULL,
        phone         VARCHAR(32)  NULL,
        department    VARCHAR(128) NOT NULL,
        designation   VARCHAR(128) NOT NULL,
        join_date     DATE         NOT NULL,
        status        ENUM('active','inactive','on-leave') NOT NULL DEFAULT 'active'
    )"#,
    r#"CREATE TABLE IF NOT EXISTS attendance (
        id          VARCHAR(36) NOT NULL PRIMARY KEY,
        employee_id VARCHAR(36) NOT NULL,
        date        DATE        NOT NULL,
        check_in    TIME        NULL,
        check_out   TIME        NULL,
        status      ENUM('present','absent','late','half-day') NOT NULL,
        work_mode   ENUM('office','remote','hybrid') NOT NULL DEFAULT 'office',
        total_hours DOUBLE      NOT NULL DEFAULT 0,
        UNIQUE KEY uq_attendance_employee_day (employee_id, date)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS leave_requests (
        id          VARCHAR(36)  NOT NULL PRIMARY KEY,
        employee_id VARCHAR(36)  NOT NULL,
        leave_type  ENUM('annual','sick','festival','maternity','paternity','emergency','unpaid') NOT NULL,
        start_date  DATE         NOT NULL,
        end_date    DATE         NOT NULL,
        reason      TEXT         NOT NULL,
        status      ENUM('pending','approved','rejected') NOT NULL DEFAULT 'pending',
        applied_on  DATETIME     NOT NULL,
        approved_by VARCHAR(255) NULL,
        KEY idx_leave_employee (employee_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS payroll (
        id           VARCHAR(36) NOT NULL PRIMARY KEY,
        employee_id  VARCHAR(36) NOT NULL,
        month        DATE        NOT NULL,
        basic_salary DOUBLE      NOT NULL,
        allowances   JSON        NOT NULL,
        deductions   JSON        NOT NULL,
        net_pay      DOUBLE      NOT NULL,
        status       ENUM('pending','processed','paid') NOT NULL DEFAULT 'pending',
        UNIQUE KEY uq_payroll_employee_month (employee_id, month)
    )"#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, AppError> {
    let pool = MySqlPool::connect(database_url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), AppError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = SCHEMA.len(), "Database schema ready");
    Ok(())
}
