use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::payroll::{
    LineItems, Payroll, PayrollFilter, PayrollPatch, PayrollStatus, month_start, total,
};
use crate::store::RecordStore;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePayroll {
    #[schema(example = "E1")]
    pub employee_id: String,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    #[schema(example = 50000.0)]
    pub basic_salary: f64,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"hra": 5000.0}))]
    pub allowances: LineItems,
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"tax": 2000.0}))]
    pub deductions: LineItems,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollTotals {
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    pub records: usize,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
}

pub struct PayrollService {
    store: Arc<dyn RecordStore<Payroll>>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn RecordStore<Payroll>>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<Payroll>, AppError> {
        self.store.query(&PayrollFilter::default()).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Payroll>, AppError> {
        self.store.get(id).await
    }

    pub async fn get_by_employee_id(&self, employee_id: &str) -> Result<Vec<Payroll>, AppError> {
        self.store
            .query(&PayrollFilter {
                employee_id: Some(employee_id.to_string()),
                month: None,
            })
            .await
    }

    pub async fn get_by_month(&self, month: NaiveDate) -> Result<Vec<Payroll>, AppError> {
        self.store
            .query(&PayrollFilter {
                employee_id: None,
                month: Some(month),
            })
            .await
    }

    pub async fn list(&self, filter: &PayrollFilter) -> Result<Vec<Payroll>, AppError> {
        self.store.query(filter).await
    }

    fn build(payload: CreatePayroll, status: PayrollStatus) -> Result<Payroll, AppError> {
        if payload.basic_salary < 0.0 {
            return Err(AppError::bad_request("basic_salary cannot be negative"));
        }

        let mut payroll = Payroll {
            id: Uuid::new_v4().to_string(),
            employee_id: payload.employee_id,
            month: month_start(payload.month),
            basic_salary: payload.basic_salary,
            allowances: Json(payload.allowances),
            deductions: Json(payload.deductions),
            net_pay: 0.0,
            status,
        };
        payroll.net_pay = payroll.compute_net_pay();
        Ok(payroll)
    }

    /// Stores a draft in `pending` state.
    pub async fn create(&self, payload: CreatePayroll) -> Result<Payroll, AppError> {
        let payroll = self.store.create(Self::build(payload, PayrollStatus::Pending)?).await?;
        info!(id = %payroll.id, employee_id = %payroll.employee_id, month = %payroll.month, "Payroll created");
        Ok(payroll)
    }

    /// Computes net pay and stores the record as `processed`.
    pub async fn process(&self, payload: CreatePayroll) -> Result<Payroll, AppError> {
        let payroll = self.store.create(Self::build(payload, PayrollStatus::Processed)?).await?;
        info!(id = %payroll.id, employee_id = %payroll.employee_id, net_pay = payroll.net_pay, "Payroll processed");
        Ok(payroll)
    }

    /// Applies the patch and re-derives net pay from the resulting amounts.
    pub async fn update(&self, id: &str, mut patch: PayrollPatch) -> Result<Payroll, AppError> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or(AppError::NotFound("Payroll record"))?;

        let basic = patch.basic_salary.unwrap_or(current.basic_salary);
        let allowances = patch.allowances.as_ref().unwrap_or(&current.allowances.0);
        let deductions = patch.deductions.as_ref().unwrap_or(&current.deductions.0);
        patch.net_pay = Some(basic + total(allowances) - total(deductions));

        let updated = self.store.update(id, patch).await?;
        info!(id, net_pay = updated.net_pay, "Payroll updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<Payroll, AppError> {
        let removed = self.store.delete(id).await?;
        info!(id, "Payroll deleted");
        Ok(removed)
    }

    /// Totals per pay month, oldest first.
    pub async fn monthly_totals(&self) -> Result<Vec<PayrollTotals>, AppError> {
        let mut by_month: BTreeMap<NaiveDate, PayrollTotals> = BTreeMap::new();

        for p in self.get_all().await? {
            let entry = by_month.entry(p.month).or_insert_with(|| PayrollTotals {
                month: p.month,
                records: 0,
                gross_pay: 0.0,
                total_deductions: 0.0,
                net_pay: 0.0,
            });
            entry.records += 1;
            entry.gross_pay += p.gross_pay();
            entry.total_deductions += p.total_deductions();
            entry.net_pay += p.net_pay;
        }

        Ok(by_month.into_values().collect())
    }
}
