use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::AppError;
use crate::store::{MemoryStore, Record, Stores};

/// Builds in-memory stores from `employees.json`, `attendance.json`,
/// `leaves.json` and `payroll.json` under `dir`. Missing files leave the
/// matching store empty.
pub fn load_stores(dir: &Path) -> Result<Stores, AppError> {
    Ok(Stores {
        employees: Arc::new(load(dir, "employees.json")?),
        attendance: Arc::new(load(dir, "attendance.json")?),
        leaves: Arc::new(load(dir, "leaves.json")?),
        payroll: Arc::new(load(dir, "payroll.json")?),
    })
}

fn load<R>(dir: &Path, file: &str) -> Result<MemoryStore<R>, AppError>
where
    R: Record + DeserializeOwned,
{
    let path = dir.join(file);
    if !path.exists() {
        warn!(path = %path.display(), "Seed file missing, starting empty");
        return Ok(MemoryStore::new());
    }

    let raw = fs::read_to_string(&path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let records: Vec<R> = serde_json::from_str(&raw)?;

    let count = records.len();
    let store = MemoryStore::seeded(records).map_err(|e| {
        AppError::Config(format!("invalid seed file {}: {}", path.display(), e))
    })?;

    info!(table = R::TABLE, count, "Seeded records");
    Ok(store)
}
