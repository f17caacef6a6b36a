//! In-memory report repository

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::report::{ReportEntity, ReportRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory report repository
#[derive(Debug)]
pub struct InMemoryReportRepository<E>
where
    E: ReportEntity,
{
    reports: RwLock<HashMap<Uuid, E>>,
}

impl<E> Default for InMemoryReportRepository<E>
where
    E: ReportEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryReportRepository<E>
where
    E: ReportEntity,
{
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<E> ReportRepository<E> for InMemoryReportRepository<E>
where
    E: ReportEntity,
{
    async fn get(&self, id: Uuid) -> Result<Option<E>, DomainError> {
        let reports = self.reports.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(reports.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let reports = self.reports.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut all: Vec<E> = reports.values().cloned().collect();
        all.sort_by(|a, b| b.reported_at().cmp(&a.reported_at()));
        Ok(all)
    }

    async fn create(&self, report: E) -> Result<E, DomainError> {
        let mut reports = self.reports.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        reports.insert(report.id(), report.clone());
        Ok(report)
    }

    async fn update(&self, report: E) -> Result<E, DomainError> {
        let mut reports = self.reports.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if !reports.contains_key(&report.id()) {
            return Err(DomainError::not_found(format!(
                "Report '{}' not found",
                report.id()
            )));
        }

        reports.insert(report.id(), report.clone());
        Ok(report)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut reports = self.reports.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(reports.remove(&id).is_some())
    }
}
