//! Report services for geo reports and transit incidents

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::city::Coordinates;
use crate::domain::report::{GeoReport, ReportEntity, ReportRepository, TransitIncident};
use crate::domain::DomainError;

/// Request for creating a geo report
#[derive(Debug, Clone)]
pub struct CreateGeoReportRequest {
    pub city: String,
    pub description: String,
    pub incident_type: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Request for updating a geo report
#[derive(Debug, Clone, Default)]
pub struct UpdateGeoReportRequest {
    pub city: Option<String>,
    pub description: Option<String>,
    pub incident_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Request for creating a transit incident
#[derive(Debug, Clone)]
pub struct CreateTransitIncidentRequest {
    pub line_id: String,
    pub line_name: String,
    pub line_status: String,
    pub line_severity: i32,
}

/// Request for updating a transit incident
#[derive(Debug, Clone, Default)]
pub struct UpdateTransitIncidentRequest {
    pub line_id: Option<String>,
    pub line_name: Option<String>,
    pub line_status: Option<String>,
    pub line_severity: Option<i32>,
}

fn parse_id(id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| DomainError::validation(format!("Invalid report id '{}'", id)))
}

fn validated<E: ReportEntity>(report: E) -> Result<E, DomainError> {
    report
        .validate()
        .map_err(|e| DomainError::validation(e.to_string()))?;
    Ok(report)
}

fn coordinates(latitude: f64, longitude: f64) -> Result<Coordinates, DomainError> {
    Coordinates::new(latitude, longitude).map_err(|e| DomainError::validation(e.to_string()))
}

/// Service for managing geo reports
#[derive(Debug, Clone)]
pub struct GeoReportService {
    repository: Arc<dyn ReportRepository<GeoReport>>,
}

impl GeoReportService {
    pub fn new(repository: Arc<dyn ReportRepository<GeoReport>>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateGeoReportRequest) -> Result<GeoReport, DomainError> {
        let report = validated(GeoReport::new(
            request.city,
            request.description,
            request.incident_type,
            coordinates(request.latitude, request.longitude)?,
        ))?;

        info!(id = %report.id, city = %report.city, "Creating geo report");
        self.repository.create(report).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<GeoReport>, DomainError> {
        self.repository.get(parse_id(id)?).await
    }

    pub async fn list(&self) -> Result<Vec<GeoReport>, DomainError> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateGeoReportRequest,
    ) -> Result<GeoReport, DomainError> {
        let mut report = self
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Report '{}' not found", id)))?;

        if let Some(city) = request.city {
            report.city = city;
        }

        if let Some(description) = request.description {
            report.description = description;
        }

        if let Some(incident_type) = request.incident_type {
            report.incident_type = incident_type;
        }

        if request.latitude.is_some() || request.longitude.is_some() {
            report.coordinates = coordinates(
                request.latitude.unwrap_or(report.coordinates.latitude()),
                request.longitude.unwrap_or(report.coordinates.longitude()),
            )?;
        }

        info!(id = %report.id, "Updating geo report");
        self.repository.update(validated(report)?).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting geo report");
        self.repository.delete(parse_id(id)?).await
    }
}

/// Service for managing transit incidents
#[derive(Debug, Clone)]
pub struct TransitIncidentService {
    repository: Arc<dyn ReportRepository<TransitIncident>>,
}

impl TransitIncidentService {
    pub fn new(repository: Arc<dyn ReportRepository<TransitIncident>>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        request: CreateTransitIncidentRequest,
    ) -> Result<TransitIncident, DomainError> {
        let incident = validated(TransitIncident::new(
            request.line_id,
            request.line_name,
            request.line_status,
            request.line_severity,
        ))?;

        info!(id = %incident.id, line_id = %incident.line_id, "Creating transit incident");
        self.repository.create(incident).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<TransitIncident>, DomainError> {
        self.repository.get(parse_id(id)?).await
    }

    pub async fn list(&self) -> Result<Vec<TransitIncident>, DomainError> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateTransitIncidentRequest,
    ) -> Result<TransitIncident, DomainError> {
        let mut incident = self
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Incident '{}' not found", id)))?;

        if let Some(line_id) = request.line_id {
            incident.line_id = line_id;
        }

        if let Some(line_name) = request.line_name {
            incident.line_name = line_name;
        }

        if let Some(line_status) = request.line_status {
            incident.line_status = line_status;
        }

        if let Some(line_severity) = request.line_severity {
            incident.line_severity = line_severity;
        }

        info!(id = %incident.id, "Updating transit incident");
        self.repository.update(validated(incident)?).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        info!(id = %id, "Deleting transit incident");
        self.repository.delete(parse_id(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::report::InMemoryReportRepository;

    fn geo_service() -> GeoReportService {
        GeoReportService::new(Arc::new(InMemoryReportRepository::<GeoReport>::new()))
    }

    fn incident_service() -> TransitIncidentService {
        TransitIncidentService::new(Arc::new(InMemoryReportRepository::<TransitIncident>::new()))
    }

    fn flood() -> CreateGeoReportRequest {
        CreateGeoReportRequest {
            city: "London".to_string(),
            description: "Flooded underpass".to_string(),
            incident_type: "flood".to_string(),
            latitude: 51.5,
            longitude: -0.12,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_geo_report() {
        let service = geo_service();
        let created = service.create(flood()).await.unwrap();

        let fetched = service.get(&created.id.to_string()).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_coordinates() {
        let service = geo_service();
        let mut request = flood();
        request.latitude = 120.0;

        let result = service.create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let mut request = flood();
        request.incident_type = " ".to_string();

        let result = geo_service().create(request).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let service = geo_service();
        let first = service.create(flood()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = service.create(flood()).await.unwrap();

        let ids: Vec<Uuid> = service.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_partial_update_revalidates() {
        let service = geo_service();
        let created = service.create(flood()).await.unwrap();
        let id = created.id.to_string();

        let updated = service
            .update(
                &id,
                UpdateGeoReportRequest {
                    description: Some("Water receding".to_string()),
                    latitude: Some(51.6),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, "Water receding");
        assert_eq!(updated.coordinates.latitude(), 51.6);
        assert_eq!(updated.coordinates.longitude(), -0.12);

        let invalid = service
            .update(
                &id,
                UpdateGeoReportRequest {
                    city: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let result = geo_service()
            .update(&Uuid::new_v4().to_string(), UpdateGeoReportRequest::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_id_is_validation_error() {
        let result = geo_service().get("not-a-uuid").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_incident_lifecycle() {
        let service = incident_service();
        let created = service
            .create(CreateTransitIncidentRequest {
                line_id: "central".to_string(),
                line_name: "Central".to_string(),
                line_status: "Severe Delays".to_string(),
                line_severity: 6,
            })
            .await
            .unwrap();
        let id = created.id.to_string();

        let updated = service
            .update(
                &id,
                UpdateTransitIncidentRequest {
                    line_status: Some("Good Service".to_string()),
                    line_severity: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.line_status, "Good Service");
        assert_eq!(updated.line_severity, 10);

        assert!(service.delete(&id).await.unwrap());
        assert!(!service.delete(&id).await.unwrap());
        assert!(service.get(&id).await.unwrap().is_none());
    }
}
