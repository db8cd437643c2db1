use crate::{
    error::{SyncError, ValidationReport},
    loader::{BatchLoader, ClearOutcome},
    metrics::{Metrics, MetricsSnapshot},
    registry::{FieldSpec, TableDescriptor, TableRegistry, registry},
    session::SyncSession,
    validator::validate,
};
use connectors::sql::base::adapter::SqlAdapter;
use serde::{Serialize, Serializer};
use std::{collections::BTreeMap, sync::Arc, time::Duration, time::Instant};
use tracing::{error, info};

const MAX_REPORTED_ERRORS: usize = 5;
const MAX_SAMPLE_RECORDS: usize = 2;
const DEFAULT_DATABASE: &str = "OMEGA";

/// One call of the sync operation, already checked for shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub database: String,
    pub table: String,
    pub data: Vec<serde_json::Value>,
    pub is_first_batch: bool,
    pub is_last_batch: bool,
}

impl SyncRequest {
    pub fn new(table: &str, data: Vec<serde_json::Value>, is_first_batch: bool) -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            table: table.to_string(),
            data,
            is_first_batch,
            is_last_batch: true,
        }
    }

    /// Reads a request body. Checks run in a fixed order: body present,
    /// table named, data a list, flags boolean.
    pub fn from_json(body: &serde_json::Value) -> Result<Self, SyncError> {
        let fields = match body.as_object() {
            Some(fields) if !fields.is_empty() => fields,
            _ => return Err(SyncError::MalformedRequest("No data provided".into())),
        };

        let table = fields
            .get("table")
            .and_then(|t| t.as_str())
            .map(|t| t.trim().to_lowercase())
            .unwrap_or_default();
        if table.is_empty() {
            return Err(SyncError::MalformedRequest(
                "Table name is required".into(),
            ));
        }

        let data = match fields.get("data") {
            None => Vec::new(),
            Some(serde_json::Value::Array(items)) => items.clone(),
            Some(_) => return Err(SyncError::MalformedRequest("Data must be a list".into())),
        };

        let database = fields
            .get("database")
            .and_then(|d| d.as_str())
            .unwrap_or(DEFAULT_DATABASE)
            .to_string();

        Ok(Self {
            database,
            table,
            data,
            is_first_batch: flag(fields, "is_first_batch")?,
            is_last_batch: flag(fields, "is_last_batch")?,
        })
    }
}

fn flag(
    fields: &serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<bool, SyncError> {
    match fields.get(name) {
        None | Some(serde_json::Value::Null) => Ok(true),
        Some(serde_json::Value::Bool(b)) => Ok(*b),
        Some(other) => Err(SyncError::MalformedRequest(format!(
            "{name} must be a boolean, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub success: bool,
    pub message: String,
    pub table: String,
    pub records_processed: usize,
    #[serde(serialize_with = "serialize_deleted")]
    pub records_deleted: Option<ClearOutcome>,
    pub records_inserted: u64,
    pub validation_errors: usize,
    pub processing_time_seconds: f64,
    pub records_per_second: f64,
    pub is_first_batch: bool,
    pub is_last_batch: bool,
}

fn serialize_deleted<S: Serializer>(
    deleted: &Option<ClearOutcome>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match deleted {
        Some(outcome) => outcome.serialize(serializer),
        None => serializer.serialize_u64(0),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    pub record_count: i64,
    pub model: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub truncated_tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub success: bool,
    pub tables: BTreeMap<&'static str, TableStatus>,
    pub total_records: i64,
    pub session: SessionStatus,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    #[serde(flatten)]
    pub spec: FieldSpec,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub success: bool,
    pub table_name: &'static str,
    pub model_name: &'static str,
    pub record_count: i64,
    pub fields: Vec<FieldInfo>,
    pub required_fields: Vec<&'static str>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Valid records per second, zero when the elapsed time rounds to zero.
pub fn throughput(records: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if round2(seconds) == 0.0 {
        0.0
    } else {
        round2(records as f64 / seconds)
    }
}

/// Request-level control flow of the sync service.
#[derive(Clone)]
pub struct SyncService {
    registry: &'static TableRegistry,
    adapter: Arc<dyn SqlAdapter>,
    loader: BatchLoader,
    session: SyncSession,
    metrics: Metrics,
}

impl SyncService {
    pub fn new(adapter: Arc<dyn SqlAdapter>, chunk_size: usize) -> Self {
        Self {
            registry: registry(),
            loader: BatchLoader::new(adapter.clone(), chunk_size),
            adapter,
            session: SyncSession::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn registry(&self) -> &'static TableRegistry {
        self.registry
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn resolve(&self, table: &str) -> Result<&'static TableDescriptor, SyncError> {
        self.registry
            .lookup(table)
            .ok_or_else(|| SyncError::UnsupportedTable {
                table: table.trim().to_lowercase(),
                supported: self.registry.supported_tables(),
            })
    }

    pub async fn sync(&self, request: SyncRequest) -> Result<SyncSummary, SyncError> {
        self.metrics.increment_requests();
        let descriptor = self.resolve(&request.table)?;
        let table = descriptor.name;

        info!(
            table,
            database = %request.database,
            records = request.data.len(),
            first_batch = request.is_first_batch,
            last_batch = request.is_last_batch,
            "Starting sync"
        );
        let start = Instant::now();

        if request.data.is_empty() {
            return self.sync_empty(descriptor, &request, start).await;
        }

        let outcome = validate(&request.data, descriptor);
        if !outcome.is_valid() {
            error!(table, errors = outcome.errors.len(), "Validation failed");
            self.metrics.increment_rejections();
            let total_errors = outcome.errors.len();
            let mut errors = outcome.errors;
            errors.truncate(MAX_REPORTED_ERRORS);
            return Err(SyncError::ValidationFailed(ValidationReport {
                validation_errors: errors,
                total_errors,
                sample_data: request.data.iter().take(MAX_SAMPLE_RECORDS).cloned().collect(),
            }));
        }

        let valid = outcome.valid;
        info!(table, records = valid.len(), "Validation completed");

        let report = match self
            .loader
            .load(descriptor, &valid, request.is_first_batch)
            .await
        {
            Ok(report) => report,
            Err(err) => {
                error!(table, error = %err, "Load failed, transaction rolled back");
                self.metrics.increment_storage_failures();
                return Err(err.into());
            }
        };

        if report.cleared.is_some() {
            self.session.mark_truncated(table).await;
        }
        self.metrics.record_load(report.inserted);

        let elapsed = start.elapsed();
        let summary = SyncSummary {
            success: true,
            message: format!("Successfully synced {} records to {table}", valid.len()),
            table: table.to_string(),
            records_processed: request.data.len(),
            records_deleted: report.cleared,
            records_inserted: report.inserted,
            validation_errors: 0,
            processing_time_seconds: round2(elapsed.as_secs_f64()),
            records_per_second: throughput(valid.len(), elapsed),
            is_first_batch: request.is_first_batch,
            is_last_batch: request.is_last_batch,
        };

        info!(
            table,
            inserted = summary.records_inserted,
            seconds = summary.processing_time_seconds,
            records_per_second = summary.records_per_second,
            "Sync completed"
        );
        if request.is_last_batch {
            info!(table, "Last batch of the session received");
        }

        Ok(summary)
    }

    /// An empty first batch clears the table; an empty later batch does nothing.
    async fn sync_empty(
        &self,
        descriptor: &'static TableDescriptor,
        request: &SyncRequest,
        start: Instant,
    ) -> Result<SyncSummary, SyncError> {
        let table = descriptor.name;

        let (cleared, message) = if request.is_first_batch {
            let outcome = self.loader.clear(descriptor).await.inspect_err(|err| {
                error!(table, error = %err, "Clear failed, transaction rolled back");
                self.metrics.increment_storage_failures();
            })?;
            self.session.mark_truncated(table).await;
            (Some(outcome), format!("Successfully cleared {table}"))
        } else {
            (None, format!("No data to process for {table}"))
        };

        Ok(SyncSummary {
            success: true,
            message,
            table: table.to_string(),
            records_processed: 0,
            records_deleted: cleared,
            records_inserted: 0,
            validation_errors: 0,
            processing_time_seconds: round2(start.elapsed().as_secs_f64()),
            records_per_second: 0.0,
            is_first_batch: request.is_first_batch,
            is_last_batch: request.is_last_batch,
        })
    }

    pub async fn status(&self) -> Result<StatusReport, SyncError> {
        let mut tables = BTreeMap::new();
        let mut total_records = 0;

        for descriptor in self.registry.iter() {
            let record_count = self.adapter.count_rows(descriptor.name).await?;
            total_records += record_count;
            tables.insert(
                descriptor.name,
                TableStatus {
                    record_count,
                    model: descriptor.model,
                },
            );
        }

        Ok(StatusReport {
            success: true,
            tables,
            total_records,
            session: SessionStatus {
                truncated_tables: self.session.truncated_tables().await,
            },
            metrics: self.metrics.snapshot(),
        })
    }

    pub async fn table_info(&self, table: &str) -> Result<TableInfo, SyncError> {
        let descriptor = self.resolve(table)?;
        let record_count = self.adapter.count_rows(descriptor.name).await?;

        let fields = descriptor
            .fields
            .iter()
            .map(|spec| FieldInfo {
                spec: spec.clone(),
                required: descriptor.is_required(spec.name),
            })
            .collect();

        Ok(TableInfo {
            success: true,
            table_name: descriptor.name,
            model_name: descriptor.model,
            record_count,
            fields,
            required_fields: descriptor.required.clone(),
        })
    }

    /// Empties one table outside of any sync session.
    pub async fn clear_table(&self, table: &str) -> Result<ClearOutcome, SyncError> {
        let descriptor = self.resolve(table)?;
        let outcome = self.loader.clear(descriptor).await?;
        info!(table = descriptor.name, "Cleared table on request");
        Ok(outcome)
    }

    pub async fn reset_session(&self) -> usize {
        self.session.reset().await
    }
}
