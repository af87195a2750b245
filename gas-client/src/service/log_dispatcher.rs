use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use shared::errors::{GasError, Result};
use shared::LogRecord;
use tracing::debug;

use crate::marshaller;
use crate::service::policy::{FailurePolicy, Settled};
use crate::transport::{Transport, WireFields};

const SHEET_NAME_FIELD: &str = "sheetName";
const KEYS_FIELD: &str = "keys";
const RESERVED_FIELDS: [&str; 4] = [SHEET_NAME_FIELD, KEYS_FIELD, "authToken", "sheetId"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutcome {
    Delivered,
    /// The transport failed; the row is lost.
    Dropped { reason: String },
    /// Nothing was sent because no record was given.
    Skipped,
}

impl LogOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, LogOutcome::Delivered)
    }
}

/// Fire-and-forget log submission.
///
/// Bad input is rejected before any I/O. Once the row is on its way, a
/// transport failure is reported and returned as [`LogOutcome::Dropped`],
/// never as an error.
pub struct LogDispatcher<T> {
    transport: Arc<T>,
}

impl<T: Transport> LogDispatcher<T> {
    pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::ContainAndReport;

    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    #[tracing::instrument(skip(self, record), fields(record_type = std::any::type_name::<R>()))]
    pub async fn send_log<R>(&self, record: Option<&R>, sheet_name: Option<&str>) -> Result<LogOutcome>
    where
        R: Serialize + ?Sized,
    {
        let record = record.ok_or_else(|| {
            GasError::Validation("can not send log because record is null".to_string())
        })?;
        let sheet_name = require_sheet_name(sheet_name)?;

        let fields = marshaller::to_field_map(record)?;

        self.submit(&fields, sheet_name).await
    }

    #[tracing::instrument(skip(self, fields))]
    pub async fn send_fields(&self, fields: Option<LogRecord>, sheet_name: Option<&str>) -> Result<LogOutcome> {
        let fields = fields.filter(|f| !f.is_empty()).ok_or_else(|| {
            GasError::Validation("can not send log because fields are null or empty".to_string())
        })?;
        let sheet_name = require_sheet_name(sheet_name)?;

        self.submit(&fields, sheet_name).await
    }

    async fn submit(&self, fields: &LogRecord, sheet_name: &str) -> Result<LogOutcome> {
        let form = build_form(fields, sheet_name)?;

        debug!(sheet = sheet_name, payload = %describe(fields), "Sending log");

        let start = Instant::now();
        let result = self.transport.post_form(&form).await;
        shared::record_timing("gas_client.log.latency", start.elapsed().as_secs_f64());

        match Self::FAILURE_POLICY.settle("send_log", result)? {
            Settled::Completed(()) => {
                shared::record_counter("gas_client.log.delivered", 1);
                debug!(sheet = sheet_name, fields = fields.len(), "Log delivered");
                Ok(LogOutcome::Delivered)
            }
            Settled::Contained(err) => {
                shared::record_counter("gas_client.log.dropped", 1);
                Ok(LogOutcome::Dropped {
                    reason: err.to_string(),
                })
            }
        }
    }
}

fn require_sheet_name(sheet_name: Option<&str>) -> Result<&str> {
    sheet_name.ok_or_else(|| {
        GasError::Validation("can not send log because sheetName is null".to_string())
    })
}

/// Builds the POST form: `sheetName`, `keys`, then one entry per field in
/// record order.
pub fn build_form(fields: &LogRecord, sheet_name: &str) -> Result<WireFields> {
    for name in fields.keys() {
        validate_field_name(name)?;
    }

    let mut form = Vec::with_capacity(fields.len() + 2);
    form.push((SHEET_NAME_FIELD.to_string(), sheet_name.to_string()));
    form.push((KEYS_FIELD.to_string(), fields.keys().collect::<Vec<_>>().join(",")));
    form.extend(
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_wire_string())),
    );

    Ok(form)
}

fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(GasError::Validation("field name must not be empty".to_string()));
    }
    if name.contains(',') {
        return Err(GasError::Validation(format!(
            "field name {:?} must not contain ','",
            name
        )));
    }
    if RESERVED_FIELDS.contains(&name) {
        return Err(GasError::Validation(format!(
            "field name {:?} is reserved",
            name
        )));
    }
    Ok(())
}

fn describe(fields: &LogRecord) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("[{}] {}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
