use std::num::NonZeroU32;
use std::sync::Arc;

use serde::Serialize;
use shared::errors::{GasError, Result};
use shared::{
    BigUint, EnvSettings, LogRecord, RankingResponse, ScoreRankResponse, Settings,
    SettingsProvider,
};
use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::service::{LogDispatcher, LogOutcome, RankingQueryService};
use crate::transport::{GasHttpClient, Transport};

static GLOBAL: OnceCell<GasServices> = OnceCell::const_new();

/// Entry point for application code: one transport shared by the log
/// dispatcher and the ranking service.
///
/// Build it once with [`GasServices::new`] and pass it around, or use
/// [`GasServices::global`] for a lazily created process-wide instance.
pub struct GasServices<T = GasHttpClient> {
    settings: Settings,
    logger: LogDispatcher<T>,
    ranking: RankingQueryService<T>,
}

impl GasServices<GasHttpClient> {
    pub fn new(settings: Settings) -> Result<Self> {
        let transport = GasHttpClient::new(&settings)?;
        Ok(Self::with_transport(transport, settings))
    }

    pub fn from_provider<P>(provider: &P) -> Result<Self>
    where
        P: SettingsProvider + ?Sized,
    {
        Self::new(provider.load()?)
    }

    /// The process-wide instance, configured from `GAS_*` environment variables.
    pub async fn global() -> Result<&'static Self> {
        Self::global_with(&EnvSettings).await
    }

    /// The process-wide instance, configured from `provider` on first use.
    ///
    /// Concurrent first calls wait on a single initialization; the provider
    /// is consulted once. A failed initialization is not cached. Once the
    /// instance exists, later providers are ignored.
    pub async fn global_with<P>(provider: &P) -> Result<&'static Self>
    where
        P: SettingsProvider + ?Sized,
    {
        GLOBAL
            .get_or_try_init(|| async {
                info!("Initializing GAS services");
                let services = Self::from_provider(provider)?;
                info!(settings = ?services.settings, "GAS services initialized");
                Ok::<_, GasError>(services)
            })
            .await
    }
}

impl<T: Transport> GasServices<T> {
    pub fn with_transport(transport: T, settings: Settings) -> Self {
        let transport = Arc::new(transport);

        Self {
            settings,
            logger: LogDispatcher::new(transport.clone()),
            ranking: RankingQueryService::new(transport),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Sends a typed record as one row. `None` is logged and skipped.
    pub async fn send_log<R>(&self, record: Option<&R>, sheet_name: Option<&str>) -> Result<LogOutcome>
    where
        R: Serialize + ?Sized,
    {
        if record.is_none() {
            error!("record is null, so can not send log");
            return Ok(LogOutcome::Skipped);
        }

        self.logger.send_log(record, self.resolve_sheet(sheet_name)).await
    }

    /// Sends an ordered mapping as one row. `None` is logged and skipped.
    pub async fn send_fields(&self, fields: Option<LogRecord>, sheet_name: Option<&str>) -> Result<LogOutcome> {
        if fields.is_none() {
            error!("fields are null, so can not send log");
            return Ok(LogOutcome::Skipped);
        }

        self.logger.send_fields(fields, self.resolve_sheet(sheet_name)).await
    }

    pub async fn get_top_n_ranking(&self, n: NonZeroU32, sheet_name: Option<&str>) -> Result<RankingResponse> {
        self.ranking.get_top_n(n, self.query_sheet(sheet_name)).await
    }

    pub async fn get_score_ranking(&self, score: &BigUint, sheet_name: Option<&str>) -> Result<ScoreRankResponse> {
        self.ranking.get_score_rank(score, self.query_sheet(sheet_name)).await
    }

    fn resolve_sheet<'a>(&'a self, sheet_name: Option<&'a str>) -> Option<&'a str> {
        sheet_name.or(self.settings.default_sheet.as_deref())
    }

    // Ranking queries have no null check; a missing sheet goes out empty.
    fn query_sheet<'a>(&'a self, sheet_name: Option<&'a str>) -> &'a str {
        self.resolve_sheet(sheet_name).unwrap_or_else(|| {
            warn!("No sheet name given and no default sheet configured");
            ""
        })
    }
}
