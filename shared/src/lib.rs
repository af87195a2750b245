pub mod config;
pub mod errors;
pub mod telemetry;
pub mod types;

pub use config::{EnvSettings, Settings, SettingsProvider};
pub use errors::{GasError, Result, TransportError};
pub use telemetry::{init_tracing, record_counter, record_timing};
pub use types::{FieldValue, LogRecord, RankingEntry, RankingResponse, ScoreRankResponse};

pub use num_bigint::BigUint;
