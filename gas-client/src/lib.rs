pub mod facade;
pub mod marshaller;
pub mod service;
pub mod transport;

pub use facade::GasServices;
pub use marshaller::to_field_map;
pub use service::{FailurePolicy, LogDispatcher, LogOutcome, RankingQueryService, Settled};
pub use transport::{GasHttpClient, Transport, WireFields};

pub use shared::{
    BigUint, EnvSettings, FieldValue, GasError, LogRecord, RankingEntry, RankingResponse,
    Result, ScoreRankResponse, Settings, SettingsProvider, TransportError,
};
