pub mod log_dispatcher;
pub mod policy;
pub mod ranking_service;

pub use log_dispatcher::{LogDispatcher, LogOutcome};
pub use policy::{FailurePolicy, Settled};
pub use ranking_service::RankingQueryService;
