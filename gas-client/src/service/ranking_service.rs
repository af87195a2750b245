use std::num::NonZeroU32;
use std::sync::Arc;

use shared::errors::Result;
use shared::{BigUint, RankingResponse, ScoreRankResponse};
use tracing::{debug, warn};

use crate::service::policy::FailurePolicy;
use crate::transport::{Transport, WireFields};

/// Leaderboard queries. Transport failures are returned to the caller.
pub struct RankingQueryService<T> {
    transport: Arc<T>,
}

impl<T: Transport> RankingQueryService<T> {
    pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::Propagate;

    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_top_n(&self, n: NonZeroU32, sheet_name: &str) -> Result<RankingResponse> {
        let query = top_n_query(n, sheet_name);
        let result = self.transport.get_json::<RankingResponse>(&query).await;

        let mut response = Self::FAILURE_POLICY.settle("get_top_n", result)?.into_result()?;

        let limit = n.get() as usize;
        if response.ranking.len() > limit {
            warn!(
                requested = limit,
                received = response.ranking.len(),
                "Ranking longer than requested; truncating"
            );
            response.ranking.truncate(limit);
        }

        debug!(entries = response.ranking.len(), "Ranking received");
        Ok(response)
    }

    #[tracing::instrument(skip(self, score), fields(score = %score))]
    pub async fn get_score_rank(&self, score: &BigUint, sheet_name: &str) -> Result<ScoreRankResponse> {
        let query = score_rank_query(score, sheet_name);
        let result = self.transport.get_json::<ScoreRankResponse>(&query).await;

        let response = Self::FAILURE_POLICY.settle("get_score_rank", result)?.into_result()?;

        if response.score != *score {
            warn!(echoed = %response.score, "Score echoed by the service differs from the query");
        }

        debug!(rank = response.rank, "Score rank received");
        Ok(response)
    }
}

pub fn top_n_query(n: NonZeroU32, sheet_name: &str) -> WireFields {
    vec![
        ("sheetName".to_string(), sheet_name.to_string()),
        ("topCount".to_string(), n.to_string()),
    ]
}

/// The score goes out as its exact base-10 digits.
pub fn score_rank_query(score: &BigUint, sheet_name: &str) -> WireFields {
    vec![
        ("score".to_string(), score.to_str_radix(10)),
        ("sheetName".to_string(), sheet_name.to_string()),
    ]
}
