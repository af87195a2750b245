use std::env;
use std::num::NonZeroU32;

use gas_client::{BigUint, GasError, GasServices, LogRecord};
use serde::Serialize;
use shared::errors::Result;
use tracing::{info, warn};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PlayLog {
    player_name: String,
    score: i64,
    is_clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    shared::init_tracing("gas-client")
        .expect("Failed to initialize tracing");

    let services = GasServices::global().await?;

    let score: BigUint = env::var("SAMPLE_SCORE")
        .unwrap_or_else(|_| "12345678901234567890".to_string())
        .parse()
        .map_err(|e| GasError::Configuration(format!("Invalid SAMPLE_SCORE: {}", e)))?;

    let play_log = PlayLog {
        player_name: "Hero_Alpha".to_string(),
        score: 100,
        is_clear: true,
    };
    let outcome = services.send_log(Some(&play_log), Some("Stage1Clear")).await?;
    info!(?outcome, "Play log sent");

    let event = LogRecord::new()
        .with("Event", "GameStart")
        .with("SceneName", "Level_01");
    let outcome = services.send_fields(Some(event), Some("EventLog")).await?;
    info!(?outcome, "Event log sent");

    let top_count = NonZeroU32::new(5).expect("5 is non-zero");
    match services.get_top_n_ranking(top_count, Some("RankingSheet")).await {
        Ok(response) => {
            for entry in response.iter() {
                info!(name = %entry.name, score = %entry.score, "Rank entry");
            }
        }
        Err(e) => warn!(error = %e, "Failed to fetch top ranking"),
    }

    match services.get_score_ranking(&score, Some("RankingSheet")).await {
        Ok(response) if response.is_ranked() => {
            info!(score = %response.score, rank = response.rank, "Score is ranked");
        }
        Ok(response) => info!(score = %response.score, "Score is not ranked"),
        Err(e) => warn!(error = %e, "Failed to fetch score rank"),
    }

    Ok(())
}
