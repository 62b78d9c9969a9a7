use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::{self, ConstituencySwing, WinMargin};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn swing_states(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ConstituencySwing>>> {
    let records = state.db.get_winner_records().await?;
    Ok(Json(analysis::swing_table(&records)))
}

#[derive(Deserialize)]
pub struct MarginFilter {
    pub parliament: Option<i64>,
}

/// Win margins for one election, closest contests first. Defaults to the
/// most recent parliament on record.
pub async fn margins(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MarginFilter>,
) -> ApiResult<Json<Vec<WinMargin>>> {
    let election = match filter.parliament {
        Some(parliament) => state
            .db
            .get_election(parliament)
            .await
            .map_err(|e| ApiError::from_lookup(e, "election"))?,
        None => {
            let mut elections = state.db.get_elections().await?;
            match elections.pop() {
                Some(latest) => latest,
                None => return Ok(Json(Vec::new())),
            }
        }
    };

    Ok(Json(analysis::win_margins(&election.results)))
}
