use axum::{body::Bytes, extract::State, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::domain::auction::{AuctionSnapshot, AuctionState, Player, Team};
use crate::domain::repositories::PlayerRecord;

/// Team supplied in a start request
#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    /// Generated from the list position when omitted
    pub id: Option<Uuid>,
    pub name: String,
    pub purse: Decimal,
    #[serde(default)]
    pub autonomous: bool,
}

/// Request body for starting an auction; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct StartAuctionRequest {
    pub teams: Option<Vec<TeamRequest>>,
    pub players: Option<Vec<PlayerRecord>>,
}

/// Request body for placing a bid
#[derive(Debug, Deserialize)]
pub struct BidRequest {
    pub team_id: Uuid,
    pub amount: Decimal,
}

/// Request body for passing on the current lot
#[derive(Debug, Deserialize)]
pub struct PassRequest {
    pub team_id: Uuid,
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// Start the auction with supplied or generated teams and players
///
/// POST /auction/start
pub async fn start_auction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuctionSnapshot>, ApiError> {
    let request: StartAuctionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        StartAuctionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?
    };

    // Registry must not change under a running auction.
    let _starting = state.start_lock.lock().await;
    if state.auction.snapshot().await.state != AuctionState::NotStarted {
        return Err(ApiError::conflict("Auction already started"));
    }

    let entries = match request.teams {
        Some(teams) => supplied_teams(teams)?,
        None => generated_teams(&state.config)?,
    };
    let players = match request.players {
        Some(records) => records
            .into_iter()
            .map(PlayerRecord::into_player)
            .collect::<Result<Vec<Player>, _>>()?,
        None => state.roster.load_players().await?,
    };

    state.registry.clear();
    let mut teams = Vec::with_capacity(entries.len());
    for (team, autonomous) in entries {
        if autonomous {
            state.registry.register_autonomous(team.id());
        } else {
            state.registry.register_human(team.id());
        }
        teams.push(team);
    }

    tracing::info!(
        teams = teams.len(),
        autonomous = state.registry.autonomous_team_ids().len(),
        players = players.len(),
        "starting auction"
    );
    state.auction.start(teams, players).await?;

    Ok(Json(state.auction.snapshot().await))
}

/// POST /auction/bid
pub async fn place_bid(
    State(state): State<AppState>,
    Json(req): Json<BidRequest>,
) -> Result<Json<AuctionSnapshot>, ApiError> {
    state.auction.place_bid(req.team_id, req.amount).await?;

    Ok(Json(state.auction.snapshot().await))
}

/// POST /auction/pass
pub async fn pass(
    State(state): State<AppState>,
    Json(req): Json<PassRequest>,
) -> Result<Json<AuctionSnapshot>, ApiError> {
    state.auction.pass(req.team_id).await?;

    Ok(Json(state.auction.snapshot().await))
}

/// POST /auction/next
pub async fn nominate_next(
    State(state): State<AppState>,
) -> Result<Json<AuctionSnapshot>, ApiError> {
    state.auction.nominate_next().await?;

    Ok(Json(state.auction.snapshot().await))
}

/// POST /auction/finalize
pub async fn finalize_sale(
    State(state): State<AppState>,
) -> Result<Json<AuctionSnapshot>, ApiError> {
    state.auction.finalize_sale().await?;

    Ok(Json(state.auction.snapshot().await))
}

/// GET /auction/state
pub async fn get_state(State(state): State<AppState>) -> Json<AuctionSnapshot> {
    Json(state.auction.snapshot().await)
}

fn supplied_teams(teams: Vec<TeamRequest>) -> Result<Vec<(Team, bool)>, ApiError> {
    teams
        .into_iter()
        .enumerate()
        .map(|(index, req)| -> Result<(Team, bool), ApiError> {
            let id = req.id.unwrap_or_else(|| generated_team_id(index));
            Ok((Team::new(id, req.name, req.purse)?, req.autonomous))
        })
        .collect()
}

/// `Team 1..=N`; the first `human_teams` are human-controlled
fn generated_teams(config: &AppConfig) -> Result<Vec<(Team, bool)>, ApiError> {
    (0..config.team_count)
        .map(|index| -> Result<(Team, bool), ApiError> {
            let team = Team::new(
                generated_team_id(index),
                format!("Team {}", index + 1),
                config.initial_purse,
            )?;
            Ok((team, index >= config.human_teams))
        })
        .collect()
}

fn generated_team_id(index: usize) -> Uuid {
    Uuid::from_u128(index as u128 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_teams_are_deterministic_and_human_first() {
        let config = AppConfig {
            team_count: 3,
            human_teams: 1,
            ..AppConfig::default()
        };

        let teams = generated_teams(&config).unwrap();

        assert_eq!(teams.len(), 3);
        assert_eq!(teams[0].0.id(), Uuid::from_u128(1));
        assert_eq!(teams[2].0.name(), "Team 3");
        assert_eq!(teams[1].0.purse_remaining(), Decimal::from(1000));
        let autonomy: Vec<bool> = teams.iter().map(|(_, autonomous)| *autonomous).collect();
        assert_eq!(autonomy, vec![false, true, true]);
    }

    #[test]
    fn supplied_teams_keep_explicit_ids() {
        let explicit = Uuid::new_v4();
        let teams = supplied_teams(vec![
            TeamRequest {
                id: Some(explicit),
                name: "Chargers".to_string(),
                purse: Decimal::from(500),
                autonomous: false,
            },
            TeamRequest {
                id: None,
                name: "Bots".to_string(),
                purse: Decimal::from(500),
                autonomous: true,
            },
        ])
        .unwrap();

        assert_eq!(teams[0].0.id(), explicit);
        assert_eq!(teams[1].0.id(), Uuid::from_u128(2));
        assert!(teams[1].1);
    }

    #[test]
    fn supplied_team_with_negative_purse_is_rejected() {
        let result = supplied_teams(vec![TeamRequest {
            id: None,
            name: "Broke".to_string(),
            purse: Decimal::from(-1),
            autonomous: false,
        }]);

        assert_eq!(result.unwrap_err().status, axum::http::StatusCode::BAD_REQUEST);
    }
}
