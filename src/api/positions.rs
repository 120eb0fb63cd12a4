//! Position views: a freshly generated table, or a caller-supplied one.

use crate::api::AppState;
use crate::domain::{AssetClass, Instrument, PositionSnapshot, PriceSource, ReferencePrice, Side};
use crate::error::AppError;
use crate::generator::generate_snapshot;
use crate::quotes::{resolve_reference_prices, static_reference_prices};
use crate::ranking::{rank, RankedRow, RankedView, RankingQuery, DEFAULT_TOP_N};
use crate::table::{load_table, load_table_or_default, NormalizedTable};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOP_ADDRESSES: usize = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    pub seed: Option<u64>,
    pub instrument: Option<String>,
    pub asset_class: Option<String>,
    pub side: Option<String>,
    pub max_distance: Option<f64>,
    pub top_n: Option<usize>,
    pub live: Option<bool>,
    /// On unparseable uploads, rank an empty table instead of failing.
    pub fallback_empty: Option<bool>,
}

impl ViewQuery {
    fn to_ranking_query(&self) -> Result<RankingQuery, AppError> {
        let side = match self.side.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(
                s.parse::<Side>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };
        let asset_class = match self.asset_class.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(
                s.parse::<AssetClass>()
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            ),
        };
        let instrument = self
            .instrument
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Instrument::new);

        Ok(RankingQuery {
            instrument,
            asset_class,
            side,
            max_distance: self.max_distance.unwrap_or(f64::INFINITY),
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRowDto {
    pub pair: Option<String>,
    pub asset_class: Option<AssetClass>,
    pub address: Option<String>,
    pub side: Option<Side>,
    pub entry: Option<f64>,
    pub liq: Option<f64>,
    pub current: Option<f64>,
    pub distance_pct: f64,
    pub leverage: Option<u32>,
    pub size: Option<f64>,
}

impl From<&RankedRow> for PositionRowDto {
    fn from(row: &RankedRow) -> Self {
        let r = &row.record;
        PositionRowDto {
            pair: r.instrument.as_ref().map(|i| i.to_string()),
            asset_class: r.effective_asset_class(),
            address: r.address.as_ref().map(|a| a.to_string()),
            side: r.side,
            entry: r.entry_price,
            liq: r.liquidation_price,
            current: r.current_price,
            distance_pct: row.distance_pct,
            leverage: r.leverage,
            size: r.size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideCountsDto {
    pub long: usize,
    pub short: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub id: Uuid,
    pub digest: String,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub reference_prices: Vec<ReferencePrice>,
    pub omitted: Vec<String>,
}

impl From<&PositionSnapshot> for SnapshotInfo {
    fn from(snapshot: &PositionSnapshot) -> Self {
        SnapshotInfo {
            id: snapshot.id,
            digest: snapshot.digest(),
            generated_at: snapshot.generated_at,
            seed: snapshot.seed,
            reference_prices: snapshot.reference_prices.clone(),
            omitted: snapshot.omitted.iter().map(|i| i.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInfo>,
    /// Rows in the input table before filtering.
    pub total: usize,
    pub positions: Vec<PositionRowDto>,
    pub top: Vec<PositionRowDto>,
    pub counts: SideCountsDto,
    pub top_addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmapped_columns: Vec<String>,
}

impl PositionsResponse {
    fn from_view(view: &RankedView, total: usize) -> Self {
        PositionsResponse {
            snapshot: None,
            total,
            positions: view.rows.iter().map(PositionRowDto::from).collect(),
            top: view.top.iter().map(PositionRowDto::from).collect(),
            counts: SideCountsDto {
                long: view.counts.long,
                short: view.counts.short,
            },
            top_addresses: view
                .top_addresses(TOP_ADDRESSES)
                .into_iter()
                .map(|a| a.to_string())
                .collect(),
            unmapped_columns: Vec::new(),
        }
    }
}

/// Generate a fresh table and rank it.
pub async fn get_positions(
    Query(params): Query<ViewQuery>,
    State(state): State<AppState>,
) -> Result<Json<PositionsResponse>, AppError> {
    let query = params.to_ranking_query()?;
    let config = &state.config;
    let seed = params.seed.unwrap_or(config.generator_seed);

    let resolved = if params.live.unwrap_or(config.live_quotes) {
        resolve_reference_prices(
            state.quotes.as_ref(),
            &config.instruments,
            config.fetch_failure_policy,
            config.quote_timeout,
        )
        .await
    } else {
        static_reference_prices(&config.instruments)
    };
    let live_count = resolved
        .prices
        .iter()
        .filter(|p| p.source == PriceSource::Live)
        .count();

    let snapshot = generate_snapshot(seed, resolved, &config.generator_params())?;
    tracing::info!(
        "Generated snapshot {} (seed={}, positions={}, live_prices={}, omitted={})",
        snapshot.id,
        seed,
        snapshot.len(),
        live_count,
        snapshot.omitted.len()
    );

    let table =
        NormalizedTable::from_records(snapshot.positions.iter().map(|p| p.to_record()).collect());
    let view = rank(&table, &query)?;

    let mut response = PositionsResponse::from_view(&view, table.len());
    response.snapshot = Some(SnapshotInfo::from(&snapshot));
    Ok(Json(response))
}

/// Rank an uploaded CSV or JSON table.
pub async fn rank_table(
    Query(params): Query<ViewQuery>,
    body: Bytes,
) -> Result<Json<PositionsResponse>, AppError> {
    let query = params.to_ranking_query()?;

    let table = if params.fallback_empty.unwrap_or(false) {
        load_table_or_default(&body)
    } else {
        load_table(&body)?
    };
    let view = rank(&table, &query)?;

    let mut response = PositionsResponse::from_view(&view, table.len());
    response.unmapped_columns = table.unmapped.clone();
    Ok(Json(response))
}
