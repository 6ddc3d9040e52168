//! Receipt API routes
//!
//! JSON listings and aggregates plus PDF/XLSX/CSV report downloads, all
//! filtered by a compact `YYMMDD` date range and an optional payer substring.

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::reports::{self, branding, RenderOptions};
use crate::services::recibo_service::{
    self, CuentaTotalesDto, ReciboDto, ReciboServiceError, TotalesDto,
};
use crate::AppState;

use super::{attachment_response, ApiError};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Query parameters shared by the range endpoints
#[derive(Debug, Deserialize)]
pub struct RangoQuery {
    /// Range start, compact `YYMMDD` (inclusive)
    pub desde: String,
    /// Range end, compact `YYMMDD` (inclusive)
    pub hasta: String,
    /// Optional case-insensitive payer-name substring
    pub contribuyente: Option<String>,
}

fn map_service_error(err: ReciboServiceError) -> ApiError {
    use crate::repos::recibo_repo::ReciboQueryError;
    match err {
        ReciboServiceError::Repo(ReciboQueryError::InvalidDateRange { .. }) => {
            ApiError::bad_request(err.to_string())
        }
        ReciboServiceError::Repo(ReciboQueryError::Database(_)) => {
            ApiError::internal(err.to_string())
        }
    }
}

/// Handler for GET /api/recibos
pub async fn list_recibos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Json<Vec<ReciboDto>>, ApiError> {
    let recibos = recibo_service::list_by_range(
        &state.pool,
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        state.config.max_list_rows,
    )
    .await
    .map_err(map_service_error)?;

    if recibos.is_empty() {
        return Err(ApiError::not_found("No se encontraron recibos"));
    }
    Ok(Json(recibos))
}

/// Handler for GET /api/recibos/hoy
pub async fn list_recibos_hoy(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReciboDto>>, ApiError> {
    let recibos = recibo_service::list_hoy(&state.pool, state.config.max_list_rows)
        .await
        .map_err(map_service_error)?;

    if recibos.is_empty() {
        return Err(ApiError::not_found("No se encontraron recibos"));
    }
    Ok(Json(recibos))
}

/// Handler for GET /api/recibos/totales
pub async fn get_totales(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Json<TotalesDto>, ApiError> {
    let totales = recibo_service::totales(
        &state.pool,
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
    )
    .await
    .map_err(map_service_error)?;

    Ok(Json(totales))
}

/// Handler for GET /api/recibos/por-cuenta
pub async fn get_totales_por_cuenta(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Json<Vec<CuentaTotalesDto>>, ApiError> {
    let cuentas = recibo_service::totales_por_cuenta(&state.pool, &params.desde, &params.hasta)
        .await
        .map_err(map_service_error)?;

    if cuentas.is_empty() {
        return Err(ApiError::not_found("No se encontraron movimientos"));
    }
    Ok(Json(cuentas))
}

async fn fetch_report_rows(
    state: &AppState,
    params: &RangoQuery,
) -> Result<Vec<ReciboDto>, ApiError> {
    recibo_service::list_by_range(
        &state.pool,
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        state.config.max_list_rows,
    )
    .await
    .map_err(map_service_error)
}

/// Handler for GET /api/recibos/reporte.pdf
///
/// An empty result still renders a complete "no results" document.
pub async fn reporte_pdf(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Response, ApiError> {
    let recibos = fetch_report_rows(&state, &params).await?;
    let table = recibo_service::build_report(
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        &recibos,
    );

    let logo = branding::fetch_logo(
        &state.config.logo_url,
        Duration::from_secs(state.config.logo_timeout_secs),
    )
    .await;

    let options = RenderOptions {
        logo,
        ..RenderOptions::default()
    };
    let bytes = reports::pdf::render_pdf(&table, &options)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let filename = reports::attachment_filename(
        "recibos",
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        "pdf",
    );
    Ok(attachment_response("application/pdf", &filename, bytes))
}

/// Handler for GET /api/recibos/reporte.xlsx
pub async fn reporte_xlsx(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Response, ApiError> {
    let recibos = fetch_report_rows(&state, &params).await?;
    let table = recibo_service::build_report(
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        &recibos,
    );

    let bytes =
        reports::xlsx::render_xlsx(&table).map_err(|e| ApiError::internal(e.to_string()))?;

    let filename = reports::attachment_filename(
        "recibos",
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        "xlsx",
    );
    Ok(attachment_response(XLSX_CONTENT_TYPE, &filename, bytes))
}

/// Handler for GET /api/recibos/export.csv
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Response, ApiError> {
    let recibos = fetch_report_rows(&state, &params).await?;
    let table = recibo_service::build_report(
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        &recibos,
    );

    let bytes =
        reports::csv::render_csv(&table).map_err(|e| ApiError::internal(e.to_string()))?;

    let filename = reports::attachment_filename(
        "recibos",
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        "csv",
    );
    Ok(attachment_response("text/csv; charset=utf-8", &filename, bytes))
}
