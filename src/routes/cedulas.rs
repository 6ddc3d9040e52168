//! Levy-notice API routes

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};
use std::sync::Arc;
use std::time::Duration;

use crate::reports::{self, branding, Orientation, RenderOptions};
use crate::services::cedula_service::{self, CedulaDto, CedulaServiceError};
use crate::AppState;

use super::recibos::RangoQuery;
use super::{attachment_response, ApiError};

fn map_service_error(err: CedulaServiceError) -> ApiError {
    use crate::repos::cedula_repo::CedulaQueryError;
    match err {
        CedulaServiceError::Repo(CedulaQueryError::InvalidDateRange { .. }) => {
            ApiError::bad_request(err.to_string())
        }
        CedulaServiceError::Repo(CedulaQueryError::Database(_)) => {
            ApiError::internal(err.to_string())
        }
    }
}

/// Handler for GET /api/cedulas
pub async fn list_cedulas(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Json<Vec<CedulaDto>>, ApiError> {
    let cedulas = cedula_service::list_by_range(
        &state.pool,
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        state.config.max_list_rows,
    )
    .await
    .map_err(map_service_error)?;

    if cedulas.is_empty() {
        return Err(ApiError::not_found("No se encontraron cédulas"));
    }
    Ok(Json(cedulas))
}

/// Handler for GET /api/cedulas/reporte.pdf
///
/// Landscape: the motive and address columns carry long wrapped text.
pub async fn reporte_pdf(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangoQuery>,
) -> Result<Response, ApiError> {
    let cedulas = cedula_service::list_by_range(
        &state.pool,
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        state.config.max_list_rows,
    )
    .await
    .map_err(map_service_error)?;

    let table = cedula_service::build_report(
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        &cedulas,
    );

    let logo = branding::fetch_logo(
        &state.config.logo_url,
        Duration::from_secs(state.config.logo_timeout_secs),
    )
    .await;

    let options = RenderOptions {
        orientation: Orientation::Landscape,
        logo,
        ..RenderOptions::default()
    };
    let bytes = reports::pdf::render_pdf(&table, &options)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let filename = reports::attachment_filename(
        "cedulas",
        &params.desde,
        &params.hasta,
        params.contribuyente.as_deref(),
        "pdf",
    );
    Ok(attachment_response("application/pdf", &filename, bytes))
}
