//! HTTP handler functions for the health map API.

use actix_web::{HttpResponse, web};
use health_map_dashboard::Selection;
use health_map_render::html::{self, PageControls};
use health_map_server_models::{ApiError, ApiHealth, ApiOptions, MapQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Returns the values available to each selector control.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiOptions::from(state.dashboard.options()))
}

/// `GET /api/summary`
///
/// Returns per-diagnosis statistics and a preview of the dataset.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.summary())
}

/// `GET /api/charts`
///
/// Returns every chart series computed over the full dataset.
pub async fn charts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.charts())
}

fn selection(params: &MapQueryParams) -> Result<Selection, HttpResponse> {
    Selection::parse(
        params.diagnosis.as_deref(),
        params.gender.as_deref(),
        params.metric.as_deref(),
    )
    .map_err(|e| {
        log::debug!("Rejected map request: {e}");
        HttpResponse::BadRequest().json(ApiError::new(e))
    })
}

/// `GET /api/map`
///
/// Runs the pipeline for the selection and returns the map view as JSON.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let selection = match selection(&params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    match state.dashboard.map(&selection) {
        Ok(view) => HttpResponse::Ok().json(view.as_ref()),
        Err(e) => {
            log::error!("Failed to build map for {selection:?}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e))
        }
    }
}

/// `GET /` and `GET /map`
///
/// Serves the interactive map page with its selector form.
pub async fn page(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    let selection = match selection(&params) {
        Ok(selection) => selection,
        Err(response) => return response,
    };

    let view = match state.dashboard.map(&selection) {
        Ok(view) => view,
        Err(e) => {
            log::error!("Failed to build map for {selection:?}: {e}");
            return HttpResponse::InternalServerError().json(ApiError::new(e));
        }
    };

    let controls = PageControls {
        action: "/map".to_string(),
        options: state.dashboard.options().clone(),
        diagnosis: selection.diagnosis,
        gender: selection.gender,
        metric: selection.metric,
    };

    match html::page(&view, Some(&controls)) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render map page: {e}");
            HttpResponse::InternalServerError().json(ApiError::new(e))
        }
    }
}
