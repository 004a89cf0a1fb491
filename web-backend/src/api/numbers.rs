use actix_web::{web, HttpResponse};
use numscan_core::{Either, Number, StaticFilter};
use serde::Deserialize;
use std::sync::Arc;

use super::{NumberRequest, ScanResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ScanQuery {
    /// Comma separated scanner identifiers to skip for this request
    #[serde(default)]
    pub disable: Option<String>,
}

pub fn configure_number_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("", web::post().to(validate_number))
        .route("/{number}/scan", web::get().to(scan_number));
}

/// 校验并规范化号码
pub async fn validate_number(body: web::Json<NumberRequest>) -> Result<HttpResponse, ApiError> {
    let number = Number::parse(&body.number)?;
    Ok(HttpResponse::Ok().json(number))
}

/// 使用所有扫描器扫描号码
pub async fn scan_number(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ScanQuery>,
) -> Result<HttpResponse, ApiError> {
    let number = Number::parse(&path.into_inner())?;

    let requested = StaticFilter::new().with_rule(
        query
            .disable
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim),
    );
    let filter = Either(Arc::clone(state.manager.filter()), requested);

    tracing::info!(number = %number, "Scanning number");
    let report = state
        .manager
        .scan_with_filter(Arc::new(number.clone()), &filter)
        .await;
    tracing::info!(
        number = %number,
        results = report.results.len(),
        errors = report.errors.len(),
        "Scan finished"
    );

    Ok(HttpResponse::Ok().json(ScanResponse::new(number, report)))
}
