use actix_web::{web, HttpResponse};
use numscan_core::{AllowListFilter, Number};
use serde::Serialize;
use std::sync::Arc;

use super::{NumberRequest, ScanResponse};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ScannerInfo {
    pub name: String,
}

pub fn configure_scanner_routes(cfg: &mut web::ServiceConfig) {
    cfg
        .route("", web::get().to(list_scanners))
        .route("/{scanner}/run", web::post().to(run_scanner));
}

pub async fn list_scanners(state: web::Data<AppState>) -> HttpResponse {
    let scanners: Vec<ScannerInfo> = state
        .manager
        .identifiers()
        .into_iter()
        .map(|name| ScannerInfo { name })
        .collect();

    HttpResponse::Ok().json(scanners)
}

/// 单独运行一个扫描器（忽略配置中的禁用列表）
pub async fn run_scanner(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NumberRequest>,
) -> Result<HttpResponse, ApiError> {
    let scanner = path.into_inner();
    if !state.manager.contains(&scanner) {
        return Err(ApiError::UnknownScanner(scanner));
    }
    let number = Number::parse(&body.number)?;

    let filter = AllowListFilter::new([scanner.as_str()]);
    let mut report = state
        .manager
        .scan_with_filter(Arc::new(number.clone()), &filter)
        .await;
    report.skipped.clear();

    Ok(HttpResponse::Ok().json(ScanResponse::new(number, report)))
}
