use actix_web::{web, Scope};
use chrono::{DateTime, Utc};
use numscan_core::{Number, ScanReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub mod numbers;
pub mod scanner;

pub fn create_api_router() -> Scope {
    web::scope("/api")
        .service(number_routes())
        .service(scanner_routes())
}

fn number_routes() -> Scope {
    web::scope("/numbers")
        .configure(numbers::configure_number_routes)
}

fn scanner_routes() -> Scope {
    web::scope("/scanners")
        .configure(scanner::configure_scanner_routes)
}

#[derive(Serialize, Deserialize)]
pub struct NumberRequest {
    pub number: String,
}

/// 扫描结果响应
#[derive(Serialize)]
pub struct ScanResponse {
    pub scan_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub number: Number,
    pub results: HashMap<String, Value>,
    pub errors: HashMap<String, String>,
    pub skipped: Vec<String>,
}

impl ScanResponse {
    pub fn new(number: Number, report: ScanReport) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            scanned_at: Utc::now(),
            number,
            results: report.results,
            errors: report
                .errors
                .into_iter()
                .map(|(id, err)| (id, err.to_string()))
                .collect(),
            skipped: report.skipped,
        }
    }
}
