//! numscan core
//!
//! Fan-out dispatcher that runs every registered scanner against one phone
//! number concurrently and aggregates per-scanner results and failures.

pub mod config;
pub mod filter;
pub mod number;
pub mod scanner;

// 重新导出常用类型
pub use config::{NumverifyConfig, ScanConfig};
pub use filter::{AllowListFilter, Either, Filter, NoFilter, StaticFilter};
pub use number::Number;
pub use scanner::manager::ScannerManager;
pub use scanner::report::ScanReport;
pub use scanner::{default_scanners, ScanOutcome, Scanner, ScannerError};

pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CoreError {
        #[error("Invalid number: {0}")]
        InvalidNumber(String),
    }

    pub type Result<T> = std::result::Result<T, CoreError>;
}
