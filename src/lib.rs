//! SCM Analytics Library
//!
//! Supply-chain analytics over caller-supplied records: demand forecasting,
//! ABC classification, economic order quantities, supplier risk tiers,
//! ad-hoc file analysis, dashboard figures, report tables and an order
//! simulator. The crate holds no data store; every operation receives the
//! records it needs.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod dataset;
pub mod errors;
pub mod ml;
pub mod models;
pub mod reports;
pub mod services;

pub use config::{init_tracing, load_config, AnalyticsConfig, AppConfigError};
pub use errors::{ErrorResponse, ServiceError};
pub use models::{Order, OrderStatus, Product, Supplier};
pub use services::abc_analysis::{abc_analysis, AbcClass, AbcRecord};
pub use services::analytics::{dashboard_stats, AnalyticsService, DashboardStats};
pub use services::eoq::{eoq_analysis, EoqPolicy, EoqRecord, StockStatus};
pub use services::file_analysis::{analyze_file, FileAnalysisOutcome, FileAnalysisResult};
pub use services::forecasting::{forecast_demand, ForecastPoint, ForecastResult};
pub use services::reports::{inventory_report, orders_report};
pub use services::simulation::{simulate_order, SimulatedOrder};
pub use services::suppliers::{classify_suppliers, SupplierClassification, SupplierTier};
