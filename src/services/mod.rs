// Core analytics
pub mod abc_analysis;
pub mod eoq;
pub mod forecasting;
pub mod suppliers;

// Uploaded files
pub mod file_analysis;

// Dashboard, exports and simulation
pub mod analytics;
pub mod reports;
pub mod simulation;
