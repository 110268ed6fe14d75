pub mod audit;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod report;
pub mod service;
pub mod source;

// Re-export commonly used types for easier testing
pub use audit::AuditLogClient;
pub use config::{ClientConfig, CompanyProfile, Industry};
pub use error::{ClientError, ValidationError};
pub use model::{AiInsights, AnalysisRequest, AnalysisResult, AuditLogEntry, SourceDocument};
pub use orchestrator::{RequestOrchestrator, WorkflowState};
pub use report::ReportExporter;
pub use service::{AnalysisService, HttpAnalysisService};
pub use source::{SourceAdapter, SourceSelection};
