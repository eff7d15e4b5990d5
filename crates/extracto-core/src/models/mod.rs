//! Data models for the extraction pipeline.

pub mod config;
pub mod statement;

pub use config::{ExtractoConfig, ParserConfig, ProfilerConfig, ValidationConfig};
pub use statement::{
    CategoryHint, DocumentProfile, DocumentType, ExtractionResult, Severity, StatementMeta,
    Transaction, TypeHint, WarningCode, WarningItem,
};
