pub mod audit;
pub mod classify;
pub mod display;
pub mod error;
pub mod hasher;
pub mod ledger;
pub mod packer;
pub mod rename;
pub mod settings;
pub mod util;
pub mod worker_pool;

// Re-export the catalog crate so frontends need a single dependency
pub use romaudit_dat as dat;
pub use romaudit_dat::{Catalog, DatError, GameId, HashAlgorithm, NameMatch, RomId};

pub use audit::{
    ArchiveAudit, AuditOptions, AuditRun, FileMatch, PathOutcome, PathResult, SkipReason,
    audit_path, audit_paths,
};
pub use classify::{Classification, ClassifyResult, SizeDiagnostic, classify, size_diagnostic};
pub use display::{FileDetail, FileReport, Status};
pub use error::AuditError;
pub use ledger::{AuditSummary, Completion, GameReport, Ledger, Reconciled, SetOrder};
pub use settings::Settings;
