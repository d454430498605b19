pub mod browser_resolver;
pub mod content_checks;
pub mod pagination;
pub mod pdf_exporter;
pub mod snapshot;

pub use browser_resolver::BrowserResolver;
pub use content_checks::ContentChecks;
pub use pagination::PaginationService;
pub use pdf_exporter::PdfExporter;
pub use snapshot::SnapshotService;
