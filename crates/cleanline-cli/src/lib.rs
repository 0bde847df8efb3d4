/*
[INPUT]:  Public API exports for the cleanline CLI crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod backend;
pub mod config;
pub mod visit;

// Re-export main types for convenience
pub use backend::HttpResetBackend;
pub use config::CleanlineConfig;
pub use visit::VisitTracker;
