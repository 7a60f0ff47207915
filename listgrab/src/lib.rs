pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_site, parse_field_list, resolve_output_path};

// Re-export run functionality from listgrab-core
pub use listgrab_core::export::ExportFormat;
pub use listgrab_core::run::{ScrapeJob, execute_scrape, generate_run_summary};
