// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{build_config, load_urls_from_file, parse_url_line, run_extraction};
