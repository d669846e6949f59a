pub mod environment;
pub mod paths;

pub use environment::{config_candidates, default_images_dir, find_claude_config};
pub use paths::{format_path_with_tilde, format_run_timestamp, project_slug, run_timestamp};
