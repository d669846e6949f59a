use std::process;

fn main() {
    if let Err(e) = claude_history_image_cleaner::cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
