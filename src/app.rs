use std::path::{Path, PathBuf};

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::application::IngestPipeline;
use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::preview::{render_preview, DisplayOptions};

/// Entry point for the `tabview` binary; returns the process exit code
pub fn run() -> i32 {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut args = std::env::args_os().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("usage: tabview <FILE> [CONFIG.toml]");
        return 2;
    };
    let config = match args.next() {
        Some(file) => ConfigService::with_file(PathBuf::from(file)),
        None => ConfigService::new(),
    };

    match execute(&path, &config) {
        Ok(preview) => {
            println!("{}", preview);
            0
        }
        Err(err) => {
            error!(error = %err, path = %path.display(), "Ingestion failed");
            1
        }
    }
}

/// Config table holding `DisplayOptions`
const DISPLAY_SECTION: &str = "display";

fn execute(path: &Path, service: &ConfigService) -> Result<String> {
    let config = service.load()?;
    let display: DisplayOptions = service.load_section(DISPLAY_SECTION)?;
    let outcome = IngestPipeline::new(config).run(path)?;
    Ok(render_preview(&outcome.table, &display))
}
