use sat_modules::config::ToolConfig;
use sat_modules::module::sat::{CachedHttpSource, DatasetUrls, ResponseCache};
use sat_modules::pipeline;

use anyhow::{Context, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = ToolConfig::load()?;

    // Initialize logging
    let _logging_guard = sat_modules::logging::init_logging(
        config.resolved_log_dir(),
        "sat-modules",
        &config.log_level,
    );

    tracing::info!("sat-modules starting...");

    let module_dir = config.resolved_module_dir()?;
    tokio::fs::create_dir_all(&module_dir)
        .await
        .context(format!("Failed to create module directory: {:?}", module_dir))?;

    let cache = ResponseCache::new(config.resolved_cache_dir(), config.cache_expiry()?);
    let source = CachedHttpSource::new(cache, &config.user_agent)?;
    let urls = DatasetUrls {
        amsat: config.amsat_url.clone(),
        satnogs: config.satnogs_url.clone(),
    };

    let report = pipeline::run(&source, &urls, &module_dir, &config.qth_file).await?;

    tracing::info!(
        "Done: {} active rows, {} modules written to {}",
        report.active_rows,
        report.written.len(),
        module_dir.display()
    );

    Ok(())
}
