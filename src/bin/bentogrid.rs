// Native binary for bentogrid - render a dataset to a static page

use anyhow::{Context, Result};
use std::io::Write;

use bentogrid::{
    config::load,
    dataset,
    debug,
    feed::FeedService,
    PageSession, PlatformRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    #[cfg(feature = "native")]
    {
        let _ = dotenvy::dotenv();
    }

    let cfg = load().context("Failed to load configuration")?;

    env_logger::Builder::new()
        .parse_filters(&cfg.log_level)
        .target(env_logger::Target::Stderr)
        .init();
    debug::init_once();

    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let data = dataset::load(&cfg.data_path)?;
    let mut session = PageSession::new(data, PlatformRegistry::builtin(), cfg.flags(), cfg.viewport);

    if cfg.enrich {
        let service = FeedService::http(cfg.feed_timeout_ms, cfg.feed_proxy.clone());
        session.enrich_all(&service).await;
    } else {
        session.start();
    }

    let output = if cfg.snapshot {
        serde_json::to_string_pretty(&session.snapshot()).context("serializing snapshot")?
    } else {
        session.render_page()
    };

    match &cfg.out {
        Some(path) => {
            tokio::fs::write(path, output.as_bytes())
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("[render] wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
