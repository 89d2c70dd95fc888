use crate::feed::DEFAULT_PROXY_TEMPLATE;
use crate::ui_core::ViewportClass;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Viewport selection: a fixed class, or derived from `--width`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportChoice {
    Fixed(ViewportClass),
    Auto,
}

impl std::str::FromStr for ViewportChoice {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(ViewportChoice::Auto)
        } else {
            s.parse().map(ViewportChoice::Fixed)
        }
    }
}

/// bentogrid - link-in-bio bento grid renderer
///
/// Renders a profile dataset into a responsive block grid.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "bentogrid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Link-in-bio bento grid renderer", long_about = None)]
pub struct CliArgs {
    /// Dataset path (.json or .toml)
    #[arg(short, long, env = "BENTO_DATA")]
    pub data: Option<PathBuf>,

    /// Viewport class: desktop, narrow, or auto (from --width)
    #[arg(long, env = "BENTO_VIEWPORT", value_parser = clap::value_parser!(ViewportChoice))]
    pub viewport: Option<ViewportChoice>,

    /// Viewport width in px, used when --viewport=auto (200-10000)
    #[arg(long, env = "BENTO_WIDTH")]
    pub width: Option<u32>,

    /// Feed proxy template; {url} is replaced by the encoded feed URL
    #[arg(long, env = "BENTO_FEED_PROXY")]
    pub feed_proxy: Option<String>,

    /// Feed request timeout in milliseconds (1000-60000)
    #[arg(long, env = "BENTO_FEED_TIMEOUT_MS")]
    pub feed_timeout_ms: Option<u64>,

    /// Skip feed enrichment
    #[arg(long)]
    pub no_enrich: bool,

    /// Emit tilt transforms and `data-tilt` hooks (needs a script to drive them)
    #[arg(long)]
    pub tilt: bool,

    /// Write the page here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print the JSON snapshot instead of HTML
    #[arg(long)]
    pub snapshot: bool,

    /// Proxy server port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Log filter (env_logger syntax)
    #[arg(long, env = "RUST_LOG")]
    pub log_level: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub data_path: PathBuf,
    pub viewport: ViewportClass,
    pub width: u32,
    pub feed_proxy: String,
    pub feed_timeout_ms: u64,
    pub enrich: bool,
    pub tilt: bool,
    pub out: Option<PathBuf>,
    pub snapshot: bool,
    pub port: u16,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("bento.json"),
            viewport: ViewportClass::Desktop,
            width: 1280,
            feed_proxy: DEFAULT_PROXY_TEMPLATE.to_string(),
            feed_timeout_ms: 8000,
            enrich: true,
            tilt: crate::flags::PageFlags::default().tilt,
            out: None,
            snapshot: false,
            port: 3040,
            log_level: "info".to_string(),
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Resolve parsed args against defaults. Env fallbacks are applied by clap.
pub fn from_args(args: CliArgs) -> Result<Config> {
    let defaults = Config::default();

    let width = validate_in_range(args.width.unwrap_or(defaults.width), 200, 10_000, "BENTO_WIDTH")?;

    let viewport = match args.viewport.unwrap_or(ViewportChoice::Fixed(defaults.viewport)) {
        ViewportChoice::Fixed(class) => class,
        ViewportChoice::Auto => ViewportClass::from_width(width),
    };

    let feed_proxy = args.feed_proxy.unwrap_or(defaults.feed_proxy);
    validate_url(&feed_proxy, "BENTO_FEED_PROXY")?;

    let feed_timeout_ms = validate_in_range(
        args.feed_timeout_ms.unwrap_or(defaults.feed_timeout_ms),
        1000,
        60000,
        "BENTO_FEED_TIMEOUT_MS",
    )?;

    let port = args.port.unwrap_or(defaults.port);
    if port == 0 {
        return Err(anyhow!("PORT must be non-zero"));
    }

    Ok(Config {
        data_path: args.data.unwrap_or(defaults.data_path),
        viewport,
        width,
        feed_proxy,
        feed_timeout_ms,
        enrich: !(args.no_enrich || env_flag("BENTO_NO_ENRICH")),
        tilt: args.tilt || defaults.tilt,
        out: args.out,
        snapshot: args.snapshot,
        port,
        log_level: args.log_level.unwrap_or(defaults.log_level),
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    pub fn flags(&self) -> crate::flags::PageFlags {
        crate::flags::PageFlags {
            tilt: self.tilt,
            enrich_feeds: self.enrich,
            analytics: false,
        }
    }

    /// Print current configuration (useful for debugging)
    pub fn print_summary(&self) {
        eprintln!("bentogrid configuration:");
        eprintln!("  Data: {}", self.data_path.display());
        eprintln!("  Viewport: {} ({}px)", self.viewport, self.width);
        if self.enrich {
            eprintln!("  Feed proxy: {}", self.feed_proxy);
            eprintln!("  Feed timeout: {}ms", self.feed_timeout_ms);
        } else {
            eprintln!("  Feed enrichment: off");
        }
        eprintln!("  Tilt: {}", if self.tilt { "on" } else { "off" });
    }
}
