//! Loading and validating the read-only profile/block dataset.

use crate::types::{BlockKind, Dataset};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

pub fn parse(text: &str, format: Format) -> Result<Dataset> {
    let dataset: Dataset = match format {
        Format::Json => serde_json::from_str(text).context("dataset json")?,
        Format::Toml => toml::from_str(text).context("dataset toml")?,
    };
    validate(&dataset)?;
    Ok(dataset)
}

/// Read and validate a dataset file; format follows the extension.
pub fn load(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let dataset = parse(&text, Format::from_path(path)).with_context(|| format!("loading {}", path.display()))?;
    log::info!(
        "[session] loaded {} blocks for {}",
        dataset.blocks.len(),
        dataset.profile.name
    );
    Ok(dataset)
}

/// Hard errors: empty or duplicate ids, zero spans. Social blocks missing
/// platform or handle only warn; they render with the fallback descriptor.
pub fn validate(dataset: &Dataset) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, block) in dataset.blocks.iter().enumerate() {
        if block.id.is_empty() {
            bail!("block #{index} has an empty id");
        }
        if !seen.insert(block.id.as_str()) {
            return Err(anyhow!("duplicate block id '{}'", block.id));
        }
        if block.col_span == 0 || block.row_span == 0 {
            bail!(
                "block '{}' has span {}x{}; spans must be at least 1",
                block.id,
                block.col_span,
                block.row_span
            );
        }
        if matches!(block.kind, BlockKind::Social | BlockKind::SocialIcon)
            && (block.social_platform().is_none() || block.social_handle().is_none())
            && block.channel_id().is_none()
        {
            log::warn!("[session] block '{}' has no platform/handle pair", block.id);
        }
    }
    Ok(())
}
