use crate::feed::channel_url;
use crate::social::{PlatformRegistry, CUSTOM};
use crate::types::{non_empty, BlockKind, BlockRecord};

/// Where a click on `block` points, before the navigability check.
///
/// SOCIAL with platform and handle goes through the registry, then a
/// channel id becomes the canonical channel URL, then `content` is used
/// verbatim. SOCIAL_ICON blocks only ever point at their handle.
pub fn resolve_destination(block: &BlockRecord, registry: &PlatformRegistry) -> Option<String> {
    if block.kind == BlockKind::SocialIcon {
        let platform = block.social_platform().unwrap_or(CUSTOM.key);
        return block.social_handle().map(|handle| registry.build_url(platform, handle));
    }
    if block.kind == BlockKind::Social {
        if let (Some(platform), Some(handle)) = (block.social_platform(), block.social_handle()) {
            return Some(registry.build_url(platform, handle));
        }
    }
    if let Some(channel_id) = block.channel_id() {
        return Some(channel_url(channel_id));
    }
    non_empty(&block.content).map(str::to_string)
}

/// Only explicit `http://` / `https://` destinations open anything.
pub fn is_navigable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Resolved destination, kept only when navigable.
pub fn click_target(block: &BlockRecord, registry: &PlatformRegistry) -> Option<String> {
    if block.kind == BlockKind::Spacer {
        return None;
    }
    resolve_destination(block, registry).filter(|url| is_navigable(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_via_registry() {
        let mut block = BlockRecord::new("g", BlockKind::Social);
        block.social_platform = Some("github".into());
        block.social_handle = Some("octocat".into());
        block.content = Some("https://ignored.example".into());
        block.channel_id = Some("UC1".into());
        let registry = PlatformRegistry::builtin();
        assert_eq!(
            click_target(&block, &registry).as_deref(),
            Some("https://github.com/octocat")
        );
    }

    #[test]
    fn test_channel_then_content() {
        let registry = PlatformRegistry::builtin();
        let mut block = BlockRecord::new("yt", BlockKind::Social);
        block.channel_id = Some("UC123".into());
        assert_eq!(
            resolve_destination(&block, &registry).as_deref(),
            Some("https://youtube.com/channel/UC123")
        );

        let mut link = BlockRecord::new("l", BlockKind::Link);
        link.content = Some("https://example.com/x".into());
        assert_eq!(click_target(&link, &registry).as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_non_http_is_inert() {
        let registry = PlatformRegistry::builtin();
        let mut block = BlockRecord::new("t", BlockKind::Text);
        block.content = Some("not-a-url".into());
        assert_eq!(resolve_destination(&block, &registry).as_deref(), Some("not-a-url"));
        assert_eq!(click_target(&block, &registry), None);

        block.content = Some("mailto:a@b.c".into());
        assert_eq!(click_target(&block, &registry), None);
        assert!(!is_navigable("HTTP://EXAMPLE.COM"));
    }

    #[test]
    fn test_social_icon_without_handle() {
        let registry = PlatformRegistry::builtin();
        let mut icon = BlockRecord::new("i", BlockKind::SocialIcon);
        icon.social_platform = Some("x".into());
        icon.content = Some("https://x.com/fallback".into());
        assert_eq!(resolve_destination(&icon, &registry), None);
        icon.social_handle = Some("jack".into());
        assert_eq!(click_target(&icon, &registry).as_deref(), Some("https://x.com/jack"));
    }

    #[test]
    fn test_verbatim_platform_needs_full_url() {
        let registry = PlatformRegistry::builtin();
        let mut block = BlockRecord::new("d", BlockKind::Social);
        block.social_platform = Some("discord".into());
        block.social_handle = Some("myserver".into());
        assert_eq!(click_target(&block, &registry), None);
        block.social_handle = Some("https://discord.gg/abc".into());
        assert_eq!(click_target(&block, &registry).as_deref(), Some("https://discord.gg/abc"));
    }
}
