//! Block renderer: mode dispatch, derived styles, click destinations and
//! HTML output.

pub mod destination;
pub mod html;
pub mod mode;
pub mod style;

pub use destination::{click_target, is_navigable, resolve_destination};
pub use mode::{resolve_mode, RenderMode};
pub use style::{background_for, corner_radius, Background, MediaKind};

use crate::social::PlatformRegistry;
use crate::tilt::TiltTransform;
use crate::types::{non_empty, BlockRecord, FeedEntry, Profile};
use crate::ui_core::Placement;
use crate::ui_snapshot::{BlockView, HeaderView, SocialLinkView};
use crate::util_text::format_follower_count;

/// Resolve everything a frontend needs to draw `block` at `placement`.
///
/// `tilt` is `None` when tilt is disabled; spacers never tilt.
pub fn block_view(
    block: &BlockRecord,
    placement: &Placement,
    videos: &[FeedEntry],
    loading: bool,
    registry: &PlatformRegistry,
    tilt: Option<&TiltTransform>,
) -> BlockView {
    let mode = resolve_mode(block, videos, loading, registry);
    let background = background_for(block, &mode);
    let destination = click_target(block, registry);
    let tilt_css = tilt
        .filter(|_| mode.is_interactive())
        .map(|t| t.to_style().to_css());
    crate::debug::log_with(crate::debug::cat::RENDER, || {
        format!("{} -> {}", block.id, mode.name())
    });
    BlockView {
        id: block.id.clone(),
        kind: block.kind,
        placement_css: placement.to_css(),
        placement: placement.clone(),
        radius: corner_radius(block.col_span, block.row_span),
        background,
        text_class: style::text_class(block),
        title: non_empty(&block.title).map(str::to_string),
        subtext: non_empty(&block.subtext).map(str::to_string),
        destination,
        tilt_css,
        z_index: block.z_index,
        mode,
    }
}

/// Header row: name, bio, avatar and the social account links.
pub fn header_view(profile: &Profile, registry: &PlatformRegistry) -> HeaderView {
    let socials = if profile.show_social_in_header {
        profile
            .social_accounts
            .iter()
            .filter(|account| !account.handle.is_empty())
            .map(|account| {
                let descriptor = registry.resolve(&account.platform);
                SocialLinkView {
                    platform: descriptor.key.to_string(),
                    icon: descriptor.icon.to_string(),
                    brand_color: descriptor.brand_color.to_string(),
                    url: descriptor.build_url(&account.handle),
                    followers: if profile.show_follower_count {
                        format_follower_count(account.follower_count)
                    } else {
                        String::new()
                    },
                }
            })
            .collect()
    } else {
        Vec::new()
    };
    HeaderView {
        name: profile.name.clone(),
        bio: profile.bio.clone(),
        avatar_url: non_empty(&profile.avatar_url).map(str::to_string),
        socials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockKind, SocialAccount};
    use crate::ui_core::{layout, ViewportClass};

    fn profile() -> Profile {
        serde_json::from_str(r#"{"name":"JB","bio":"student","socialAccounts":[
            {"platform":"github","handle":"octocat","followerCount":1500},
            {"platform":"nope","handle":"https://example.com"},
            {"platform":"x","handle":""}]}"#)
        .unwrap()
    }

    #[test]
    fn test_header_links() {
        let mut profile = profile();
        profile.show_follower_count = true;
        let header = header_view(&profile, &PlatformRegistry::builtin());
        assert_eq!(header.socials.len(), 2);
        assert_eq!(header.socials[0].url, "https://github.com/octocat");
        assert_eq!(header.socials[0].followers, "1.5k");
        assert_eq!(header.socials[1].platform, "custom");
        assert_eq!(header.socials[1].url, "https://example.com");
    }

    #[test]
    fn test_header_row_hidden() {
        let mut profile = profile();
        profile.show_social_in_header = false;
        profile.social_accounts.push(SocialAccount {
            platform: "x".into(),
            handle: "jack".into(),
            follower_count: None,
        });
        assert!(header_view(&profile, &PlatformRegistry::builtin()).socials.is_empty());
    }

    #[test]
    fn test_spacer_view_has_no_tilt_or_destination() {
        let mut spacer = BlockRecord::new("s", BlockKind::Spacer);
        spacer.content = Some("https://example.com".into());
        let blocks = vec![spacer];
        let placements = layout(&blocks, ViewportClass::Desktop);
        let neutral = TiltTransform::neutral();
        let view = block_view(&blocks[0], &placements[0], &[], false, &PlatformRegistry::builtin(), Some(&neutral));
        assert_eq!(view.destination, None);
        assert_eq!(view.tilt_css, None);
        assert_eq!(view.radius, "0.5rem");
    }
}
