//! Social platform resolver.
//!
//! Maps a platform key (`"github"`, `"x"`, ...) to display metadata and a
//! pure handle → URL rule. The table is an injected [`PlatformRegistry`]
//! value rather than global state so tests and alternate deployments can
//! swap it. Unknown keys resolve to the generic "custom link" descriptor.

use std::collections::HashMap;

pub use crate::util_text::format_follower_count;

/// How a stored handle becomes an absolute URL. Never fails; a malformed
/// handle just yields a malformed URL.
#[derive(Clone, Copy, Debug)]
pub enum UrlRule {
    /// `prefix + handle`
    Prefix(&'static str),
    /// `prefix + handle + suffix`
    Wrap(&'static str, &'static str),
    /// Handle is already a full URL.
    Verbatim,
    /// Keep the handle if it carries a scheme, otherwise prefix `https://`.
    Website,
    /// Caller-supplied transform for platforms outside the builtin table.
    Custom(fn(&str) -> String),
}

impl UrlRule {
    pub fn build(&self, handle: &str) -> String {
        match self {
            UrlRule::Prefix(prefix) => format!("{prefix}{handle}"),
            UrlRule::Wrap(prefix, suffix) => format!("{prefix}{handle}{suffix}"),
            UrlRule::Verbatim => handle.to_string(),
            UrlRule::Website => {
                if has_scheme(handle) {
                    handle.to_string()
                } else {
                    format!("https://{handle}")
                }
            }
            UrlRule::Custom(f) => f(handle),
        }
    }

    /// Fixed leading text every built URL starts with, if the rule has one.
    pub fn fixed_prefix(&self) -> Option<&'static str> {
        match self {
            UrlRule::Prefix(prefix) | UrlRule::Wrap(prefix, _) => Some(*prefix),
            UrlRule::Website => Some("https://"),
            UrlRule::Verbatim | UrlRule::Custom(_) => None,
        }
    }

    pub fn is_verbatim(&self) -> bool {
        matches!(self, UrlRule::Verbatim)
    }
}

fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(pos) if pos > 0 => s[..pos]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Display metadata plus URL rule for one platform.
#[derive(Clone, Debug)]
pub struct PlatformDescriptor {
    pub key: &'static str,
    /// Glyph identity, resolved to an actual asset by the presentation layer.
    pub icon: &'static str,
    pub brand_color: &'static str,
    pub rule: UrlRule,
}

impl PlatformDescriptor {
    pub const fn new(key: &'static str, icon: &'static str, brand_color: &'static str, rule: UrlRule) -> Self {
        Self {
            key,
            icon,
            brand_color,
            rule,
        }
    }

    pub fn build_url(&self, handle: &str) -> String {
        self.rule.build(handle)
    }
}

pub const CUSTOM: PlatformDescriptor =
    PlatformDescriptor::new("custom", "link", "#6B7280", UrlRule::Verbatim);

const BUILTIN: &[PlatformDescriptor] = &[
    PlatformDescriptor::new("x", "si-x", "#000000", UrlRule::Prefix("https://x.com/")),
    PlatformDescriptor::new("instagram", "si-instagram", "#E4405F", UrlRule::Prefix("https://instagram.com/")),
    PlatformDescriptor::new("tiktok", "si-tiktok", "#000000", UrlRule::Prefix("https://tiktok.com/@")),
    PlatformDescriptor::new("youtube", "si-youtube", "#FF0000", UrlRule::Prefix("https://youtube.com/@")),
    PlatformDescriptor::new("github", "si-github", "#181717", UrlRule::Prefix("https://github.com/")),
    PlatformDescriptor::new("gitlab", "si-gitlab", "#FC6D26", UrlRule::Prefix("https://gitlab.com/")),
    PlatformDescriptor::new("linkedin", "si-linkedin", "#0A66C2", UrlRule::Prefix("https://linkedin.com/in/")),
    PlatformDescriptor::new("facebook", "si-facebook", "#1877F2", UrlRule::Prefix("https://facebook.com/")),
    PlatformDescriptor::new("twitch", "si-twitch", "#9146FF", UrlRule::Prefix("https://twitch.tv/")),
    PlatformDescriptor::new("dribbble", "si-dribbble", "#EA4C89", UrlRule::Prefix("https://dribbble.com/")),
    PlatformDescriptor::new("medium", "si-medium", "#000000", UrlRule::Prefix("https://medium.com/@")),
    PlatformDescriptor::new("devto", "si-devdotto", "#0A0A0A", UrlRule::Prefix("https://dev.to/")),
    PlatformDescriptor::new("reddit", "si-reddit", "#FF4500", UrlRule::Prefix("https://reddit.com/user/")),
    PlatformDescriptor::new("pinterest", "si-pinterest", "#BD081C", UrlRule::Prefix("https://pinterest.com/")),
    PlatformDescriptor::new("threads", "si-threads", "#000000", UrlRule::Prefix("https://threads.net/@")),
    PlatformDescriptor::new("bluesky", "si-bluesky", "#0085FF", UrlRule::Prefix("https://bsky.app/profile/")),
    PlatformDescriptor::new("mastodon", "si-mastodon", "#6364FF", UrlRule::Verbatim),
    PlatformDescriptor::new("substack", "si-substack", "#FF6719", UrlRule::Wrap("https://", ".substack.com")),
    PlatformDescriptor::new("patreon", "si-patreon", "#FF424D", UrlRule::Prefix("https://patreon.com/")),
    PlatformDescriptor::new("kofi", "si-kofi", "#FF5E5B", UrlRule::Prefix("https://ko-fi.com/")),
    PlatformDescriptor::new("buymeacoffee", "si-buymeacoffee", "#FFDD00", UrlRule::Prefix("https://buymeacoffee.com/")),
    PlatformDescriptor::new("snapchat", "si-snapchat", "#FFFC00", UrlRule::Prefix("https://snapchat.com/add/")),
    PlatformDescriptor::new("discord", "si-discord", "#5865F2", UrlRule::Verbatim),
    PlatformDescriptor::new("telegram", "si-telegram", "#26A5E4", UrlRule::Prefix("https://t.me/")),
    PlatformDescriptor::new("whatsapp", "si-whatsapp", "#25D366", UrlRule::Prefix("https://wa.me/")),
    PlatformDescriptor::new("website", "globe", "#6B7280", UrlRule::Website),
    CUSTOM,
];

/// Platform key → descriptor table with a fallback for unknown keys.
#[derive(Clone, Debug)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDescriptor>,
    fallback: PlatformDescriptor,
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PlatformRegistry {
    /// Empty registry: every key resolves to the fallback.
    pub fn empty(fallback: PlatformDescriptor) -> Self {
        Self {
            platforms: HashMap::new(),
            fallback,
        }
    }

    /// The standard platform table.
    pub fn builtin() -> Self {
        let mut registry = Self::empty(CUSTOM);
        for descriptor in BUILTIN {
            registry.insert(descriptor.clone());
        }
        registry
    }

    pub fn insert(&mut self, descriptor: PlatformDescriptor) {
        self.platforms.insert(descriptor.key.to_string(), descriptor);
    }

    /// Look up a platform; unknown or empty keys degrade to the fallback.
    pub fn resolve(&self, key: &str) -> &PlatformDescriptor {
        match self.platforms.get(key) {
            Some(descriptor) => descriptor,
            None => {
                log::debug!("[social] unknown platform '{key}', using fallback");
                &self.fallback
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.platforms.contains_key(key)
    }

    pub fn build_url(&self, key: &str, handle: &str) -> String {
        self.resolve(key).build_url(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.platforms.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_url() {
        let registry = PlatformRegistry::builtin();
        assert_eq!(registry.build_url("github", "octocat"), "https://github.com/octocat");
    }

    #[test]
    fn test_path_conventions() {
        let registry = PlatformRegistry::builtin();
        assert_eq!(registry.build_url("tiktok", "me"), "https://tiktok.com/@me");
        assert_eq!(registry.build_url("linkedin", "me"), "https://linkedin.com/in/me");
        assert_eq!(registry.build_url("reddit", "me"), "https://reddit.com/user/me");
        assert_eq!(registry.build_url("substack", "me"), "https://me.substack.com");
    }

    #[test]
    fn test_prefixed_rules_keep_handle() {
        let registry = PlatformRegistry::builtin();
        for handle in ["octocat", "a.b_c-d", "", "weird handle/with?chars"] {
            for descriptor in registry.iter() {
                if descriptor.rule.is_verbatim() {
                    continue;
                }
                let url = descriptor.build_url(handle);
                let prefix = descriptor.rule.fixed_prefix().unwrap();
                assert!(url.starts_with(prefix), "{} -> {url}", descriptor.key);
                assert!(url.contains(handle), "{} -> {url}", descriptor.key);
            }
        }
    }

    #[test]
    fn test_verbatim_platforms() {
        let registry = PlatformRegistry::builtin();
        let handle = "https://discord.com/users/637926492898328577";
        assert_eq!(registry.build_url("discord", handle), handle);
        assert_eq!(registry.build_url("mastodon", "https://mastodon.social/@me"), "https://mastodon.social/@me");
    }

    #[test]
    fn test_website_scheme_detection() {
        let registry = PlatformRegistry::builtin();
        assert_eq!(registry.build_url("website", "example.com"), "https://example.com");
        assert_eq!(registry.build_url("website", "http://example.com"), "http://example.com");
        assert_eq!(registry.build_url("website", "https://example.com/a"), "https://example.com/a");
    }

    #[test]
    fn test_unknown_platform_falls_back() {
        let registry = PlatformRegistry::builtin();
        let descriptor = registry.resolve("myspace");
        assert_eq!(descriptor.key, "custom");
        assert_eq!(descriptor.icon, "link");
        assert_eq!(descriptor.brand_color, "#6B7280");
        assert_eq!(descriptor.build_url("whatever"), "whatever");
    }

    #[test]
    fn test_injected_registry() {
        let mut registry = PlatformRegistry::empty(CUSTOM);
        assert_eq!(registry.resolve("github").key, "custom");
        registry.insert(PlatformDescriptor::new(
            "forge",
            "link",
            "#123456",
            UrlRule::Custom(|h| format!("https://forge.example/{}", h.to_lowercase())),
        ));
        assert_eq!(registry.build_url("forge", "Me"), "https://forge.example/me");
    }
}
