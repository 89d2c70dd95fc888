//! HTML markup for resolved block views and the full page.
//!
//! Output is plain server-side markup. Navigable blocks carry their
//! destination in `data-href` and open it in a new browsing context on
//! click; feed thumbnails stop propagation so the block itself does not
//! navigate as well.

use crate::feed::video_url;
use crate::render::mode::{IconView, RenderMode};
use crate::render::style::MediaKind;
use crate::theme::tokens::tokens;
use crate::theme::Theme;
use crate::types::{MediaPosition, Profile};
use crate::ui_snapshot::{BlockView, HeaderView};
use crate::util_text::escape_html as esc;

const OPEN_ON_CLICK: &str = "window.open(this.dataset.href,'_blank','noopener,noreferrer')";

fn icon_html(icon: &IconView, size_px: u32) -> String {
    let color = if icon.tinted {
        format!(" style=\"color:{}\"", esc(&icon.brand_color))
    } else {
        String::new()
    };
    format!(
        "<span class=\"bento-icon\" data-icon=\"{}\" data-platform=\"{}\" data-size=\"{size_px}\"{color}></span>",
        esc(&icon.icon),
        esc(&icon.platform)
    )
}

fn object_position(position: &MediaPosition) -> String {
    format!("object-position:{}% {}%;", position.x, position.y)
}

fn title_block(view: &BlockView, overlay: bool) -> String {
    let mut out = String::new();
    let class = if overlay { "bento-title bento-title-overlay" } else { "bento-title" };
    if let Some(title) = &view.title {
        out.push_str(&format!("<h3 class=\"{class}\">{}</h3>", esc(title)));
    }
    if let Some(subtext) = &view.subtext {
        out.push_str(&format!("<p class=\"bento-subtext\">{}</p>", esc(subtext)));
    }
    out
}

fn inner_html(view: &BlockView) -> String {
    let icon_px = tokens().visuals.icon_size_px;
    match &view.mode {
        RenderMode::Spacer => String::new(),
        RenderMode::SocialIcon { icon } => icon_html(icon, icon_px),
        RenderMode::FeedGrid {
            channel_title,
            videos,
            loading,
        } => {
            let mut out = format!(
                "<div class=\"bento-feed-head\"><span class=\"bento-feed-badge\" data-icon=\"si-youtube\"></span>\
                 <div><h3 class=\"bento-feed-title\">{}</h3><span class=\"bento-feed-sub\">Latest videos</span></div></div>",
                esc(channel_title)
            );
            if *loading {
                out.push_str("<div class=\"bento-loading\" aria-busy=\"true\"></div>");
            } else {
                out.push_str("<div class=\"bento-feed-grid\">");
                for video in videos {
                    out.push_str(&format!(
                        "<a class=\"bento-thumb\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" \
                         data-video-id=\"{}\" onclick=\"event.stopPropagation()\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\"></a>",
                        esc(&video_url(&video.id)),
                        esc(&video.id),
                        esc(&video.thumbnail_url),
                        esc(&video.title)
                    ));
                }
                out.push_str("</div>");
            }
            out
        }
        RenderMode::RichPreview { label, .. } => {
            let mut out = String::new();
            if view.title.is_some() || view.subtext.is_some() {
                out.push_str("<div class=\"bento-gradient\"></div>");
            }
            out.push_str("<div class=\"bento-play\" aria-hidden=\"true\"></div>");
            if let Some(label) = label {
                out.push_str(&format!("<h3 class=\"bento-title bento-title-overlay\">{}</h3>", esc(label)));
            }
            out
        }
        RenderMode::ImageCard { .. } => {
            let mut out = String::new();
            if view.title.is_some() || view.subtext.is_some() {
                out.push_str("<div class=\"bento-gradient\"></div>");
            }
            out.push_str(&format!("<div class=\"bento-body bento-bottom\">{}</div>", title_block(view, true)));
            out
        }
        RenderMode::Media { media, position } => {
            let alt = view.title.as_deref().unwrap_or("");
            let mut out = match media {
                MediaKind::Image(src) => format!(
                    "<img class=\"bento-media\" src=\"{}\" alt=\"{}\" style=\"{}\">",
                    esc(src),
                    esc(alt),
                    object_position(position)
                ),
                MediaKind::Video(src) => format!(
                    "<video class=\"bento-media\" src=\"{}\" style=\"{}\" autoplay loop muted playsinline></video>",
                    esc(src),
                    object_position(position)
                ),
                MediaKind::Empty => "<div class=\"bento-media bento-media-empty\"></div>".to_string(),
            };
            if view.title.is_some() {
                out.push_str(&format!("<div class=\"bento-media-overlay\">{}</div>", title_block(view, true)));
            }
            out
        }
        RenderMode::Map { embed_url } => {
            let mut out = format!(
                "<iframe class=\"bento-map\" src=\"{}\" width=\"100%\" height=\"100%\" loading=\"lazy\" \
                 sandbox=\"allow-scripts allow-same-origin\"></iframe>",
                esc(embed_url)
            );
            if let Some(title) = &view.title {
                out.push_str(&format!(
                    "<div class=\"bento-media-overlay\"><h3 class=\"bento-title bento-title-overlay\">{}</h3></div>",
                    esc(title)
                ));
            }
            out
        }
        RenderMode::Panel { icon, body } => {
            let mut out = String::from("<div class=\"bento-body\">");
            if let Some(icon) = icon {
                out.push_str(&icon_html(icon, 14));
            }
            out.push_str(&format!(
                "<div class=\"{}\">",
                if body.is_some() || view.kind == crate::types::BlockKind::Text {
                    "bento-text"
                } else {
                    "bento-bottom"
                }
            ));
            out.push_str(&title_block(view, false));
            if let Some(body) = body {
                out.push_str(&format!("<p class=\"bento-copy\">{}</p>", esc(body)));
            }
            out.push_str("</div></div>");
            out
        }
    }
}

/// Markup for one block, including its grid placement.
pub fn render_block(view: &BlockView) -> String {
    let mut style = view.placement_css.clone();
    if let Some(z) = view.z_index {
        style.push_str(&format!("z-index:{z};"));
    }
    style.push_str(&format!("border-radius:{};", view.radius));

    if let RenderMode::Spacer = view.mode {
        return format!(
            "<div class=\"bento-item bento-spacer\" data-block-id=\"{}\" style=\"{}\"></div>",
            esc(&view.id),
            esc(&style)
        );
    }

    style.push_str(&view.background.to_css());
    if let Some(tilt) = &view.tilt_css {
        style.push_str(tilt);
    }

    let mut class = format!("bento-item bento-mode-{}", view.mode.name().replace('_', "-"));
    if let Some(bg) = view.background.class() {
        class.push(' ');
        class.push_str(bg);
    }
    class.push(' ');
    class.push_str(&view.text_class);

    let click = match &view.destination {
        Some(url) => format!(
            " data-href=\"{}\" role=\"link\" tabindex=\"0\" onclick=\"{OPEN_ON_CLICK}\"",
            esc(url)
        ),
        None => String::new(),
    };
    let tilt_attr = if view.tilt_css.is_some() { " data-tilt" } else { "" };
    let glare = if view.tilt_css.is_some() {
        "<div class=\"bento-glare\"></div>"
    } else {
        ""
    };

    format!(
        "<div class=\"{}\" data-block-id=\"{}\" data-mode=\"{}\" style=\"{}\"{click}{tilt_attr}>{glare}{}</div>",
        esc(&class),
        esc(&view.id),
        view.mode.name(),
        esc(&style),
        inner_html(view)
    )
}

pub fn render_grid(views: &[BlockView], class: &str) -> String {
    let mut out = format!("<div class=\"bento-grid {class}\">");
    for view in views {
        out.push_str(&render_block(view));
    }
    out.push_str("</div>");
    out
}

pub fn render_header(header: &HeaderView) -> String {
    let mut out = String::from("<header class=\"bento-header\">");
    if let Some(avatar) = &header.avatar_url {
        out.push_str(&format!(
            "<img class=\"bento-avatar\" src=\"{}\" alt=\"{}\">",
            esc(avatar),
            esc(&header.name)
        ));
    }
    out.push_str(&format!("<h1 class=\"bento-name\">{}</h1>", esc(&header.name)));
    if !header.bio.is_empty() {
        out.push_str(&format!("<p class=\"bento-bio\">{}</p>", esc(&header.bio)));
    }
    if !header.socials.is_empty() {
        out.push_str("<nav class=\"bento-socials\">");
        for link in &header.socials {
            let followers = if link.followers.is_empty() {
                String::new()
            } else {
                format!("<span class=\"bento-followers\">{}</span>", esc(&link.followers))
            };
            out.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" title=\"{}\">\
                 <span class=\"bento-icon\" data-icon=\"{}\" style=\"color:{}\"></span>{followers}</a>",
                esc(&link.url),
                esc(&link.platform),
                esc(&link.icon),
                esc(&link.brand_color)
            ));
        }
        out.push_str("</nav>");
    }
    out.push_str("</header>");
    out
}

/// Inputs for a complete page document.
pub struct PageDocument<'a> {
    pub profile: &'a Profile,
    pub header: &'a HeaderView,
    /// Authored order, explicit coordinates.
    pub desktop: &'a [BlockView],
    /// Reflowed order.
    pub narrow: &'a [BlockView],
    pub theme: Theme,
}

fn meta_tags(profile: &Profile) -> String {
    let og = profile.open_graph.clone().unwrap_or_default();
    let title = og.title.unwrap_or_else(|| profile.name.clone());
    let description = og.description.unwrap_or_else(|| profile.bio.clone());
    let mut out = format!(
        "<title>{t}</title><meta name=\"description\" content=\"{d}\">\
         <meta property=\"og:type\" content=\"website\"><meta property=\"og:title\" content=\"{t}\">\
         <meta property=\"og:description\" content=\"{d}\">",
        t = esc(&title),
        d = esc(&description)
    );
    if let Some(image) = og.image.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!(
            "<meta property=\"og:image\" content=\"{0}\"><meta name=\"twitter:card\" content=\"summary_large_image\">\
             <meta name=\"twitter:image\" content=\"{0}\">",
            esc(image)
        ));
    }
    if let Some(site) = og.site_name.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("<meta property=\"og:site_name\" content=\"{}\">", esc(site)));
    }
    out
}

fn stylesheet(theme: &Theme) -> String {
    let t = tokens();
    let play = t.visuals.play_button_px;
    format!(
        "{vars}\
         body{{margin:0;background:var(--bento-page-bg);color:var(--bento-text);font-family:system-ui,sans-serif}}\
         .bento-page{{display:flex;flex-direction:column;gap:24px;padding:16px}}\
         .bento-item{{position:relative;overflow:hidden;box-shadow:0 4px 6px -1px rgba(0,0,0,0.1);transform-style:preserve-3d}}\
         .bento-item[data-href]{{cursor:pointer}}\
         .{block_bg}{{background-color:var(--bento-panel)}}.{block_text}{{color:var(--bento-text)}}\
         .bento-body{{position:absolute;inset:0;display:flex;flex-direction:column;padding:16px}}\
         .bento-bottom{{margin-top:auto}}\
         .bento-title{{margin:0;font-size:1rem;font-weight:600}}\
         .bento-subtext,.bento-copy{{margin:4px 0 0;color:var(--bento-text-dim)}}\
         .bento-title-overlay,.bento-mode-image-card .bento-subtext{{position:relative;color:#fff}}\
         .bento-gradient{{position:absolute;inset:0;pointer-events:none;background:{overlay}}}\
         .bento-play{{position:absolute;top:50%;left:50%;width:{play}px;height:{play}px;margin:-{half}px 0 0 -{half}px;\
         border-radius:50%;background:rgba(0,0,0,0.6)}}\
         .bento-play::after{{content:\"\";position:absolute;top:50%;left:54%;transform:translate(-50%,-50%);\
         border-style:solid;border-width:{tri}px 0 {tri}px {tri_w}px;border-color:transparent transparent transparent #fff}}\
         .bento-mode-rich-preview .bento-title-overlay{{position:absolute;left:16px;right:16px;bottom:16px}}\
         .bento-media{{display:block;width:100%;height:100%;object-fit:cover}}\
         .bento-media-empty{{background:var(--bento-panel)}}\
         .bento-media-overlay{{position:absolute;left:0;right:0;bottom:0;padding:16px;background:{overlay}}}\
         .bento-map{{border:0;display:block}}\
         .bento-feed-head{{display:flex;align-items:center;gap:8px;padding:12px}}\
         .bento-feed-badge{{width:24px;height:24px;border-radius:6px;background:var(--bento-feed-badge)}}\
         .bento-feed-title{{margin:0;font-size:0.875rem}}.bento-feed-sub{{font-size:0.75rem;color:var(--bento-text-dim)}}\
         .bento-feed-grid{{display:grid;grid-template-columns:repeat(2,1fr);gap:8px;padding:0 12px 12px}}\
         .bento-thumb img{{display:block;width:100%;aspect-ratio:16/9;object-fit:cover;border-radius:6px}}\
         .bento-glare{{position:absolute;inset:0;pointer-events:none;opacity:0;background:{glare}}}\
         .bento-item:hover .bento-glare{{opacity:1}}\
         .bento-grid-narrow{{{narrow}}}\
         .bento-grid-desktop{{display:none}}\
         @media (min-width:{bp}px){{\
         .bento-page{{flex-direction:row}}.bento-header{{width:var(--bento-sidebar);flex:none}}\
         .bento-grid-desktop{{{desktop}}}.bento-grid-narrow{{display:none}}}}",
        vars = theme.to_css_vars(),
        block_bg = t.visuals.block_color_class,
        block_text = t.visuals.text_color_class,
        overlay = t.visuals.overlay_gradient,
        half = play / 2,
        tri = play / 5,
        tri_w = play * 3 / 10,
        glare = t.visuals.glare_gradient,
        narrow = t.layout.narrow.to_css(),
        desktop = t.layout.desktop.to_css(),
        bp = t.layout.breakpoint_px,
    )
}

/// Complete HTML document: meta tags, header and both grids. A media
/// query at the desktop breakpoint picks which grid is visible.
pub fn render_page(doc: &PageDocument<'_>) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">{meta}<style>{css}</style></head>\
         <body><div class=\"bento-page\">{header}<main>{desktop}{narrow}</main></div></body></html>",
        meta = meta_tags(doc.profile),
        css = stylesheet(&doc.theme),
        header = render_header(doc.header),
        desktop = render_grid(doc.desktop, "bento-grid-desktop"),
        narrow = render_grid(doc.narrow, "bento-grid-narrow"),
    )
}
