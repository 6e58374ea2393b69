use html_compile::compile::build_component;
use html_compile::types::{Attribute, Child, Component};

use crate::config::AppConfig;
use crate::state::BuildStamp;

const WIDGET_CSS: &str = include_str!("ui_assets/widget.css");
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

pub const ASSETS_PREFIX: &str = "/assets";
const WIDGET_JS: &str = "vidshare-frontend.js";
const WIDGET_WASM: &str = "vidshare-frontend_bg.wasm";

#[derive(Debug, Clone)]
struct UiElement {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    content: UiContent,
}

#[derive(Debug, Clone)]
enum UiContent {
    Empty,
    Text(String),
    Children(Vec<UiElement>),
}

impl UiElement {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            content: UiContent::Empty,
        }
    }

    fn with_attr(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((label, value.into()));
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = UiContent::Text(text.into());
        self
    }

    fn with_children(mut self, children: Vec<UiElement>) -> Self {
        self.content = UiContent::Children(children);
        self
    }

    fn render(&self) -> String {
        build_component(&self.to_component())
    }

    fn to_component(&self) -> Component<'_> {
        let meta = if self.attrs.is_empty() {
            None
        } else {
            Some(
                self.attrs
                    .iter()
                    .map(|(label, value)| Attribute {
                        label,
                        value: value.as_str(),
                    })
                    .collect(),
            )
        };

        let child = match &self.content {
            UiContent::Empty => Child::NoChild,
            UiContent::Text(value) => Child::Text(value.as_str()),
            UiContent::Children(nodes) => Child::ComponentVec(
                nodes
                    .iter()
                    .map(|node| Box::new(node.to_component()))
                    .collect(),
            ),
        };

        Component {
            tag: self.tag,
            meta,
            child,
        }
    }
}

fn el(tag: &'static str) -> UiElement {
    UiElement::new(tag)
}

fn text_el(tag: &'static str, text: &str) -> UiElement {
    UiElement::new(tag).with_text(escape_html(text))
}

fn icon(class_name: &str) -> UiElement {
    el("i").with_attr("class", class_name.to_string())
}

fn share_anchor(platform: &str, icon_class: &str, label: &str) -> UiElement {
    el("a")
        .with_attr("class", platform.to_string())
        .with_attr("href", "#")
        .with_attr("target", "_blank")
        .with_attr("rel", "noopener noreferrer")
        .with_attr("aria-label", label.to_string())
        .with_children(vec![icon(icon_class)])
}

fn render_nav(config: &AppConfig) -> UiElement {
    el("nav").with_attr("class", "navbar").with_children(vec![
        text_el("span", &config.site_title).with_attr("class", "logo"),
        el("div")
            .with_attr("class", "menu-icon")
            .with_attr("id", "menuIcon")
            .with_children(vec![icon("fas fa-bars")]),
        el("div").with_attr("class", "menu-links").with_children(vec![
            text_el("a", "Upload").with_attr("href", "#upload"),
            text_el("a", "Your video").with_attr("href", "#videoSection"),
        ]),
    ])
}

fn render_intake_section(config: &AppConfig) -> UiElement {
    let limit_hint = format!("Video files up to {}MB", config.max_upload_mb);

    el("section")
        .with_attr("id", "upload")
        .with_attr("class", "card")
        .with_children(vec![
            text_el("h1", "Share a video"),
            el("div")
                .with_attr("id", "dropZone")
                .with_attr("class", "drop-zone")
                .with_children(vec![
                    icon("fas fa-cloud-upload-alt"),
                    text_el("p", "Drag and drop a video here, or"),
                    text_el("label", "Choose a file")
                        .with_attr("for", "fileInput")
                        .with_attr("class", "btn"),
                    el("input")
                        .with_attr("type", "file")
                        .with_attr("id", "fileInput")
                        .with_attr("accept", "video/*")
                        .with_attr("hidden", "hidden"),
                    text_el("p", &limit_hint).with_attr("class", "hint"),
                ]),
            el("div").with_attr("class", "url-intake").with_children(vec![
                el("input")
                    .with_attr("type", "url")
                    .with_attr("id", "urlInput")
                    .with_attr("placeholder", "https://example.com/video.mp4"),
                text_el("button", "Add URL")
                    .with_attr("type", "button")
                    .with_attr("id", "addUrlBtn")
                    .with_attr("class", "btn"),
            ]),
        ])
}

fn render_video_section() -> UiElement {
    el("section")
        .with_attr("id", "videoSection")
        .with_attr("class", "card")
        .with_children(vec![
            el("video")
                .with_attr("id", "uploadedVideo")
                .with_attr("controls", "controls")
                .with_attr("style", "display: none;"),
            el("div")
                .with_attr("id", "shareContainer")
                .with_attr("style", "display: none;")
                .with_children(vec![
                    el("div").with_attr("class", "share-link").with_children(vec![
                        el("span").with_attr("id", "shareLink"),
                        el("button")
                            .with_attr("type", "button")
                            .with_attr("id", "copyLink")
                            .with_attr("class", "btn secondary")
                            .with_children(vec![
                                icon("fas fa-copy"),
                                text_el("span", "Copy link"),
                            ]),
                    ]),
                    el("div").with_attr("class", "social-share").with_children(vec![
                        share_anchor("facebook", "fab fa-facebook-f", "Share on Facebook"),
                        share_anchor("twitter", "fab fa-x-twitter", "Share on X"),
                        share_anchor("whatsapp", "fab fa-whatsapp", "Share on WhatsApp"),
                    ]),
                ]),
        ])
}

fn render_upload_modal() -> UiElement {
    el("div")
        .with_attr("id", "uploadModal")
        .with_attr("class", "modal")
        .with_attr("style", "display: none;")
        .with_children(vec![
            el("div").with_attr("class", "modal-content").with_children(vec![
                text_el("p", "Uploading: 0%").with_attr("id", "uploadStatus"),
                el("div").with_attr("class", "progress-bar").with_children(vec![
                    el("div")
                        .with_attr("id", "uploadProgress")
                        .with_attr("class", "progress")
                        .with_attr("style", "width: 0%;"),
                ]),
            ]),
        ])
}

fn widget_bootstrap_script() -> String {
    format!(
        "import init from '{ASSETS_PREFIX}/{WIDGET_JS}';\ninit('{ASSETS_PREFIX}/{WIDGET_WASM}');\n"
    )
}

pub fn render_upload_page(config: &AppConfig, build: &BuildStamp) -> String {
    let widget_root = el("main")
        .with_attr("id", "vidshare")
        .with_attr("data-upload-endpoint", escape_html(&config.upload_endpoint))
        .with_attr(
            "data-register-endpoint",
            escape_html(&config.register_endpoint),
        )
        .with_attr("data-max-upload-bytes", config.max_upload_bytes().to_string())
        .with_attr("data-log-level", escape_html(&config.widget_log_level))
        .with_children(vec![render_intake_section(config), render_video_section()]);

    let body_nodes = vec![
        render_nav(config),
        widget_root,
        render_upload_modal(),
        el("footer").with_children(vec![
            text_el("span", &format!("build {}", build.label())).with_attr("id", "build-version"),
        ]),
        el("script")
            .with_attr("type", "module")
            .with_text(widget_bootstrap_script()),
    ];

    render_document(&config.site_title, body_nodes)
}

fn render_document(title: &str, body_nodes: Vec<UiElement>) -> String {
    let head_children = vec![
        el("meta").with_attr("charset", "UTF-8"),
        el("meta")
            .with_attr("name", "viewport")
            .with_attr("content", "width=device-width, initial-scale=1.0"),
        text_el("title", title),
        el("link")
            .with_attr("rel", "stylesheet")
            .with_attr("href", FONT_AWESOME_CSS),
        el("style").with_text(WIDGET_CSS),
    ];

    let html = el("html").with_attr("lang", "en").with_children(vec![
        el("head").with_children(head_children),
        el("body").with_children(body_nodes),
    ]);

    format!("<!DOCTYPE html>\n{}", html.render())
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> BuildStamp {
        BuildStamp {
            hash: "deadbeef".to_string(),
            timestamp: "2026-02-06 10:00:00 UTC".to_string(),
            epoch: 1_770_372_000,
        }
    }

    #[test]
    fn renders_every_element_the_widget_binds_to() {
        let html = render_upload_page(&AppConfig::default(), &build());
        for id in [
            "menuIcon",
            "dropZone",
            "fileInput",
            "urlInput",
            "addUrlBtn",
            "videoSection",
            "uploadedVideo",
            "shareContainer",
            "shareLink",
            "copyLink",
            "uploadModal",
            "uploadProgress",
            "uploadStatus",
            "vidshare",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
        assert!(html.contains("class=\"menu-links\""));
        assert!(html.contains("class=\"social-share\""));
        for platform in ["facebook", "twitter", "whatsapp"] {
            assert!(html.contains(&format!("class=\"{platform}\"")), "{platform}");
        }
    }

    #[test]
    fn passes_endpoints_and_limits_to_the_widget() {
        let config = AppConfig {
            upload_endpoint: "/media/upload".to_string(),
            register_endpoint: "/media/register".to_string(),
            max_upload_mb: 2,
            ..AppConfig::default()
        };
        let html = render_upload_page(&config, &build());
        assert!(html.contains("data-upload-endpoint=\"/media/upload\""));
        assert!(html.contains("data-register-endpoint=\"/media/register\""));
        assert!(html.contains("data-max-upload-bytes=\"2097152\""));
        assert!(html.contains("Video files up to 2MB"));
        assert!(html.contains("/assets/vidshare-frontend.js"));
    }

    #[test]
    fn result_panel_and_modal_start_hidden() {
        let html = render_upload_page(&AppConfig::default(), &build());
        assert!(html.contains("id=\"uploadedVideo\" controls=\"controls\" style=\"display: none;\""));
        assert!(html.contains("id=\"shareContainer\" style=\"display: none;\""));
        assert!(html.contains("id=\"uploadModal\" class=\"modal\" style=\"display: none;\""));
    }

    #[test]
    fn escapes_configured_title() {
        let config = AppConfig {
            site_title: "<Clips & Co>".to_string(),
            ..AppConfig::default()
        };
        let html = render_upload_page(&config, &build());
        assert!(html.contains("&lt;Clips &amp; Co&gt;"));
        assert!(!html.contains("<Clips"));
        assert!(html.contains("build deadbeef 2026-02-06 10:00:00 UTC"));
    }
}
