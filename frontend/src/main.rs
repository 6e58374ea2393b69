mod api;
mod config;
mod copy_flash;
mod intake;
mod progress;
mod share;
mod widget;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, DragEvent, Element, File, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlMediaElement, ScrollBehavior, ScrollIntoViewOptions,
};

use crate::api::{SubmissionKind, UploadResult};
use crate::config::{ROOT_ELEMENT_ID, WidgetConfig};
use crate::copy_flash::{COPY_FLASH_MS, CopyFlash};
use crate::intake::FileCandidate;
use crate::progress::PROGRESS_TICK_MS;
use crate::widget::{Admission, ResultPanel, Settlement, Widget, WidgetView};

const MENU_OPEN_CLASS: &str = "active";
const DROP_HIGHLIGHT_CLASS: &str = "highlight";

#[derive(Clone)]
struct Controller {
    config: Rc<WidgetConfig>,
    widget: Rc<RefCell<Widget>>,
    ticker: Rc<RefCell<Option<Interval>>>,
    copy_flash: Rc<RefCell<CopyFlash>>,
}

fn web_document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    web_document()?
        .get_element_by_id(id)?
        .dyn_into::<T>()
        .ok()
}

fn set_text(id: &str, value: impl AsRef<str>) {
    let Some(doc) = web_document() else {
        return;
    };
    let Some(node) = doc.get_element_by_id(id) else {
        return;
    };
    let next = value.as_ref();
    if node.text_content().as_deref() == Some(next) {
        return;
    }
    node.set_text_content(Some(next));
}

fn set_display(id: &str, display: &str) {
    if let Some(element) = element_by_id::<HtmlElement>(id) {
        let _ = element.style().set_property("display", display);
    }
}

fn set_class_flag(node: &Element, class_name: &str, on: bool) {
    let _ = node.class_list().toggle_with_force(class_name, on);
}

fn signature_changed(node: &Element, signature: &str) -> bool {
    let current = node.get_attribute("data-render-sig").unwrap_or_default();
    if current == signature {
        return false;
    }
    let _ = node.set_attribute("data-render-sig", signature);
    true
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn render(view: &WidgetView) {
    let Some(doc) = web_document() else {
        return;
    };

    if let Ok(Some(menu)) = doc.query_selector(".menu-links") {
        set_class_flag(&menu, MENU_OPEN_CLASS, view.menu_open);
    }
    if let Some(zone) = doc.get_element_by_id("dropZone") {
        set_class_flag(&zone, DROP_HIGHLIGHT_CLASS, view.drop_highlight);
    }

    set_display(
        "uploadModal",
        if view.modal_visible { "flex" } else { "none" },
    );
    if let Some(bar) = element_by_id::<HtmlElement>("uploadProgress") {
        let _ = bar.style().set_property("width", &view.progress_width);
    }
    set_text("uploadStatus", &view.progress_status);

    if let Some(input) = element_by_id::<HtmlInputElement>("fileInput") {
        input.set_disabled(view.controls_disabled);
    }
    if let Some(button) = element_by_id::<HtmlButtonElement>("addUrlBtn") {
        button.set_disabled(view.controls_disabled);
    }

    if let Some(result) = view.result.as_ref() {
        render_result(&doc, result);
    }
}

fn render_result(doc: &Document, result: &UploadResult) {
    let Some(video) = element_by_id::<HtmlMediaElement>("uploadedVideo") else {
        return;
    };

    let panel = ResultPanel::new(result);
    if !signature_changed(&video, &panel.signature) {
        return;
    }

    let _ = video.style().set_property("display", "block");
    video.set_src(&panel.video_src);
    set_display("shareContainer", "block");
    set_text("shareLink", &panel.share_text);
    update_social_links(doc, result);
}

fn update_social_links(doc: &Document, result: &UploadResult) {
    let Ok(anchors) = doc.query_selector_all(".social-share a") else {
        return;
    };

    for idx in 0..anchors.length() {
        let Some(anchor) = anchors
            .item(idx)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        let classes = anchor.class_name();
        if let Some(href) = ResultPanel::share_href(result, classes.split_whitespace()) {
            let _ = anchor.set_attribute("href", &href);
        }
    }
}

fn scroll_video_section_into_view() {
    let Some(section) = web_document().and_then(|doc| doc.get_element_by_id("videoSection"))
    else {
        return;
    };
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    section.scroll_into_view_with_scroll_into_view_options(&options);
}

fn file_candidate(file: &File) -> FileCandidate {
    FileCandidate {
        name: file.name(),
        mime: file.type_(),
        size: file.size() as u64,
    }
}

async fn write_clipboard(text: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let promise = window.navigator().clipboard().write_text(text);
    match JsFuture::from(promise).await {
        Ok(_) => true,
        Err(err) => {
            log::warn!("clipboard write failed: {err:?}");
            false
        }
    }
}

impl Controller {
    fn redraw(&self) {
        let view = self.widget.borrow().view();
        render(&view);
    }

    fn handle_file(&self, file: Option<File>) {
        let candidate = file.as_ref().map(file_candidate);
        let admission = self.widget.borrow_mut().offer_file(candidate.as_ref());

        match admission {
            Admission::Submit(()) => {
                if let Some(file) = file {
                    self.start_upload(file);
                }
            }
            Admission::Reject(rejection) => {
                let name = candidate.as_ref().map(|c| c.name.as_str()).unwrap_or("(no file)");
                log::info!("{name} rejected: {rejection}");
                alert(&rejection.to_string());
            }
            Admission::Busy => log::warn!("ignoring file while a submission is in flight"),
            Admission::Ignore => {}
        }
        self.redraw();
    }

    fn submit_url(&self) {
        let Some(input) = element_by_id::<HtmlInputElement>("urlInput") else {
            return;
        };
        let admission = self.widget.borrow_mut().offer_url(&input.value());

        match admission {
            Admission::Submit(url) => self.start_url_registration(url),
            Admission::Reject(rejection) => {
                log::info!("url rejected: {rejection}");
                alert(&rejection.to_string());
            }
            Admission::Busy => log::warn!("ignoring url while a submission is in flight"),
            Admission::Ignore => {}
        }
        self.redraw();
    }

    fn start_upload(&self, file: File) {
        log::info!(
            "uploading {} ({} bytes) to {}",
            file.name(),
            file.size(),
            self.config.upload_endpoint
        );
        self.start_progress_ticker();

        let ctl = self.clone();
        spawn_local(async move {
            let result = api::upload_video(&ctl.config.upload_endpoint, &file).await;
            ctl.finish(SubmissionKind::Upload, result);
        });
    }

    fn start_url_registration(&self, url: String) {
        log::info!("registering {url} with {}", self.config.register_endpoint);

        let ctl = self.clone();
        spawn_local(async move {
            let result = api::register_video_url(&ctl.config.register_endpoint, &url).await;
            ctl.finish(SubmissionKind::RegisterUrl, result);
        });
    }

    fn start_progress_ticker(&self) {
        let ctl = self.clone();
        let interval = Interval::new(PROGRESS_TICK_MS, move || {
            let keep_running = ctl.widget.borrow_mut().tick_progress();
            ctl.redraw();
            if !keep_running {
                ctl.stop_progress_ticker();
            }
        });
        *self.ticker.borrow_mut() = Some(interval);
    }

    fn stop_progress_ticker(&self) {
        let interval = self.ticker.borrow_mut().take();
        drop(interval);
    }

    fn finish(&self, kind: SubmissionKind, result: Result<UploadResult, api::SubmitError>) {
        if kind == SubmissionKind::Upload {
            self.stop_progress_ticker();
        }
        if let Err(err) = result.as_ref() {
            log::error!("{} failed: {err}", kind.label());
        }

        let settlement = self.widget.borrow_mut().settle(kind, result);
        log::debug!("widget phase now {:?}", self.widget.borrow().phase());
        self.redraw();

        match settlement {
            Settlement::Displayed(uploaded) => {
                log::info!("{} succeeded: {}", kind.label(), uploaded.share_url);
                scroll_video_section_into_view();
                if kind == SubmissionKind::RegisterUrl {
                    if let Some(input) = element_by_id::<HtmlInputElement>("urlInput") {
                        input.set_value("");
                    }
                }
            }
            Settlement::Alert(message) => alert(&message),
            Settlement::Stale => log::warn!("discarding stale {} response", kind.label()),
        }
    }

    fn flash_copy_button(&self, copied: bool) {
        let Some(button) = element_by_id::<HtmlElement>("copyLink") else {
            return;
        };

        let (markup, generation) = self
            .copy_flash
            .borrow_mut()
            .begin(&button.inner_html(), copied);
        button.set_inner_html(markup);

        let flash = self.copy_flash.clone();
        Timeout::new(COPY_FLASH_MS, move || {
            if let Some(original) = flash.borrow_mut().finish(generation) {
                button.set_inner_html(&original);
            }
        })
        .forget();
    }
}

fn install_menu_toggle(ctl: &Controller) {
    let Some(icon) = element_by_id::<HtmlElement>("menuIcon") else {
        return;
    };

    let ctl = ctl.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        ctl.widget.borrow_mut().toggle_menu();
        ctl.redraw();
    });
    let _ = icon.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    callback.forget();
}

fn install_drop_zone(ctl: &Controller) {
    let Some(zone) = element_by_id::<HtmlElement>("dropZone") else {
        return;
    };

    let events = [
        ("dragenter", true),
        ("dragover", true),
        ("dragleave", false),
        ("drop", false),
    ];
    for (event_name, highlight) in events {
        let ctl = ctl.clone();
        let callback = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
            event.prevent_default();
            event.stop_propagation();
            ctl.widget.borrow_mut().set_drop_highlight(highlight);

            if event.type_() == "drop" {
                let file = event
                    .data_transfer()
                    .and_then(|transfer| transfer.files())
                    .and_then(|files| files.get(0));
                ctl.handle_file(file);
            } else {
                ctl.redraw();
            }
        });
        let _ = zone.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        callback.forget();
    }
}

fn install_file_input(ctl: &Controller) {
    let Some(input) = element_by_id::<HtmlInputElement>("fileInput") else {
        return;
    };

    let ctl = ctl.clone();
    let input_ref = input.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let file = input_ref.files().and_then(|files| files.get(0));
        ctl.handle_file(file);
    });
    let _ = input.add_event_listener_with_callback("change", callback.as_ref().unchecked_ref());
    callback.forget();
}

fn install_url_intake(ctl: &Controller) {
    let Some(button) = element_by_id::<HtmlButtonElement>("addUrlBtn") else {
        return;
    };

    let ctl = ctl.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        ctl.submit_url();
    });
    let _ = button.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    callback.forget();
}

fn install_copy_link(ctl: &Controller) {
    let Some(button) = element_by_id::<HtmlElement>("copyLink") else {
        return;
    };

    let ctl = ctl.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let link = web_document()
            .and_then(|doc| doc.get_element_by_id("shareLink"))
            .and_then(|node| node.text_content())
            .unwrap_or_default();

        let ctl = ctl.clone();
        spawn_local(async move {
            let copied = write_clipboard(&link).await;
            if copied {
                log::debug!("copied {link}");
            }
            ctl.flash_copy_button(copied);
        });
    });
    let _ = button.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    callback.forget();
}

fn main() {
    console_error_panic_hook::set_once();

    let root = web_document().and_then(|doc| doc.get_element_by_id(ROOT_ELEMENT_ID));
    let config = root
        .as_ref()
        .map(|root| WidgetConfig::from_attributes(|name| root.get_attribute(name)))
        .unwrap_or_default();
    let _ = console_log::init_with_level(config.log_level);
    if root.is_none() {
        log::warn!("#{ROOT_ELEMENT_ID} not found; using default endpoints");
    }

    let menu_open = web_document()
        .and_then(|doc| doc.query_selector(".menu-links").ok().flatten())
        .map(|menu| menu.class_list().contains(MENU_OPEN_CLASS))
        .unwrap_or(false);

    let ctl = Controller {
        widget: Rc::new(RefCell::new(Widget::new(config.max_upload_bytes, menu_open))),
        config: Rc::new(config),
        ticker: Rc::new(RefCell::new(None)),
        copy_flash: Rc::new(RefCell::new(CopyFlash::default())),
    };

    install_menu_toggle(&ctl);
    install_drop_zone(&ctl);
    install_file_input(&ctl);
    install_url_intake(&ctl);
    install_copy_link(&ctl);
    ctl.redraw();

    if let Some(root) = root {
        let _ = root.class_list().add_1("ready");
    }
    log::info!(
        "upload widget ready (upload: {}, register: {})",
        ctl.config.upload_endpoint,
        ctl.config.register_endpoint
    );
}
