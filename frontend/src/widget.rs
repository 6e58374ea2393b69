//! Widget state. Event handlers feed it inputs; the DOM is redrawn from
//! [`Widget::view`] by a single render function.

use crate::api::{SubmissionKind, SubmitError, UploadResult};
use crate::intake::{self, FileCandidate, Rejection};
use crate::progress::SimulatedProgress;
use crate::share::SharePlatform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting(SubmissionKind),
    Succeeded,
    Failed(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Admission<T> {
    Submit(T),
    Reject(Rejection),
    /// Another submission is still in flight.
    Busy,
    /// Nothing to do (blank URL input).
    Ignore,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Settlement {
    Displayed(UploadResult),
    Alert(String),
    /// The response does not belong to the submission in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub menu_open: bool,
    pub drop_highlight: bool,
    pub modal_visible: bool,
    pub progress_width: String,
    pub progress_status: String,
    pub controls_disabled: bool,
    pub result: Option<UploadResult>,
}

/// What the result area shows for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub video_src: String,
    pub share_text: String,
    /// Changes whenever any displayed value changes; used to skip reloading
    /// the video on unrelated redraws.
    pub signature: String,
}

impl ResultPanel {
    pub fn new(result: &UploadResult) -> Self {
        Self {
            video_src: result.url.clone(),
            share_text: result.share_url.clone(),
            signature: format!("{}|{}|{}", result.url, result.title, result.share_url),
        }
    }

    /// `href` for the anchor carrying `classes`, if it is a share anchor.
    pub fn share_href<'a>(
        result: &UploadResult,
        classes: impl Iterator<Item = &'a str>,
    ) -> Option<String> {
        SharePlatform::from_class_list(classes)
            .map(|platform| platform.intent_url(&result.share_url, &result.title))
    }
}

#[derive(Debug)]
pub struct Widget {
    max_upload_bytes: u64,
    phase: Phase,
    menu_open: bool,
    drop_highlight: bool,
    progress: SimulatedProgress,
    displayed: Option<UploadResult>,
}

impl Widget {
    pub fn new(max_upload_bytes: u64, menu_open: bool) -> Self {
        Self {
            max_upload_bytes,
            phase: Phase::Idle,
            menu_open,
            drop_highlight: false,
            progress: SimulatedProgress::default(),
            displayed: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn set_drop_highlight(&mut self, on: bool) {
        self.drop_highlight = on;
    }

    pub fn offer_file(&mut self, file: Option<&FileCandidate>) -> Admission<()> {
        if self.is_busy() {
            return Admission::Busy;
        }
        if let Err(rejection) = intake::check_file(file, self.max_upload_bytes) {
            self.phase = Phase::Idle;
            return Admission::Reject(rejection);
        }
        self.progress.reset();
        self.phase = Phase::Submitting(SubmissionKind::Upload);
        Admission::Submit(())
    }

    pub fn offer_url(&mut self, raw: &str) -> Admission<String> {
        if self.is_busy() {
            return Admission::Busy;
        }
        match intake::check_video_url(raw) {
            Ok(None) => Admission::Ignore,
            Err(rejection) => {
                self.phase = Phase::Idle;
                Admission::Reject(rejection)
            }
            Ok(Some(url)) => {
                self.phase = Phase::Submitting(SubmissionKind::RegisterUrl);
                Admission::Submit(url)
            }
        }
    }

    /// Advances the simulated upload progress. Returns whether the timer
    /// should keep running.
    pub fn tick_progress(&mut self) -> bool {
        if self.phase != Phase::Submitting(SubmissionKind::Upload) {
            return false;
        }
        self.progress.tick()
    }

    pub fn settle(
        &mut self,
        kind: SubmissionKind,
        result: Result<UploadResult, SubmitError>,
    ) -> Settlement {
        if self.phase != Phase::Submitting(kind) {
            return Settlement::Stale;
        }
        self.progress.reset();

        match result {
            Ok(uploaded) => {
                self.displayed = Some(uploaded.clone());
                self.phase = Phase::Succeeded;
                Settlement::Displayed(uploaded)
            }
            Err(err) => {
                let alert = kind.failure_alert(&err);
                self.phase = Phase::Failed(err.to_string());
                Settlement::Alert(alert)
            }
        }
    }

    pub fn view(&self) -> WidgetView {
        WidgetView {
            menu_open: self.menu_open,
            drop_highlight: self.drop_highlight,
            modal_visible: self.phase == Phase::Submitting(SubmissionKind::Upload),
            progress_width: self.progress.bar_width(),
            progress_status: self.progress.status_text(),
            controls_disabled: self.is_busy(),
            result: self.displayed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::DEFAULT_MAX_UPLOAD_BYTES;

    fn widget() -> Widget {
        Widget::new(DEFAULT_MAX_UPLOAD_BYTES, false)
    }

    fn video(size: u64) -> FileCandidate {
        FileCandidate {
            name: "clip.mp4".to_string(),
            mime: "video/mp4".to_string(),
            size,
        }
    }

    fn result(n: u32) -> UploadResult {
        UploadResult {
            url: format!("https://x/{n}.mp4"),
            title: format!("clip {n}"),
            share_url: format!("https://x/s/{n}"),
        }
    }

    #[test]
    fn rejected_file_never_enters_submission() {
        let mut w = widget();
        let image = FileCandidate {
            mime: "image/png".to_string(),
            ..video(10)
        };

        assert_eq!(w.offer_file(Some(&image)), Admission::Reject(Rejection::NotVideo));
        assert!(matches!(
            w.offer_file(Some(&video(DEFAULT_MAX_UPLOAD_BYTES + 1))),
            Admission::Reject(Rejection::TooLarge { .. })
        ));
        assert_eq!(w.phase(), &Phase::Idle);
        assert!(!w.view().modal_visible);
    }

    #[test]
    fn upload_shows_modal_and_blocks_second_submission() {
        let mut w = widget();
        assert_eq!(w.offer_file(Some(&video(1024))), Admission::Submit(()));

        let view = w.view();
        assert!(view.modal_visible);
        assert!(view.controls_disabled);
        assert_eq!(view.progress_width, "0%");

        assert_eq!(w.offer_file(Some(&video(1024))), Admission::Busy);
        assert_eq!(w.offer_url("https://x/a.mp4"), Admission::Busy);
    }

    #[test]
    fn successful_upload_replaces_displayed_result() {
        let mut w = widget();
        w.offer_file(Some(&video(1)));
        assert_eq!(
            w.settle(SubmissionKind::Upload, Ok(result(1))),
            Settlement::Displayed(result(1))
        );

        w.offer_file(Some(&video(1)));
        w.settle(SubmissionKind::Upload, Ok(result(2)));

        let view = w.view();
        assert!(!view.modal_visible);
        assert!(!view.controls_disabled);
        assert_eq!(view.result, Some(result(2)));
    }

    #[test]
    fn server_failure_alerts_and_keeps_previous_video() {
        let mut w = widget();
        w.offer_file(Some(&video(1)));
        w.settle(SubmissionKind::Upload, Ok(result(1)));

        w.offer_file(Some(&video(1)));
        let settlement = w.settle(
            SubmissionKind::Upload,
            Err(SubmitError::Server("too big".to_string())),
        );
        let Settlement::Alert(message) = settlement else {
            panic!("expected alert, got {settlement:?}");
        };
        assert!(message.contains("too big"));

        let view = w.view();
        assert!(!view.modal_visible);
        assert_eq!(view.result, Some(result(1)));
        assert_eq!(w.phase(), &Phase::Failed("too big".to_string()));
    }

    #[test]
    fn url_registration_flow() {
        let mut w = widget();
        assert_eq!(w.offer_url("   "), Admission::Ignore);
        assert_eq!(
            w.offer_url("https://x/clip.mov"),
            Admission::Reject(Rejection::InvalidUrl)
        );
        assert_eq!(
            w.offer_url(" https://x/clip.webm "),
            Admission::Submit("https://x/clip.webm".to_string())
        );
        assert!(!w.view().modal_visible);
        assert!(w.view().controls_disabled);

        let settlement = w.settle(
            SubmissionKind::RegisterUrl,
            Err(SubmitError::Server("too big".to_string())),
        );
        assert_eq!(
            settlement,
            Settlement::Alert("Failed to save video URL: too big".to_string())
        );
        assert_eq!(w.view().result, None);
    }

    #[test]
    fn progress_only_ticks_during_upload() {
        let mut w = widget();
        assert!(!w.tick_progress());

        w.offer_file(Some(&video(1)));
        assert!(w.tick_progress());
        assert_eq!(w.view().progress_status, "Uploading: 5%");
        while w.tick_progress() {}
        assert_eq!(w.view().progress_width, "90%");

        w.settle(SubmissionKind::Upload, Err(SubmitError::Transport("offline".to_string())));
        assert_eq!(w.view().progress_width, "0%");
        assert!(!w.tick_progress());
    }

    #[test]
    fn settling_the_wrong_kind_is_stale() {
        let mut w = widget();
        assert_eq!(w.settle(SubmissionKind::Upload, Ok(result(1))), Settlement::Stale);

        w.offer_url("https://x/a.ogg");
        assert_eq!(w.settle(SubmissionKind::Upload, Ok(result(1))), Settlement::Stale);
        assert!(w.is_busy());
    }

    #[test]
    fn result_panel_shows_video_and_share_link() {
        let uploaded = UploadResult {
            url: "https://cdn.x/v/9.mp4".to_string(),
            title: "Cats & dogs".to_string(),
            share_url: "https://x/s/9".to_string(),
        };
        let panel = ResultPanel::new(&uploaded);
        assert_eq!(panel.video_src, "https://cdn.x/v/9.mp4");
        assert_eq!(panel.share_text, "https://x/s/9");
        assert_ne!(panel.signature, ResultPanel::new(&result(9)).signature);

        assert_eq!(
            ResultPanel::share_href(&uploaded, "btn twitter".split_whitespace()).as_deref(),
            Some("https://twitter.com/intent/tweet?url=https%3A%2F%2Fx%2Fs%2F9&text=Cats%20%26%20dogs")
        );
        assert_eq!(
            ResultPanel::share_href(&uploaded, ["facebook"].into_iter()).as_deref(),
            Some("https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fx%2Fs%2F9")
        );
        assert_eq!(
            ResultPanel::share_href(&uploaded, ["whatsapp"].into_iter()).as_deref(),
            Some("https://wa.me/?text=Cats%20%26%20dogs%20https%3A%2F%2Fx%2Fs%2F9")
        );
        assert_eq!(ResultPanel::share_href(&uploaded, ["copy"].into_iter()), None);
    }

    #[test]
    fn menu_toggle_twice_restores_state() {
        let mut w = widget();
        w.toggle_menu();
        assert!(w.view().menu_open);
        w.toggle_menu();
        assert!(!w.view().menu_open);
    }
}
