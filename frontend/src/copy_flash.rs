pub const COPY_FLASH_MS: u32 = 2000;
pub const COPIED_MARKUP: &str = r#"<i class="fas fa-check"></i> Copied!"#;
pub const COPY_FAILED_MARKUP: &str = r#"<i class="fas fa-times"></i> Copy failed"#;

/// Temporary relabelling of the copy button.
///
/// Each flash gets a generation number; only the timeout belonging to the
/// latest flash restores the label, so rapid clicks keep the confirmation up
/// for the full duration and never record flash markup as the original.
#[derive(Debug, Default)]
pub struct CopyFlash {
    original: Option<String>,
    generation: u64,
}

impl CopyFlash {
    /// Returns the markup to show and the generation to pass to `finish`.
    pub fn begin(&mut self, current_markup: &str, copied: bool) -> (&'static str, u64) {
        if self.original.is_none() {
            self.original = Some(current_markup.to_string());
        }
        self.generation += 1;
        let markup = if copied {
            COPIED_MARKUP
        } else {
            COPY_FAILED_MARKUP
        };
        (markup, self.generation)
    }

    /// Markup to restore, if `generation` is still the latest flash.
    pub fn finish(&mut self, generation: u64) -> Option<String> {
        if generation != self.generation {
            return None;
        }
        self.original.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = r#"<i class="fas fa-copy"></i> <span>Copy link</span>"#;

    #[test]
    fn flash_lasts_two_seconds() {
        assert_eq!(COPY_FLASH_MS, 2000);
        assert!(COPIED_MARKUP.ends_with("Copied!"));
    }

    #[test]
    fn restores_exact_original_markup() {
        let mut flash = CopyFlash::default();
        let (markup, generation) = flash.begin(ORIGINAL, true);
        assert_eq!(markup, COPIED_MARKUP);
        assert_eq!(flash.finish(generation).as_deref(), Some(ORIGINAL));
        assert_eq!(flash.finish(generation), None);
    }

    #[test]
    fn overlapping_clicks_keep_first_original() {
        let mut flash = CopyFlash::default();
        let (_, first) = flash.begin(ORIGINAL, true);
        let (_, second) = flash.begin(COPIED_MARKUP, true);

        assert_eq!(flash.finish(first), None);
        assert_eq!(flash.finish(second).as_deref(), Some(ORIGINAL));
    }

    #[test]
    fn clipboard_failure_shows_failure_markup() {
        let mut flash = CopyFlash::default();
        let (markup, generation) = flash.begin(ORIGINAL, false);
        assert_eq!(markup, COPY_FAILED_MARKUP);
        assert_eq!(flash.finish(generation).as_deref(), Some(ORIGINAL));
    }
}
