/// Current image selection and caption state
///
/// A `Session` tracks exactly two things: the path of the selected image and
/// the caption produced for it. Selecting a new image always discards the
/// previous caption; nothing is accumulated across display cycles.
use std::path::{Path, PathBuf};

use crate::caption::Captioner;
use crate::config::CancelPolicy;

/// Warning shown when captioning is triggered with nothing selected
pub const NO_IMAGE_WARNING: &str = "⚠️ Please upload an image first.";

/// Prefix of the output area once a caption arrives
pub const CAPTION_PREFIX: &str = "🧠 Caption: ";

/// Where the session is in the select-then-caption cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No image selected yet
    Idle,
    /// An image is selected but not captioned
    ImageLoaded,
    /// The selected image has a caption
    Captioned,
}

/// The selected image and its caption, if any
#[derive(Debug, Default)]
pub struct Session {
    image_path: Option<PathBuf>,
    caption: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the currently selected image
    pub fn selected_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn stage(&self) -> Stage {
        match (&self.image_path, &self.caption) {
            (None, _) => Stage::Idle,
            (Some(_), None) => Stage::ImageLoaded,
            (Some(_), Some(_)) => Stage::Captioned,
        }
    }

    /// Record a new selection, discarding any caption from a previous image
    pub fn select(&mut self, path: PathBuf) {
        self.image_path = Some(path);
        self.caption = None;
    }

    /// Drop the selection and caption entirely
    pub fn clear(&mut self) {
        self.image_path = None;
        self.caption = None;
    }

    /// Apply the configured behavior for a cancelled file dialog
    pub fn dialog_cancelled(&mut self, policy: CancelPolicy) {
        match policy {
            CancelPolicy::KeepCurrent => {}
            CancelPolicy::ClearSelection => self.clear(),
        }
    }

    /// Run the caption step and return the text for the output area.
    ///
    /// The generator is only invoked when an image is selected; with nothing
    /// selected the warning string comes back and `captioner` is untouched.
    /// A generation failure leaves the session un-captioned and reports the
    /// reason instead of propagating.
    pub fn request_caption(&mut self, captioner: &mut dyn Captioner) -> String {
        let path = match &self.image_path {
            Some(path) => path,
            None => return NO_IMAGE_WARNING.to_string(),
        };

        match captioner.caption(path) {
            Ok(caption) => {
                let output = format!("{CAPTION_PREFIX}{caption}");
                self.caption = Some(caption);
                output
            }
            Err(e) => format!("❌ Caption generation failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionError;

    /// Scripted generator that counts how often it is invoked
    struct SpyCaptioner {
        calls: usize,
        fail: bool,
    }

    impl SpyCaptioner {
        fn new() -> Self {
            Self {
                calls: 0,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: 0,
                fail: true,
            }
        }
    }

    impl Captioner for SpyCaptioner {
        fn caption(&mut self, _path: &Path) -> Result<String, CaptionError> {
            self.calls += 1;
            if self.fail {
                Err(CaptionError::Tokenizer("scripted failure".into()))
            } else {
                Ok("a cat sitting on a window sill".to_string())
            }
        }
    }

    #[test]
    fn test_starts_idle() {
        let session = Session::new();
        assert_eq!(session.stage(), Stage::Idle);
        assert!(session.selected_path().is_none());
    }

    #[test]
    fn test_caption_without_selection_warns_and_skips_generator() {
        let mut session = Session::new();
        let mut spy = SpyCaptioner::new();

        let output = session.request_caption(&mut spy);

        assert_eq!(output, NO_IMAGE_WARNING);
        assert_eq!(spy.calls, 0);
        assert_eq!(session.stage(), Stage::Idle);
    }

    #[test]
    fn test_caption_after_selection_invokes_generator_once() {
        let mut session = Session::new();
        session.select(PathBuf::from("photo.png"));
        assert_eq!(session.stage(), Stage::ImageLoaded);

        let mut spy = SpyCaptioner::new();
        let output = session.request_caption(&mut spy);

        assert_eq!(spy.calls, 1);
        assert_eq!(output, format!("{CAPTION_PREFIX}a cat sitting on a window sill"));
        assert_eq!(session.stage(), Stage::Captioned);
    }

    #[test]
    fn test_reselection_discards_previous_caption() {
        let mut session = Session::new();
        session.select(PathBuf::from("first.png"));
        session.request_caption(&mut SpyCaptioner::new());
        assert_eq!(session.stage(), Stage::Captioned);

        session.select(PathBuf::from("second.jpg"));

        assert_eq!(session.stage(), Stage::ImageLoaded);
        assert_eq!(session.selected_path(), Some(Path::new("second.jpg")));
    }

    #[test]
    fn test_generation_failure_reports_and_stays_uncaptioned() {
        let mut session = Session::new();
        session.select(PathBuf::from("photo.png"));

        let mut spy = SpyCaptioner::failing();
        let output = session.request_caption(&mut spy);

        assert_eq!(spy.calls, 1);
        assert!(output.starts_with("❌"));
        assert_eq!(session.stage(), Stage::ImageLoaded);
    }

    #[test]
    fn test_cancel_keep_current_leaves_selection() {
        let mut session = Session::new();
        session.select(PathBuf::from("photo.png"));

        session.dialog_cancelled(CancelPolicy::KeepCurrent);

        assert_eq!(session.selected_path(), Some(Path::new("photo.png")));
    }

    #[test]
    fn test_cancel_clear_selection_resets_to_idle() {
        let mut session = Session::new();
        session.select(PathBuf::from("photo.png"));
        session.request_caption(&mut SpyCaptioner::new());

        session.dialog_cancelled(CancelPolicy::ClearSelection);

        assert_eq!(session.stage(), Stage::Idle);
        assert!(session.selected_path().is_none());
    }
}
