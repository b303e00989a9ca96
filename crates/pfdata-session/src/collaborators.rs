//! Seams to the front end.
//!
//! The workspace never talks to a terminal or window directly; it asks these
//! traits for paths and confirmations and hands them content to render.

use std::path::{Path, PathBuf};

use crate::session::Preview;
use crate::sniff::Content;

/// Answer to "save changes before exiting?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Picks files. `None` means the user backed out.
pub trait PathChooser {
    fn choose_open(&mut self) -> Option<PathBuf>;

    fn choose_save(&mut self, suggested: Option<&Path>) -> Option<PathBuf>;
}

/// Asks whether unsaved changes should be written.
pub trait ConfirmPrompt {
    fn confirm_save_changes(&mut self) -> Confirmation;
}

/// Renders a selected resource.
pub trait ContentSurface {
    /// Show text; `editable` is set when the text is an edit buffer.
    fn show_text(&mut self, text: &str, editable: bool);

    /// Show a hex dump of undecodable bytes.
    fn show_hex(&mut self, hex: &str);

    /// Hand image, audio or font content to a media renderer.
    ///
    /// `artifact` is the materialized file for renderers that need a path.
    fn show_media(&mut self, preview: &Preview, artifact: Option<&Path>);
}

/// Dispatch a preview to the matching surface method.
pub fn present(surface: &mut dyn ContentSurface, preview: &Preview, artifact: Option<&Path>) {
    match preview {
        Preview::Content(Content::Text(text)) => surface.show_text(text, false),
        Preview::Editable(text) => surface.show_text(text, true),
        Preview::Content(Content::Binary { hex }) => surface.show_hex(hex),
        Preview::Content(Content::Image(_) | Content::Audio(_)) | Preview::Font(_) => {
            surface.show_media(preview, artifact)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl ContentSurface for Recorder {
        fn show_text(&mut self, text: &str, editable: bool) {
            self.0.push(format!("text:{editable}:{text}"));
        }

        fn show_hex(&mut self, hex: &str) {
            self.0.push(format!("hex:{hex}"));
        }

        fn show_media(&mut self, _preview: &Preview, artifact: Option<&Path>) {
            self.0.push(format!("media:{}", artifact.is_some()));
        }
    }

    #[test]
    fn test_present_dispatch() {
        let mut surface = Recorder::default();
        let artifact = PathBuf::from("/tmp/font-1.ttf");

        present(&mut surface, &Preview::Editable("x = 1".into()), None);
        present(&mut surface, &Preview::Content(Content::Text("{}".into())), None);
        present(
            &mut surface,
            &Preview::Content(Content::Binary { hex: "ff".into() }),
            None,
        );
        present(&mut surface, &Preview::Font(vec![0, 1]), Some(&artifact));

        assert_eq!(
            surface.0,
            vec!["text:true:x = 1", "text:false:{}", "hex:ff", "media:true"]
        );
    }
}
