//! Terminal front end: dialoguer prompts and plain stdout rendering.

use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Editor, Input, Select};

use pfdata::session::collaborators::{ConfirmPrompt, Confirmation, ContentSurface, PathChooser};
use pfdata::session::{Content, Preview};

const HEX_BYTES_PER_LINE: usize = 16;

/// Interactive terminal implementing every workspace collaborator.
#[derive(Default)]
pub struct Terminal {
    theme: ColorfulTheme,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `text` in `$EDITOR`. `None` if the editor was closed without saving.
    pub fn edit(&self, text: &str, extension: &str) -> anyhow::Result<Option<String>> {
        Ok(Editor::new().extension(extension).edit(text)?)
    }

    fn ask_path(&self, prompt: &str, initial: Option<&Path>) -> Option<PathBuf> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(initial) = initial {
            input = input.with_initial_text(initial.display().to_string());
        }

        match input.interact_text() {
            Ok(answer) if !answer.trim().is_empty() => Some(PathBuf::from(answer.trim())),
            _ => None,
        }
    }
}

impl PathChooser for Terminal {
    fn choose_open(&mut self) -> Option<PathBuf> {
        self.ask_path("Archive to open", None)
    }

    fn choose_save(&mut self, suggested: Option<&Path>) -> Option<PathBuf> {
        self.ask_path("Save to", suggested)
    }
}

impl ConfirmPrompt for Terminal {
    fn confirm_save_changes(&mut self) -> Confirmation {
        let items = &[
            "Yes - save and exit",
            "No - exit without saving",
            "Cancel - keep working",
        ];

        let selection = Select::with_theme(&self.theme)
            .with_prompt("You have unsaved changes. Save before exiting?")
            .items(items)
            .default(0)
            .interact_opt();

        match selection {
            Ok(Some(0)) => Confirmation::Yes,
            Ok(Some(1)) => Confirmation::No,
            // Escape, a closed terminal and "Cancel" all keep the session.
            _ => Confirmation::Cancel,
        }
    }
}

impl ContentSurface for Terminal {
    fn show_text(&mut self, text: &str, editable: bool) {
        if editable {
            println!("--- editable, use `edit` or `set` ---");
        }
        println!("{text}");
    }

    fn show_hex(&mut self, hex: &str) {
        print!("{}", format_hex_dump(hex));
    }

    fn show_media(&mut self, preview: &Preview, artifact: Option<&Path>) {
        let (label, size) = match preview {
            Preview::Font(bytes) => ("font", bytes.len()),
            Preview::Content(Content::Image(bytes)) => ("image", bytes.len()),
            Preview::Content(Content::Audio(bytes)) => ("audio", bytes.len()),
            Preview::Editable(text) | Preview::Content(Content::Text(text)) => ("text", text.len()),
            Preview::Content(Content::Binary { hex }) => ("binary", hex.len() / 2),
        };
        match artifact {
            Some(path) => println!("[{label}, {size} bytes] {}", path.display()),
            None => println!("[{label}, {size} bytes]"),
        }
    }
}

/// Lay out a hex string as offset-prefixed rows of 16 bytes.
pub fn format_hex_dump(hex: &str) -> String {
    let mut out = String::with_capacity(hex.len() * 2);
    for (row, chunk) in hex.as_bytes().chunks(HEX_BYTES_PER_LINE * 2).enumerate() {
        out.push_str(&format!("{:08x} ", row * HEX_BYTES_PER_LINE));
        for pair in chunk.chunks(2) {
            out.push(' ');
            out.extend(pair.iter().map(|&b| b as char));
        }
        out.push('\n');
    }
    out
}
