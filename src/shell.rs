//! Interactive command loop over a [`Workspace`].

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use pfdata::session::collaborators::{self, ConfirmPrompt, ContentSurface, PathChooser};
use pfdata::session::{Category, CommitOutcome, ExitDecision, Selection, Workspace};

use crate::terminal::Terminal;

/// One shell command line.
#[derive(Parser, Debug)]
#[command(name = "pfdata", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
    /// Open an archive, replacing the current one
    Open {
        /// Archive path; prompts when omitted
        path: Option<PathBuf>,
    },

    /// List catalog entries by category
    Tree {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// List manifest entries matching no category
    Uncategorized,

    /// List blobs no manifest entry points at
    Orphans,

    /// Open a resource, committing the previous one
    Select {
        /// fonts, images, rooms, scripts or sounds
        category: Category,

        /// Display name or full display key
        name: String,
    },

    /// Show the open resource again
    Show,

    /// Edit the open resource in $EDITOR
    Edit,

    /// Replace the edit buffer
    Set {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Write the edit buffer into the archive in memory
    Commit,

    /// Save the archive to its current path
    Save,

    /// Save the archive to a new path
    SaveAs {
        /// Destination; prompts when omitted
        path: Option<PathBuf>,
    },

    /// Write the open resource's bytes to a file
    Export {
        /// Destination; prompts when omitted
        dest: Option<PathBuf>,
    },

    /// Show archive and session status
    Info,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Whether the loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Everything the shell needs from its front end.
pub trait Frontend: PathChooser + ConfirmPrompt + ContentSurface {
    /// Edit `text` externally. `None` leaves the buffer as it was.
    fn edit_text(&mut self, text: &str, extension: &str) -> Result<Option<String>>;
}

impl Frontend for Terminal {
    fn edit_text(&mut self, text: &str, extension: &str) -> Result<Option<String>> {
        self.edit(text, extension)
    }
}

struct Shell<'a, F> {
    workspace: &'a mut Workspace,
    frontend: &'a mut F,
    last: Option<Selection>,
}

/// Read commands from stdin until `quit` or end of input.
pub fn run<F: Frontend>(workspace: &mut Workspace, frontend: &mut F) -> Result<()> {
    let mut shell = Shell {
        workspace,
        frontend,
        last: None,
    };
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}> ", shell.workspace.title());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            if shell.exit()? == Flow::Continue {
                eprintln!("input closed, unsaved changes were not written");
            }
            return Ok(());
        };
        let line = line.context("Failed to read command")?;

        match shell.execute_line(&line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
}

impl<F: Frontend> Shell<'_, F> {
    fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let words = split_words(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        match ShellLine::try_parse_from(&words) {
            Ok(parsed) => {
                debug!(command = ?parsed.command, "shell command");
                self.execute(parsed.command)
            }
            Err(e) => {
                // Help output and usage errors are both printed by clap.
                e.print().context("Failed to print usage")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Open { path } => self.cmd_open(path)?,
            ShellCommand::Tree { json } => self.cmd_tree(json)?,
            ShellCommand::Uncategorized => self.cmd_uncategorized()?,
            ShellCommand::Orphans => self.cmd_orphans()?,
            ShellCommand::Select { category, name } => self.cmd_select(category, &name)?,
            ShellCommand::Show => self.cmd_show()?,
            ShellCommand::Edit => self.cmd_edit()?,
            ShellCommand::Set { text } => {
                self.workspace.set_buffer(text.join(" "))?;
            }
            ShellCommand::Commit => match self.workspace.commit()? {
                CommitOutcome::Written => println!("Committed"),
                CommitOutcome::Unchanged => println!("No changes"),
                CommitOutcome::Skipped => println!("Nothing to commit"),
            },
            ShellCommand::Save => {
                self.workspace.save().context("Failed to save archive")?;
                println!("Saved");
            }
            ShellCommand::SaveAs { path } => self.cmd_save_as(path)?,
            ShellCommand::Export { dest } => self.cmd_export(dest)?,
            ShellCommand::Info => self.cmd_info()?,
            ShellCommand::Quit => return self.exit(),
        }
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> Result<Flow> {
        match self.workspace.request_exit(&mut *self.frontend) {
            Ok(ExitDecision::Exit) => Ok(Flow::Exit),
            Ok(ExitDecision::Stay) => Ok(Flow::Continue),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to save archive, not exiting")),
        }
    }

    fn cmd_open(&mut self, path: Option<PathBuf>) -> Result<()> {
        let catalog = match path {
            Some(path) => Some(
                self.workspace
                    .open_archive(&path)
                    .with_context(|| format!("Failed to open {}", path.display()))?,
            ),
            None => self
                .workspace
                .choose_and_open(&mut *self.frontend)
                .context("Failed to open archive")?,
        };
        if let Some(catalog) = catalog {
            println!(
                "Loaded {} resources ({} uncategorized)",
                catalog.len(),
                catalog.uncategorized().len()
            );
            self.last = None;
        }
        Ok(())
    }

    fn cmd_tree(&self, json: bool) -> Result<()> {
        let catalog = self.loaded()?.catalog();
        if json {
            println!("{}", serde_json::to_string_pretty(catalog)?);
            return Ok(());
        }

        for group in catalog.groups() {
            println!("{} ({})", group.category, group.entries.len());
            for entry in &group.entries {
                println!("  {:<32} {}", entry.display_name, entry.display_key);
            }
        }
        Ok(())
    }

    fn cmd_uncategorized(&self) -> Result<()> {
        let catalog = self.loaded()?.catalog();
        for (display, storage) in catalog.uncategorized() {
            println!("{display} -> {storage}");
        }
        println!("{} uncategorized", catalog.uncategorized().len());
        Ok(())
    }

    fn cmd_orphans(&self) -> Result<()> {
        let loaded = self.loaded()?;
        let orphans = loaded.orphans();
        for key in &orphans {
            let size = loaded.store().get(key).map(<[u8]>::len).unwrap_or(0);
            println!("{key} ({size} bytes)");
        }
        println!("{} orphaned", orphans.len());
        Ok(())
    }

    fn cmd_select(&mut self, category: Category, name: &str) -> Result<()> {
        // A failed select may already have switched the open entry.
        self.last = None;
        let selection = self.workspace.select(category, name)?;
        if selection.opened.committed == CommitOutcome::Written {
            println!("Committed previous resource");
        }
        collaborators::present(
            &mut *self.frontend,
            &selection.opened.preview,
            selection.artifact.as_deref(),
        );
        self.last = Some(selection);
        Ok(())
    }

    fn cmd_show(&mut self) -> Result<()> {
        if let Some(buffer) = self.workspace.session().buffer() {
            self.frontend.show_text(buffer, true);
            return Ok(());
        }
        match &self.last {
            Some(selection) if self.workspace.session().is_open() => {
                collaborators::present(
                    &mut *self.frontend,
                    &selection.opened.preview,
                    selection.artifact.as_deref(),
                );
                Ok(())
            }
            _ => bail!("No resource is selected"),
        }
    }

    fn cmd_edit(&mut self) -> Result<()> {
        let Some(entry) = self.workspace.session().current() else {
            bail!("No resource is selected");
        };
        let extension = match entry.category {
            Category::Rooms => ".json",
            _ => ".py",
        };
        let Some(buffer) = self.workspace.session().buffer() else {
            bail!("{} is read-only", entry.display_key);
        };

        match self.frontend.edit_text(buffer, extension)? {
            Some(text) => {
                self.workspace.set_buffer(text)?;
                println!("Buffer updated");
            }
            None => println!("Edit discarded"),
        }
        Ok(())
    }

    fn cmd_save_as(&mut self, path: Option<PathBuf>) -> Result<()> {
        match path {
            Some(path) => self
                .workspace
                .save_as(&path)
                .with_context(|| format!("Failed to save to {}", path.display()))?,
            None => {
                if !self
                    .workspace
                    .choose_and_save_as(&mut *self.frontend)
                    .context("Failed to save archive")?
                {
                    return Ok(());
                }
            }
        }
        println!("Saved as {}", self.workspace.title());
        Ok(())
    }

    fn cmd_export(&mut self, dest: Option<PathBuf>) -> Result<()> {
        let written = match dest {
            Some(dest) => Some(
                self.workspace
                    .export(&dest)
                    .with_context(|| format!("Failed to export to {}", dest.display()))?,
            ),
            None => self
                .workspace
                .choose_and_export(&mut *self.frontend)
                .context("Failed to export")?,
        };
        if let Some(written) = written {
            println!("Exported {written} bytes");
        }
        Ok(())
    }

    fn cmd_info(&self) -> Result<()> {
        println!("{}", self.workspace.title());
        let Some(loaded) = self.workspace.archive() else {
            println!("No archive loaded");
            return Ok(());
        };

        let store = loaded.store();
        println!("Path:        {}", loaded.path().display());
        println!("Entries:     {}", store.len());
        println!("Manifest:    {} display keys", store.manifest().len());
        println!("Categorized: {}", loaded.catalog().len());
        println!("Unsaved:     {}", self.workspace.has_unsaved_changes());
        if let Some(entry) = self.workspace.session().current() {
            let mode = if self.workspace.session().is_editable() {
                "editable"
            } else {
                "read-only"
            };
            println!("Selected:    {} ({mode})", entry.display_key);
        }
        println!("Previews:    {}", self.workspace.artifacts().dir().display());
        Ok(())
    }

    fn loaded(&self) -> Result<&pfdata::session::LoadedArchive> {
        self.workspace
            .archive()
            .context("No archive is open, use `open <path>`")
    }
}

/// Split a command line into words.
///
/// Single and double quotes group words; a backslash escapes the next
/// character outside single quotes.
fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                in_word = true;
                match chars.next() {
                    Some('n') => current.push('\n'),
                    Some(next) => current.push(next),
                    None => bail!("Trailing backslash"),
                }
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                in_word = true;
                quote = Some(c);
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if quote.is_some() {
        bail!("Unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
