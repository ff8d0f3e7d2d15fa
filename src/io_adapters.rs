use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::VecDeque;
use tracing::debug;

/// Source of input lines for a session.
///
/// `Ok(None)` means the input is exhausted (end of file or interrupt).
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Line editor on the controlling terminal, with in-session history.
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        // Prompts are printed by the session, so the editor prompt stays empty.
        match self.editor.readline("") {
            Ok(line) => {
                if !line.is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => {
                debug!("input interrupted");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                debug!("end of input");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Memory-backed line source.
///
/// Public so scripted sessions can be built from other modules and tests.
pub struct MemLines {
    lines: VecDeque<String>,
}

impl MemLines {
    /// Split `input` into lines, dropping `\n` / `\r\n` terminators only.
    pub fn new(input: &str) -> Self {
        Self {
            lines: input.lines().map(str::to_string).collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for MemLines {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for MemLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
