use crate::clipboard::ClipboardSink;
use crate::collector::{Collector, Step};
use crate::io_adapters::LineSource;
use crate::payload::Payload;
use crate::token::TokenEncoder;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{info, warn};

pub const BANNER: &str = "Starting with JWT token generation";
pub const COPIED: &str = "The JWT has been copied to your clipboard!";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user finished; the token was encoded and copied.
    Copied(String),
    /// Input ran out before the user finished. Nothing was encoded.
    Aborted,
}

/// Drives a [`Collector`] with a line source, a token encoder and a clipboard.
///
/// Example
/// ```
/// use jwt_cli::Session;
/// use jwt_cli::clipboard::MemClipboard;
/// use jwt_cli::io_adapters::MemLines;
/// use jwt_cli::token::UnsecuredJwt;
///
/// let lines = MemLines::new("user_key\nfoo\nemail\nfoo@bar.com\nn\n");
/// let (clipboard, copies) = MemClipboard::with_handle();
/// let mut session = Session::new(Box::new(lines), Box::new(UnsecuredJwt), Box::new(clipboard));
///
/// let mut out = Vec::new();
/// session.run(&mut out).unwrap();
/// assert_eq!(copies.borrow().len(), 1);
/// ```
pub struct Session {
    lines: Box<dyn LineSource>,
    encoder: Box<dyn TokenEncoder>,
    clipboard: Box<dyn ClipboardSink>,
    print_token: bool,
}

impl Session {
    pub fn new(
        lines: Box<dyn LineSource>,
        encoder: Box<dyn TokenEncoder>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            lines,
            encoder,
            clipboard,
            print_token: false,
        }
    }

    /// Also write the token to the output after copying it.
    pub fn print_token(mut self, yes: bool) -> Self {
        self.print_token = yes;
        self
    }

    /// Show the banner and the first key prompt, returning a fresh collector.
    pub fn start(&self, out: &mut dyn Write) -> Result<Collector> {
        let collector = Collector::new();
        writeln!(out, "{BANNER}")?;
        writeln!(out, "{}", collector.first_prompt())?;
        Ok(collector)
    }

    /// Run the prompt loop until the user finishes or the input runs out.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<Outcome> {
        let mut collector = self.start(out)?;
        loop {
            out.flush()?;
            let Some(line) = self.lines.next_line()? else {
                warn!(
                    claims = collector.payload().len(),
                    "input ended before the token was generated"
                );
                return Ok(Outcome::Aborted);
            };

            match collector.step(&line) {
                Step::Next {
                    collector: next,
                    reply,
                } => {
                    writeln!(out, "{reply}")?;
                    collector = next;
                }
                Step::Finish(payload) => return self.finish(&payload, out),
            }
        }
    }

    fn finish(&mut self, payload: &Payload, out: &mut dyn Write) -> Result<Outcome> {
        let token = self
            .encoder
            .encode(payload)
            .context("failed to encode the JWT")?;
        self.clipboard
            .copy(&token)
            .context("failed to copy the JWT to the clipboard")?;
        info!(claims = payload.len(), "JWT copied to clipboard");

        if self.print_token {
            writeln!(out, "{token}")?;
        }
        writeln!(out, "{COPIED}")?;
        out.flush()?;
        Ok(Outcome::Copied(token))
    }
}
