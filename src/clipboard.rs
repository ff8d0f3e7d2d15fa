use crate::env::Environment;
use anyhow::{Context, Result, anyhow, bail};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::rc::Rc;
use tracing::debug;

/// Destination for the finished token.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Clipboard programs tried in order when no override is configured.
///
/// Each entry is `(program, args, required variable)`; an entry is skipped when
/// its required variable is unset or empty.
const CANDIDATES: &[(&str, &[&str], Option<&str>)] = &[
    ("pbcopy", &[], None),
    ("wl-copy", &[], Some("WAYLAND_DISPLAY")),
    ("xclip", &["-selection", "clipboard"], None),
    ("xsel", &["--clipboard", "--input"], None),
    ("clip.exe", &[], None),
];

/// Clipboard backed by an external program that reads the text from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemClipboard {
    program: PathBuf,
    args: Vec<String>,
}

impl SystemClipboard {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Pick a clipboard program.
    ///
    /// `command` is a whitespace-separated command line (program and arguments)
    /// that overrides detection. Without it the first [`CANDIDATES`] entry found
    /// on `PATH` wins.
    pub fn detect(env: &Environment, command: Option<&str>) -> Result<Self> {
        let search_paths = env.get_var("PATH").unwrap_or_default();

        if let Some(command) = command {
            let mut words = command.split_whitespace();
            let program = words
                .next()
                .ok_or_else(|| anyhow!("clipboard command is empty"))?;
            let resolved = resolve_program(search_paths, program)
                .ok_or_else(|| anyhow!("clipboard command not found: {}", program))?;
            return Ok(Self::new(
                resolved,
                words.map(str::to_string).collect(),
            ));
        }

        for (program, args, needs) in CANDIDATES {
            if needs.is_some_and(|var| env.get_non_empty(var).is_none()) {
                continue;
            }
            if let Some(path) = resolve_program(search_paths, program) {
                debug!(program, path = %path.display(), "clipboard program detected");
                return Ok(Self::new(
                    path,
                    args.iter().map(|a| a.to_string()).collect(),
                ));
            }
        }

        let tried: Vec<&str> = CANDIDATES.iter().map(|(program, _, _)| *program).collect();
        bail!(
            "no clipboard program found on PATH (tried {}); pass --clipboard to choose one",
            tried.join(", ")
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("failed to write to {}", self.program.display()))?;
        }

        let status = child.wait()?;
        if !status.success() {
            bail!("{} exited with {}", self.program.display(), status);
        }
        debug!(program = %self.program.display(), bytes = text.len(), "copied to clipboard");
        Ok(())
    }
}

/// In-memory clipboard that keeps every copied string.
#[derive(Debug, Clone, Default)]
pub struct MemClipboard {
    copies: Rc<RefCell<Vec<String>>>,
}

impl MemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create a clipboard and return (clipboard, handle to its copies).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<String>>>) {
        let clipboard = MemClipboard::new();
        let copies = clipboard.copies.clone();
        (clipboard, copies)
    }
}

impl ClipboardSink for MemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.copies.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Locate a clipboard program.
///
/// A program given with a directory part is used as is when the file exists;
/// a bare name is looked up in the `PATH` directories.
fn resolve_program(search_paths: &str, program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.is_absolute() || path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = std::env::temp_dir().join(format!(
            "jwt_cli_clipboard_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn env_with_path(dir: &Path) -> Environment {
        let mut env = Environment::default();
        env.set_var("PATH", dir.to_string_lossy());
        env
    }

    fn touch(dir: &Path, name: &str) {
        fs::File::create(dir.join(name)).expect("touch");
    }

    #[test]
    fn test_detect_prefers_earlier_candidates() {
        let dir = make_unique_temp_dir("order");
        touch(&dir, "xsel");
        touch(&dir, "xclip");

        let clipboard = SystemClipboard::detect(&env_with_path(&dir), None).unwrap();

        assert_eq!(clipboard.program(), dir.join("xclip"));
        assert_eq!(clipboard.args(), ["-selection", "clipboard"]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_detect_wl_copy_needs_wayland_display() {
        let dir = make_unique_temp_dir("wayland");
        touch(&dir, "wl-copy");
        touch(&dir, "xclip");

        let mut env = env_with_path(&dir);
        let clipboard = SystemClipboard::detect(&env, None).unwrap();
        assert_eq!(clipboard.program(), dir.join("xclip"));

        env.set_var("WAYLAND_DISPLAY", "wayland-0");
        let clipboard = SystemClipboard::detect(&env, None).unwrap();
        assert_eq!(clipboard.program(), dir.join("wl-copy"));
        assert!(clipboard.args().is_empty());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_detect_override_with_arguments() {
        let dir = make_unique_temp_dir("override");
        touch(&dir, "mycopy");
        touch(&dir, "pbcopy");

        let clipboard =
            SystemClipboard::detect(&env_with_path(&dir), Some("mycopy --primary  -n")).unwrap();

        assert_eq!(clipboard.program(), dir.join("mycopy"));
        assert_eq!(clipboard.args(), ["--primary", "-n"]);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_detect_errors() {
        let dir = make_unique_temp_dir("empty");
        let env = env_with_path(&dir);

        let err = SystemClipboard::detect(&env, None).unwrap_err();
        assert!(err.to_string().contains("no clipboard program found"));

        let err = SystemClipboard::detect(&env, Some("   ")).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let err = SystemClipboard::detect(&env, Some("missing-copy")).unwrap_err();
        assert!(err.to_string().contains("missing-copy"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn test_system_clipboard_pipes_text_to_program() {
        let dir = make_unique_temp_dir("pipe");
        let target = dir.join("clipboard.txt");
        let mut clipboard = SystemClipboard::new(
            "/bin/sh",
            vec!["-c".to_string(), format!("cat > '{}'", target.display())],
        );

        clipboard.copy("header.claims.").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "header.claims.");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    #[cfg(unix)]
    fn test_system_clipboard_reports_failure() {
        let mut clipboard =
            SystemClipboard::new("/bin/sh", vec!["-c".to_string(), "cat > /dev/null; exit 3".to_string()]);

        let err = clipboard.copy("token").unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn test_mem_clipboard_records_copies() {
        let (mut clipboard, copies) = MemClipboard::with_handle();
        clipboard.copy("one").unwrap();
        clipboard.copy("two").unwrap();

        assert_eq!(*copies.borrow(), vec!["one", "two"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_program_by_path_or_name() {
        let dir = make_unique_temp_dir("resolve");
        touch(&dir, "mycopy");
        let search_paths = dir.to_string_lossy().to_string();

        assert_eq!(resolve_program(&search_paths, "mycopy"), Some(dir.join("mycopy")));
        assert_eq!(resolve_program("/nonexistent", "/bin/sh"), Some(PathBuf::from("/bin/sh")));
        assert_eq!(resolve_program(&search_paths, "/bin/nonexisting"), None);
        assert_eq!(resolve_program(&search_paths, "missing"), None);
        assert_eq!(resolve_program(&search_paths, ""), None);
        let _ = fs::remove_dir_all(dir);
    }
}
