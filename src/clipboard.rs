use std::io::Write;
use std::process::{Command, Stdio};

const TOOLS: [(&str, &[&str]); 3] = [
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

/// Pipe text to the platform copy tool. Best effort: the first tool that
/// spawns wins, and a missing tool is silently skipped.
pub fn copy(text: &str) {
    for (tool, args) in TOOLS {
        if let Ok(mut child) = Command::new(tool).args(args).stdin(Stdio::piped()).spawn() {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            return;
        }
    }
}
