//! Shell command execution for hooks.
//!
//! ```ignore
//! let output = run_shell("ls -la", root, &vars)?;
//! println!("{}", combined_output(&output));
//! ```

use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result, bail};

/// `sh -c <line>` on unix, `cmd /C <line>` on windows.
fn shell(line: &str) -> Command {
    let (program, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
    let mut cmd = Command::new(program);
    cmd.arg(flag).arg(line);
    cmd
}

/// Run a command line through the platform shell in `cwd` with extra
/// environment variables. Stdin is closed.
///
/// A non-zero exit status is an error carrying the command's output.
pub fn run_shell<I, K, V>(line: &str, cwd: &Path, vars: I) -> Result<Output>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut cmd = shell(line);
    cmd.current_dir(cwd).stdin(Stdio::null());
    for (key, value) in vars {
        cmd.env(key.as_ref(), value.as_ref());
    }

    let output = cmd
        .output()
        .with_context(|| format!("Failed to execute `{line}`"))?;
    if !output.status.success() {
        bail!(
            "`{line}` exited with {}\n{}",
            output.status,
            combined_output(&output).trim()
        );
    }
    Ok(output)
}

/// Stdout followed by stderr, lossily decoded.
pub fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_and_env() {
        let output = run_shell(
            "echo \"$GREETING\"; echo oops >&2",
            Path::new("."),
            [("GREETING", "hello")],
        )
        .unwrap();
        assert_eq!(combined_output(&output), "hello\noops\n");
    }

    #[test]
    fn test_cwd() {
        let dir = TempDir::new().unwrap();
        let output = run_shell("pwd", dir.path(), [("", ""); 0]).unwrap();
        let printed = String::from_utf8_lossy(&output.stdout);
        let name = dir.path().file_name().unwrap().to_string_lossy();
        assert!(printed.trim().ends_with(name.as_ref()));
    }

    #[test]
    fn test_failure_carries_output() {
        let err = run_shell("echo broken; exit 3", Path::new("."), [("", ""); 0]).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("exited with"));
        assert!(message.contains("broken"));
    }

    #[test]
    fn test_stdin_closed() {
        // `cat` would block on an inherited terminal
        let output = run_shell("cat", Path::new("."), [("", ""); 0]).unwrap();
        assert!(output.stdout.is_empty());
    }
}
