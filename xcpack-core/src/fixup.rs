//! Dynamic library identity fix-ups
//!
//! Every embedded `.dylib` needs its install name rewritten to
//! `@rpath/<name>` so the app can load it from the Frameworks folder.
//! Failures here are reported as [`FixupWarning`]s and never stop packaging.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::FixupWarning;

/// Default binary identity rewrite tool
pub const DEFAULT_FIXUP_TOOL: &str = "install_name_tool";

/// One queued `install_name_tool -id` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupCommand {
    pub tool: String,
    pub library_name: String,
    pub library_path: PathBuf,
}

impl FixupCommand {
    pub fn new(tool: &str, library_name: &str, library_path: &Path) -> Self {
        Self {
            tool: tool.to_string(),
            library_name: library_name.to_string(),
            library_path: library_path.to_path_buf(),
        }
    }

    /// The install name the library will carry
    pub fn install_name(&self) -> String {
        format!("@rpath/{}", self.library_name)
    }

    /// Argument vector passed to the tool
    pub fn args(&self) -> Vec<String> {
        vec![
            "-id".to_string(),
            self.install_name(),
            self.library_path.to_string_lossy().into_owned(),
        ]
    }
}

impl fmt::Display for FixupCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -id \"{}\" \"{}\"",
            self.tool,
            self.install_name(),
            self.library_path.display()
        )
    }
}

/// Runs fix-up commands. Implementations block until the command finishes.
pub trait FixupRunner {
    fn run(&mut self, command: &FixupCommand) -> Result<(), FixupWarning>;
}

/// Runs the tool as a child process
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessFixupRunner;

impl FixupRunner for ProcessFixupRunner {
    fn run(&mut self, command: &FixupCommand) -> Result<(), FixupWarning> {
        let warning = |reason: String| FixupWarning {
            tool: command.tool.clone(),
            library: command.library_name.clone(),
            reason,
        };

        let status = Command::new(&command.tool)
            .args(command.args())
            .status()
            .map_err(|e| warning(format!("failed to start: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(warning(match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }))
        }
    }
}

/// Run every command in order, returning the warnings collected
pub fn run_all(runner: &mut dyn FixupRunner, commands: &[FixupCommand]) -> Vec<FixupWarning> {
    let mut warnings = Vec::new();
    for command in commands {
        tracing::debug!("Running {}", command);
        if let Err(warning) = runner.run(command) {
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedRunner {
        fail_on: &'static str,
        seen: Vec<String>,
    }

    impl FixupRunner for ScriptedRunner {
        fn run(&mut self, command: &FixupCommand) -> Result<(), FixupWarning> {
            self.seen.push(command.library_name.clone());
            if command.library_name == self.fail_on {
                return Err(FixupWarning {
                    tool: command.tool.clone(),
                    library: command.library_name.clone(),
                    reason: "exit code 1".to_string(),
                });
            }
            Ok(())
        }
    }

    #[test]
    fn test_command_line() {
        let command = FixupCommand::new(
            DEFAULT_FIXUP_TOOL,
            "libmonosgen-2.0.dylib",
            Path::new("/out/FlaxGame/Data/Dotnet/libmonosgen-2.0.dylib"),
        );
        assert_eq!(
            command.args(),
            vec![
                "-id",
                "@rpath/libmonosgen-2.0.dylib",
                "/out/FlaxGame/Data/Dotnet/libmonosgen-2.0.dylib"
            ]
        );
        assert_eq!(
            command.to_string(),
            "install_name_tool -id \"@rpath/libmonosgen-2.0.dylib\" \"/out/FlaxGame/Data/Dotnet/libmonosgen-2.0.dylib\""
        );
    }

    #[test]
    fn test_run_all_continues_after_failure() {
        let commands = vec![
            FixupCommand::new("tool", "a.dylib", Path::new("/a.dylib")),
            FixupCommand::new("tool", "b.dylib", Path::new("/b.dylib")),
            FixupCommand::new("tool", "c.dylib", Path::new("/c.dylib")),
        ];
        let mut runner = ScriptedRunner {
            fail_on: "b.dylib",
            seen: Vec::new(),
        };

        let warnings = run_all(&mut runner, &commands);

        assert_eq!(runner.seen, vec!["a.dylib", "b.dylib", "c.dylib"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].library, "b.dylib");
    }

    #[test]
    fn test_missing_tool_is_a_warning() {
        let command = FixupCommand::new(
            "xcpack-no-such-tool",
            "a.dylib",
            Path::new("/nonexistent/a.dylib"),
        );
        let warning = ProcessFixupRunner.run(&command).unwrap_err();
        assert!(warning.reason.starts_with("failed to start"));
    }
}
