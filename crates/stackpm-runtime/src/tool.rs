use crate::RuntimeError;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

/// External tool that materializes a project's dependencies.
pub trait BuildTool: Send + Sync {
    fn name(&self) -> &str;

    fn available(&self) -> bool;

    /// Build only the dependencies of the project rooted at `project_root`.
    /// Output goes straight to the user's terminal.
    fn install_dependencies(&self, project_root: &Path) -> Result<(), RuntimeError>;
}

/// Runs the `stack` executable.
#[derive(Debug, Clone)]
pub struct StackTool {
    program: String,
}

impl Default for StackTool {
    fn default() -> Self {
        Self {
            program: "stack".to_owned(),
        }
    }
}

impl StackTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable, e.g. an absolute path to `stack`.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_owned(),
        }
    }

    pub fn install_args() -> [&'static str; 2] {
        ["build", "--dependencies-only"]
    }
}

impl BuildTool for StackTool {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn available(&self) -> bool {
        Command::new(&self.program)
            .arg("--numeric-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn install_dependencies(&self, project_root: &Path) -> Result<(), RuntimeError> {
        tracing::info!(
            "running {} {} in {}",
            self.program,
            Self::install_args().join(" "),
            project_root.display()
        );
        let status = Command::new(&self.program)
            .args(Self::install_args())
            .current_dir(project_root)
            .status()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => RuntimeError::ToolUnavailable(self.program.clone()),
                _ => RuntimeError::Io(e),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(RuntimeError::ExecFailed(format!(
                "{} {} exited with {status}",
                self.program,
                Self::install_args().join(" ")
            )))
        }
    }
}

impl<T: BuildTool + ?Sized> BuildTool for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn available(&self) -> bool {
        (**self).available()
    }

    fn install_dependencies(&self, project_root: &Path) -> Result<(), RuntimeError> {
        (**self).install_dependencies(project_root)
    }
}

pub fn select_tool(name: &str) -> Result<Box<dyn BuildTool>, RuntimeError> {
    match name {
        "stack" => Ok(Box::new(StackTool::new())),
        "mock" => Ok(Box::new(crate::mock::MockTool::new())),
        other => Err(RuntimeError::ToolUnavailable(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_valid_tools() {
        assert_eq!(select_tool("stack").unwrap().name(), "stack");
        assert_eq!(select_tool("mock").unwrap().name(), "mock");
    }

    #[test]
    fn select_invalid_tool_fails() {
        assert!(matches!(
            select_tool("cabal-install"),
            Err(RuntimeError::ToolUnavailable(_))
        ));
    }

    #[test]
    fn install_args_request_dependencies_only() {
        assert_eq!(StackTool::install_args(), ["build", "--dependencies-only"]);
    }

    #[test]
    fn missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let tool = StackTool::with_program("stackpm-definitely-not-installed");
        assert!(!tool.available());
        assert!(matches!(
            tool.install_dependencies(dir.path()),
            Err(RuntimeError::ToolUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_exec_failure() {
        let dir = tempfile::tempdir().unwrap();
        let tool = StackTool::with_program("false");
        let err = tool.install_dependencies(dir.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::ExecFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StackTool::with_program("true")
            .install_dependencies(dir.path())
            .is_ok());
    }
}
