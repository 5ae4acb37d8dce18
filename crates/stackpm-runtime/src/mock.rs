use crate::tool::BuildTool;
use crate::RuntimeError;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Build tool that records the projects it was asked to install instead of
/// running anything.
#[derive(Debug, Default)]
pub struct MockTool {
    installs: Mutex<Vec<PathBuf>>,
}

impl MockTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installs(&self) -> Vec<PathBuf> {
        self.installs
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl BuildTool for MockTool {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn available(&self) -> bool {
        true
    }

    fn install_dependencies(&self, project_root: &Path) -> Result<(), RuntimeError> {
        let mut installs = self
            .installs
            .lock()
            .map_err(|e| RuntimeError::ExecFailed(format!("mutex poisoned: {e}")))?;
        installs.push(project_root.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_install_roots() {
        let tool = MockTool::new();
        tool.install_dependencies(Path::new("/a")).unwrap();
        tool.install_dependencies(Path::new("/b")).unwrap();
        assert_eq!(tool.installs(), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(tool.available());
    }
}
