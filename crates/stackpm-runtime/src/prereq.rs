use crate::tool::{BuildTool, StackTool};
use std::fmt;

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: &'static str,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

/// Check prerequisites for `install`. Empty list means all are met.
pub fn check_stack_prereqs() -> Vec<MissingPrereq> {
    check_stack(&StackTool::new())
}

fn check_stack(tool: &StackTool) -> Vec<MissingPrereq> {
    let mut missing = Vec::new();
    if !tool.available() {
        missing.push(MissingPrereq {
            name: "stack",
            purpose: "building Haskell project dependencies",
            install_hint: "curl -sSL https://get.haskellstack.org/ | sh | ghcup install stack",
        });
    }
    missing
}

pub fn format_missing(missing: &[MissingPrereq]) -> String {
    let mut out = String::from("missing prerequisites:\n");
    for m in missing {
        out.push_str(&m.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_each_prereq() {
        let missing = vec![MissingPrereq {
            name: "stack",
            purpose: "building",
            install_hint: "ghcup install stack",
        }];
        let out = format_missing(&missing);
        assert!(out.starts_with("missing prerequisites:"));
        assert!(out.contains("  - stack: building (install: ghcup install stack)"));
    }

    #[test]
    fn missing_stack_is_reported_with_hint() {
        let missing = check_stack(&StackTool::with_program("stackpm-definitely-not-installed"));
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "stack");
        assert!(missing[0].install_hint.contains("ghcup install stack"));
    }

    #[cfg(unix)]
    #[test]
    fn runnable_program_meets_prereqs() {
        // `true` ignores its arguments and exits 0
        assert!(check_stack(&StackTool::with_program("true")).is_empty());
    }
}
