pub mod add;
pub mod completions;
pub mod guess;
pub mod info;
pub mod install;
pub mod list;
pub mod lock;
pub mod package_dir;
pub mod remove;
pub mod search;

use indicatif::{ProgressBar, ProgressStyle};
use stackpm_core::{is_curated, StackBackend};
use stackpm_remote::ResolverConfig;
use stackpm_runtime::{BuildTool, MockTool};
use stackpm_schema::{validate_name, validate_version, PkgInfo, PkgName, PkgSpec};
use std::path::Path;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_NETWORK_ERROR: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_UNSUPPORTED: u8 = 5;

/// Exit code for an error message, chosen by the prefix of the layer that
/// produced it.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("manifest") {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("network error:") {
        EXIT_NETWORK_ERROR
    } else if msg.starts_with("package not found:") {
        EXIT_NOT_FOUND
    } else if msg.starts_with("unsupported operation:") {
        EXIT_UNSUPPORTED
    } else {
        EXIT_FAILURE
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

/// `curated` in green, `extra-dep` in yellow.
pub fn colorize_set(info: &PkgInfo) -> String {
    use console::Style;
    if is_curated(info) {
        Style::new().green().apply_to("curated").to_string()
    } else {
        Style::new().yellow().apply_to("extra-dep").to_string()
    }
}

/// Resolver settings: defaults, then `~/.config/stackpm/config.toml`, then
/// `STACKPM_SEARCH_URL`, then `--search-url`.
pub fn resolver_config(search_url: Option<&str>) -> Result<ResolverConfig, String> {
    let mut config = ResolverConfig::load_default()
        .map_err(|e| e.to_string())?
        .with_env_overrides();
    if let Some(url) = search_url {
        config.search_url = url.to_owned();
    }
    tracing::debug!("search endpoint {}", config.search_url);
    Ok(config)
}

/// Backend for commands that only touch local files.
pub fn offline_backend(project: &Path) -> StackBackend {
    StackBackend::open(
        project,
        ResolverConfig::default(),
        Box::new(MockTool::new()),
    )
}

pub fn online_backend(project: &Path, search_url: Option<&str>) -> Result<StackBackend, String> {
    Ok(StackBackend::open(
        project,
        resolver_config(search_url)?,
        Box::new(MockTool::new()),
    ))
}

pub fn tool_backend(project: &Path, tool: Box<dyn BuildTool>) -> StackBackend {
    StackBackend::open(project, ResolverConfig::default(), tool)
}

/// Parse `name` or `name@version` arguments. A later duplicate wins.
pub fn parse_package_args(args: &[String]) -> Result<Vec<(PkgName, PkgSpec)>, String> {
    let mut out: Vec<(PkgName, PkgSpec)> = Vec::with_capacity(args.len());
    for arg in args {
        let (name, spec) = match arg.split_once('@') {
            Some((name, version)) => {
                validate_version(version).map_err(|e| format!("manifest error: {e}"))?;
                (name, version)
            }
            None => (arg.as_str(), ""),
        };
        validate_name(name).map_err(|e| format!("manifest error: {e}"))?;
        out.retain(|(existing, _)| existing != name);
        out.push((PkgName::from(name), PkgSpec::from(spec)));
    }
    Ok(out)
}
