use super::{json_pretty, parse_package_args, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;
use std::collections::BTreeMap;

pub fn run(
    backend: &dyn LanguageBackend,
    packages: &[String],
    project_name: Option<&str>,
    json: bool,
) -> Result<u8, String> {
    let requested: BTreeMap<_, _> = parse_package_args(packages)?.into_iter().collect();

    let pb = if json {
        None
    } else {
        Some(spinner(&format!("resolving {} package(s)...", requested.len())))
    };
    let report = match backend.add(&requested, project_name) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "manifests updated");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "add failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        for name in &report.added {
            println!("added {name} to {}", backend.specfile());
        }
        for (name, version) in &report.pinned {
            println!("pinned {name}-{version} in {}", backend.lockfile());
        }
        for name in &report.unchanged {
            println!("{name} is already a dependency");
        }
    }
    Ok(EXIT_SUCCESS)
}
