use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;
use stackpm_schema::PkgName;
use std::collections::BTreeSet;

pub fn run(backend: &dyn LanguageBackend, packages: &[String], json: bool) -> Result<u8, String> {
    let names: BTreeSet<PkgName> = packages.iter().map(|p| PkgName::from(p.as_str())).collect();
    let report = backend.remove(&names).map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "specfile": report.specfile,
            "lockfile": report.lockfile,
        });
        println!("{}", json_pretty(&payload)?);
    } else if report.specfile.is_empty() && report.lockfile.is_empty() {
        println!("nothing to remove");
    } else {
        for name in &report.specfile {
            println!("removed {name} from {}", backend.specfile());
        }
        for name in &report.lockfile {
            println!("unpinned {name} in {}", backend.lockfile());
        }
    }
    Ok(EXIT_SUCCESS)
}
