use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run_specfile(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    let deps = backend.list_specfile().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&deps)?);
    } else if deps.is_empty() {
        println!("no dependencies in {}", backend.specfile());
    } else {
        for name in deps.keys() {
            println!("{name}");
        }
    }
    Ok(EXIT_SUCCESS)
}

pub fn run_lockfile(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    let pins = backend.list_lockfile().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&pins)?);
    } else if pins.is_empty() {
        println!("no extra-deps in {}", backend.lockfile());
    } else {
        println!("{:<28} VERSION", "NAME");
        for (name, version) in &pins {
            println!("{name:<28} {version}");
        }
    }
    Ok(EXIT_SUCCESS)
}
