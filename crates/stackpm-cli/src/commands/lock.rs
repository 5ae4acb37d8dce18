use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::{LanguageBackend, Quirk};

pub fn run(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    backend.lock().map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({
            "lockfile": backend.lockfile(),
            "quirks": backend.quirks(),
        });
        println!("{}", json_pretty(&payload)?);
    } else if backend.quirks().contains(&Quirk::AddRemoveAlsoLocks) {
        println!("{} is kept up to date by add and remove", backend.lockfile());
    }
    Ok(EXIT_SUCCESS)
}
