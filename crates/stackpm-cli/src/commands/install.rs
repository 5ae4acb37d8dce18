use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    backend.install().map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({ "installed": true });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("dependencies installed");
    }
    Ok(EXIT_SUCCESS)
}
