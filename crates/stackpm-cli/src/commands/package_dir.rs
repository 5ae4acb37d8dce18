use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    let dir = backend.package_dir();
    if json {
        let payload = serde_json::json!({ "package_dir": dir });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{}", dir.display());
    }
    Ok(EXIT_SUCCESS)
}
