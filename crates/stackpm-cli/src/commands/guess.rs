use super::{json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run(backend: &dyn LanguageBackend, json: bool) -> Result<u8, String> {
    let guessed = backend.guess().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&guessed)?);
    } else {
        for name in guessed.keys() {
            println!("{name}");
        }
    }
    Ok(EXIT_SUCCESS)
}
