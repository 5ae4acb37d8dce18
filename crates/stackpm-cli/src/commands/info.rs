use super::{colorize_set, json_pretty, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run(backend: &dyn LanguageBackend, name: &str, json: bool) -> Result<u8, String> {
    let info = backend.info(name).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&info)?);
    } else {
        println!("name:         {}", info.name);
        println!("version:      {}", info.version);
        println!("set:          {}", colorize_set(&info));
        println!("description:  {}", info.description);
        println!("author:       {}", info.author);
        println!("license:      {}", info.license);
        println!("homepage:     {}", info.homepage_url);
        println!("source:       {}", info.source_code_url);
        println!("bug tracker:  {}", info.bug_tracker_url);
    }
    Ok(EXIT_SUCCESS)
}
