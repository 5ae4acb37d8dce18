use super::{colorize_set, json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use stackpm_core::LanguageBackend;

pub fn run(backend: &dyn LanguageBackend, query: &str, json: bool) -> Result<u8, String> {
    let pb = if json {
        None
    } else {
        Some(spinner(&format!("searching for '{query}'...")))
    };
    let results = match backend.search(query) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, &format!("{} package(s) found", r.len()));
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "search failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&results)?);
    } else if results.is_empty() {
        println!("no packages matching '{query}'");
    } else {
        println!("{:<28} {:<12} {:<10} DESCRIPTION", "NAME", "VERSION", "SET");
        for info in &results {
            println!(
                "{:<28} {:<12} {:<10} {}",
                info.name,
                info.version,
                colorize_set(info),
                truncate(&info.description, 60)
            );
        }
    }
    Ok(EXIT_SUCCESS)
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
