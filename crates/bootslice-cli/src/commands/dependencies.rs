use super::{json_pretty, maybe_spinner, spin_fail, spin_ok, EXIT_SUCCESS};
use bootslice_core::Engine;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let metadata = engine.metadata().map_err(|e| e.to_string())?;

    let pb = maybe_spinner(json, "fingerprinting dependencies...");
    let dependencies = match engine.dependencies(&metadata) {
        Ok(d) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, &format!("{} dependencies", d.len()));
            }
            d
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "fingerprinting failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&dependencies)?);
    } else if dependencies.is_empty() {
        println!("no dependencies found under {}", metadata.lib);
    } else {
        println!("{:<40} {:<24} SHA256", "NAME", "VERSION");
        for dep in &dependencies {
            println!("{:<40} {:<24} {}", dep.name, dep.version, dep.sha256);
        }
    }
    Ok(EXIT_SUCCESS)
}
