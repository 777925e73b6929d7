use super::{json_pretty, maybe_spinner, spin_fail, spin_ok, EXIT_DETECT_FAIL, EXIT_SUCCESS};
use bootslice_core::Engine;
use std::path::Path;

pub fn run(engine: &Engine, layers: &Path, json: bool) -> Result<u8, String> {
    let pb = maybe_spinner(json, "contributing layers...");

    let result = match engine.build(layers) {
        Ok(r) => r,
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, "build failed");
            }
            return Err(e.to_string());
        }
    };

    let Some(result) = result else {
        if let Some(ref pb) = pb {
            spin_fail(pb, "neither a Spring Boot application nor Groovy scripts");
        }
        if json {
            println!("{}", json_pretty(&serde_json::json!({ "status": "skipped" }))?);
        }
        return Ok(EXIT_DETECT_FAIL);
    };

    if let Some(ref pb) = pb {
        spin_ok(pb, "layers contributed");
    }
    let spring_boot = result.spring_boot.as_ref();
    let slices = spring_boot.map_or(0, |b| b.slices.len());
    let dependencies = spring_boot.map_or(0, |b| b.dependencies.len());
    let scripts = result.command.as_ref().map_or(0, |c| c.files.len());
    if json {
        let payload = serde_json::json!({
            "status": "built",
            "layers": layers,
            "start_class": spring_boot.map(|b| &b.metadata.start_class),
            "slices": slices,
            "dependencies": dependencies,
            "groovy_scripts": scripts,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        if spring_boot.is_some() {
            println!(
                "contributed {slices} slices and {dependencies} dependencies to {}",
                layers.display()
            );
        }
        if scripts > 0 {
            println!(
                "contributed Spring Boot CLI command for {scripts} Groovy scripts to {}",
                layers.display()
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
