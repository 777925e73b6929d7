use super::{json_pretty, EXIT_DETECT_FAIL, EXIT_SUCCESS};
use bootslice_core::Engine;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let metadata = engine.detect().map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({
            "spring_boot": metadata.is_some(),
            "metadata": metadata,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        match &metadata {
            Some(m) => println!(
                "Spring Boot {} application, start class {}",
                m.version, m.start_class
            ),
            None => println!(
                "{} is not a Spring Boot application",
                engine.application_root().display()
            ),
        }
    }
    Ok(if metadata.is_some() {
        EXIT_SUCCESS
    } else {
        EXIT_DETECT_FAIL
    })
}
