use super::{json_pretty, EXIT_SUCCESS};
use bootslice_core::Engine;
use bootslice_layers::AnySlicer;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let metadata = engine.metadata().map_err(|e| e.to_string())?;
    let slicer = AnySlicer::for_metadata(engine.application_root(), &metadata)
        .map_err(|e| e.to_string())?;
    let class_path = engine
        .launch_class_path(&metadata)
        .map_err(|e| e.to_string())?;

    if json {
        let payload = serde_json::json!({
            "metadata": metadata,
            "slicer": slicer.kind(),
            "launch_classpath": class_path,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("version:      {}", metadata.version);
        println!("start_class:  {}", metadata.start_class);
        println!("classes:      {}", metadata.classes);
        println!("lib:          {}", metadata.lib);
        println!(
            "layers_index: {}",
            metadata.layers_index.as_deref().unwrap_or("(none)")
        );
        println!("slicer:       {}", slicer.kind());
        println!("classpath:");
        for entry in &class_path {
            println!("  {}", entry.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
