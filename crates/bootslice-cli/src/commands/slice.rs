use super::{colorize_slice, json_pretty, EXIT_SUCCESS};
use bootslice_core::Engine;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let metadata = engine.metadata().map_err(|e| e.to_string())?;
    let slices = engine.slices(&metadata).map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&slices)?);
    } else {
        for slice in &slices {
            println!("{} ({} files)", colorize_slice(&slice.name), slice.paths.len());
            for path in &slice.paths {
                println!("  {path}");
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
