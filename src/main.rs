/// Replays a recorded input script against a folder of images and prints the
/// resulting annotations as JSON.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use roimark::config::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.preferences.log_level.name()),
    )
    .init();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: roimark-replay <script.json> [image-root]");
        std::process::exit(2);
    };
    // Command line first, then the configured root, then the working directory
    let root = match args.next() {
        Some(root) => PathBuf::from(root),
        None if !config.preferences.image_root.is_empty() => {
            PathBuf::from(&config.preferences.image_root)
        }
        None => PathBuf::from("."),
    };
    log::info!("Replaying {:?} over {:?}", script_path, root);

    match replay(&script_path, &root, &config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("Replay failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn replay(
    script_path: &std::path::Path,
    root: &std::path::Path,
    config: &roimark::config::AppConfig,
) -> Result<String, roimark::replay::ScriptError> {
    use roimark::replay::{ReplayScript, replay_folder};

    let script = ReplayScript::load(script_path)?;
    let report = replay_folder(root, &script, config)?;
    log::info!(
        "Replay finished on {} with {} annotations",
        report.progress,
        report.annotations.len()
    );
    Ok(serde_json::to_string_pretty(&report)?)
}

// The replay driver needs a filesystem
#[cfg(target_arch = "wasm32")]
fn main() {}
