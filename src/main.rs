use anyhow::Context;
use icon_asset_generator::{GeneratorConfig, IconAssetGenerator};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GeneratorConfig::load();
    let source = config.source_path.clone();
    let written = IconAssetGenerator::new(config)
        .run()
        .with_context(|| format!("failed to generate icons from {}", source.display()))?;

    log::debug!("Wrote {} files", written.len());
    Ok(())
}
