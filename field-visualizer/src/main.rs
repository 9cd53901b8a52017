use anyhow::Context;
use field_visualizer::GeneratorConfig;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GeneratorConfig::default();
    info!(
        "generating {} with {}",
        config.output_path.display(),
        config.color_scale
    );
    config
        .run()
        .with_context(|| format!("failed to generate {}", config.output_path.display()))?;
    Ok(())
}
