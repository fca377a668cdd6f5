use anyhow::Context;
use mallow::{MallowApp, SceneConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let config = SceneConfig::from_env().context("failed to load scene configuration")?;
    MallowApp::new(config)?.run()
}
