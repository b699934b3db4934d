use kennel::{KennelApp, SceneConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = SceneConfig::default();
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_model_path(path);
    }

    KennelApp::new(config)?.run()
}
