use st_settings::ConfigManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    log::info!("settings from {}", config.path().display());

    let controller = screen_translate::start(&config.get())?;
    let handle = controller.handle();
    tokio::spawn(screen_translate::drive(
        tokio::io::BufReader::new(tokio::io::stdin()),
        handle,
    ));

    controller.run().await;
    Ok(())
}
