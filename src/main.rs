use skeleton2d::{app, config::AppConfig, logging};

fn main() {
    let config = match AppConfig::load(skeleton2d::config::CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            logging::init(AppConfig::default().log_level);
            log::error!("{e}, using defaults");
            AppConfig::default()
        }
    };
    logging::init(config.log_level);

    if let Err(e) = app::run(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
