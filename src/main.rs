use env_logger::{self as logger};

const TEMPLEX_LOG: &str = "TEMPLEX_LOG";
const TEMPLEX_LOG_STYLE: &str = "TEMPLEX_LOG_STYLE";

fn main() {
    if std::env::var(TEMPLEX_LOG).is_ok() {
        logger::Builder::from_env(
            logger::Env::new()
                .filter(TEMPLEX_LOG)
                .write_style(TEMPLEX_LOG_STYLE),
        )
        .format_timestamp_micros()
        .init();
        log::debug!("logging initialized");
    } else {
        logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .format_timestamp_millis()
            .init();
    }

    templex::cli::run();
}
