use log::LevelFilter;

/// Initialise `env_logger` for the server binary.
///
/// Logs at `Info` by default and `Debug` when `verbose` is set; an explicit
/// `RUST_LOG` takes precedence over both.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter(None, level).format_module_path(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder.init();
    log::info!("Logger initialized at {level:?} level");
}
