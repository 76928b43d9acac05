use mazecarve::app::{self, AppConfig, USAGE};

/// Log to a file rather than stdout; the terminal belongs to the animation.
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never("logs", "mazecarve.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let config = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    if config.help {
        println!("{USAGE}");
        return Ok(());
    }

    let _guard = init_tracing();
    if config.batch {
        app::batch(&config)
    } else {
        app::run(&config)
    }
}
