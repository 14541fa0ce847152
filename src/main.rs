use std::process::ExitCode;

fn main() -> ExitCode {
    // `.env` may set RUST_LOG / SFIT_DATA, so load it before the logger.
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Ok(path) = dotenv {
        log::debug!("loaded environment from {}", path.display());
    }

    match seebeck_fit::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
