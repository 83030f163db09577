// src/main.rs

use initdag::{cli, config, logging, run};

fn main() {
    match run_main() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("initdag error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every task finished successfully before the deadline.
fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    let cfg = config::load_and_validate(&args.config)?;
    logging::init_logging(args.log_level, cfg.config.log_level.as_deref())?;
    let summary = run(&args, cfg)?;
    Ok(summary.all_succeeded())
}
