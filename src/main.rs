use anyhow::Result;
use clap::Parser;
use coco_desk::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Routes all log::info!() etc. to the temp-dir log file.
    // CLI --log-level takes precedence over RUST_LOG.
    coco_desk::debug::init_log_bridge(cli.log_level.map(cli::LogLevelArg::to_level_filter));

    log::info!("Starting coco-desk {}", coco_desk::VERSION);

    // Handlers run to completion one at a time; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(cli::execute(cli))?;

    log::info!("coco-desk exiting with code {}", code);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
