use bubbletea_rs::{MouseMotion, Program};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use std::error::Error;
use std::fs::File;
use std::io;
use talk_timer::app::App;
use talk_timer::config::{self, Args};

fn init_logging(args: &Args) -> io::Result<()> {
    // The terminal belongs to the UI, so logs only ever go to a file.
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let timer_config = args.timer_config();
    log::info!("starting with {:?}", timer_config);
    if config::install(timer_config).is_err() {
        log::warn!("configuration was already installed");
    }

    // Focus reports stand in for page visibility.
    let program = Program::<App>::builder()
        .signal_handler(true)
        .mouse_motion(MouseMotion::Cell)
        .report_focus(true)
        .build()?;
    program.run().await?;
    Ok(())
}
