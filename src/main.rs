use clap::Parser;
use tracing::info;

use lcu_autoaccept::{logging, shutdown, AutoAcceptService, Cli, LcuClient, Settings};

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let settings = Settings::load(&cli)?;
  let _log_guard = logging::init(&cli.log_level, settings.log_dir.as_deref())?;

  let client = LcuClient::from_settings(&settings)?;
  let mut service = AutoAcceptService::from_settings(client, &settings);
  let handle = service.handle();

  // Ctrl-C is a stop request; the loop drains its current sleep and returns
  shutdown::watch_ctrl_c(handle)?;

  service.start();
  info!(status = %service.get_status(), "exiting");
  Ok(())
}
