/// Pinhole Terminal - fly a camera around wireframe solids
///
/// Controls:
///   - W/A/S/D or arrow keys: move forward, left, backward, right
///   - SPACE / C: move up / down
///   - Q / E: roll
///   - Mouse: look around
///   - ESC: quit
use anyhow::Context;
use clap::Parser;
use pinhole_terminal::{cli::Args, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Args::parse().into_config();
    config.validate().context("invalid configuration")?;
    log::info!(
        "starting with {} shapes at {} fps",
        config.scene.len(),
        config.display.target_frame_rate
    );

    let mut app = TerminalApp::new(config)?;
    app.run()
}
