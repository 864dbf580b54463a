// Licensed under the Apache-2.0 license

//! Creates a TBUP bundle for OTA updates.
//!
//! ```bash
//! ota-bundle firmware.bin --webui webui.bin -o bundle.bin
//! ota-bundle firmware.bin -o bundle.bin  # app-only
//! ```

mod bundle;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Create a TBUP OTA bundle", long_about = None)]
struct Args {
    /// App firmware binary (firmware.bin)
    app: PathBuf,

    /// WebUI LittleFS image
    #[arg(long, value_name = "PATH")]
    webui: Option<PathBuf>,

    /// Output bundle file
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Re-read the written bundle and check it the way the device does
    #[arg(long, default_value_t = false)]
    verify: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let summary = bundle::create_bundle(
        &args.app,
        args.webui.as_deref(),
        &args.output,
        args.verify,
    )?;

    println!(
        "Bundle created: {} ({} bytes)",
        args.output.display(),
        summary.total_size
    );
    println!("{}", summary);
    Ok(())
}
