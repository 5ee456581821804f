use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dicomglance::{generate_preview_with, NativeParser, Resources};

#[derive(Parser, Debug)]
#[command(name = "dicomglance")]
#[command(about = "Render a self-contained HTML preview for a DICOM file", long_about = None)]
struct Cli {
    /// DICOM file to preview
    input: PathBuf,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory with styles.css / scripts.js overriding the bundled assets
    #[arg(long)]
    resources: Option<PathBuf>,
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();

    let resources = match &cli.resources {
        Some(dir) => Resources::from_dir(dir),
        None => Resources::bundled(),
    };

    // A document always comes back; parse failures are error documents.
    let document = generate_preview_with(&NativeParser, &resources, &cli.input);
    log::info!(
        "Rendered {} bytes ({}x{} content hint)",
        document.html.len(),
        document.content_size.0,
        document.content_size.1
    );

    let written = match &cli.output {
        Some(path) => fs::write(path, document.bytes()),
        None => io::stdout().write_all(document.bytes()),
    };

    if let Err(err) = written {
        eprintln!("Error: failed to write preview output: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
