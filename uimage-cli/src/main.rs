use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uimage_core::ImageInfo;

/// Legacy bootloader image (uImage) inspector
#[derive(Parser)]
#[command(
    name = "rdimage",
    about = "Prints the header of a uImage file and extracts the kernel image",
    version,
    author
)]
struct Cli {
    /// Path to uImage file
    #[arg(required = true)]
    path: PathBuf,

    /// Extract image to OUTFILE
    #[arg(short = 'x', long = "extract", value_name = "OUTFILE")]
    extract: Option<PathBuf>,

    /// Print the header as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    name: String,
    creation_time: u32,
    creation_date: String,
    data_size: u32,
    load_address: u32,
    entry_point: u32,
    header_crc: u32,
    data_crc: u32,
    os: u8,
    os_name: &'a str,
    arch: u8,
    arch_name: &'a str,
    image_type: u8,
    type_name: &'a str,
    compression: u8,
    compression_name: &'a str,
    payload_type: Option<&'a str>,
    payload_offset: u64,
}

impl<'a> Summary<'a> {
    fn new(info: &'a ImageInfo) -> Self {
        let hdr = &info.header;
        Self {
            name: info.name(),
            creation_time: hdr.creation_time(),
            creation_date: info.creation_date(),
            data_size: hdr.data_size(),
            load_address: hdr.load_address(),
            entry_point: hdr.entry_point(),
            header_crc: hdr.header_crc(),
            data_crc: hdr.data_crc(),
            os: hdr.os(),
            os_name: info.os_name(),
            arch: hdr.arch(),
            arch_name: info.arch_name(),
            image_type: hdr.image_type(),
            type_name: info.type_name(),
            compression: hdr.compression(),
            compression_name: info.compression_name(),
            payload_type: info.payload.map(|k| k.label()),
            payload_offset: info.payload_offset,
        }
    }
}

fn create_output(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("Failed to chmod '{}'", path.display()))?;
    }

    Ok(file)
}

fn run(cli: Cli) -> Result<()> {
    let mut input =
        File::open(&cli.path).with_context(|| format!("Failed to open '{}'", cli.path.display()))?;

    let info = ImageInfo::from_reader(&mut input)
        .with_context(|| format!("Failed to read header of '{}'", cli.path.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&Summary::new(&info))?);
    } else {
        print!("{info}");
    }

    if let Some(out_path) = &cli.extract {
        let mut out = create_output(out_path)?;
        info.extract(&mut input, &mut out)
            .with_context(|| format!("Failed to extract to '{}'", out_path.display()))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
