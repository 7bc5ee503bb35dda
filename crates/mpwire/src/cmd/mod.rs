use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use mpwire_codec::CodecConfig;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::{parse_hex, OutputFormat};

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON document into wire bytes.
    Encode(EncodeArgs),
    /// Decode wire bytes and print each value as JSON.
    Decode(DecodeArgs),
    /// List the top-level values in an encoded buffer.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, config),
        Command::Decode(args) => decode::run(args, format, config),
        Command::Inspect(args) => inspect::run(args, format, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Inline JSON document.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON document from a file. Default: stdin.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Print hex instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Encoded input file. Default: stdin.
    pub file: Option<PathBuf>,
    /// Input is hex text rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Decode only the first value and ignore trailing bytes.
    #[arg(long)]
    pub first: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Encoded input file. Default: stdin.
    pub file: Option<PathBuf>,
    /// Input is hex text rather than raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read command input from `file` or stdin, decoding hex text if asked.
pub fn read_input(file: Option<&Path>, hex: bool) -> CliResult<Vec<u8>> {
    let raw = match file {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            buf
        }
    };

    if !hex {
        return Ok(raw);
    }
    let text = std::str::from_utf8(&raw)
        .map_err(|_| CliError::new(USAGE, "hex input is not valid text"))?;
    parse_hex(text)
}
