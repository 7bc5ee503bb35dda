mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use mpwire_codec::{CodecConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ENCODED_SIZE};

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mpwire", version, about = "Binary value codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "MPWIRE_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    /// Maximum array/map nesting depth.
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_DEPTH,
        env = "MPWIRE_MAX_DEPTH",
        global = true
    )]
    max_depth: usize,

    /// Maximum encoded size in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_ENCODED_SIZE,
        env = "MPWIRE_MAX_SIZE",
        global = true
    )]
    max_size: usize,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            max_encoded_size: self.max_size,
            max_depth: self.max_depth,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.codec_config();
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_subcommand() {
        let cli = Cli::try_parse_from(["mpwire", "encode", "--json", "[1,2]", "--hex"])
            .expect("encode args should parse");

        assert!(matches!(cli.command, Command::Encode(ref args) if args.hex));
    }

    #[test]
    fn rejects_conflicting_input_args() {
        let err = Cli::try_parse_from([
            "mpwire",
            "encode",
            "--json",
            "{}",
            "--file",
            "doc.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn global_limits_build_codec_config() {
        let cli = Cli::try_parse_from([
            "mpwire",
            "decode",
            "--hex",
            "--max-depth",
            "8",
            "--max-size",
            "4096",
        ])
        .expect("decode args should parse");

        assert_eq!(
            cli.codec_config(),
            CodecConfig {
                max_encoded_size: 4096,
                max_depth: 8
            }
        );
    }

    #[test]
    fn parses_inspect_with_file() {
        let cli = Cli::try_parse_from(["mpwire", "inspect", "dump.bin"])
            .expect("inspect args should parse");
        assert!(matches!(cli.command, Command::Inspect(ref args) if args.file.is_some()));
    }
}
