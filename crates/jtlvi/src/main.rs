mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "jtlvi", version, about = "JTLVI message format: Just TLV It!")]
struct Cli {
    /// Output format for decoded data.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
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
        let cli = Cli::try_parse_from([
            "jtlvi",
            "encode",
            "--input",
            "pairs.json",
            "--no-sort",
            "--padded-length",
            "64",
            "--padding-hex",
            "f00f",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert!(args.no_sort);
                assert!(!args.no_trailer);
                assert_eq!(args.padded_length, 64);
                assert_eq!(args.padding_hex, "f00f");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_decode_with_global_format() {
        let cli = Cli::try_parse_from(["jtlvi", "decode", "--format", "pretty"])
            .expect("decode args should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
        assert_eq!(cli.format, Some(OutputFormat::Pretty));
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["jtlvi", "--format", "yaml", "decode"])
            .expect_err("unknown format should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn rejects_non_numeric_padded_length() {
        let err = Cli::try_parse_from(["jtlvi", "encode", "--padded-length", "lots"])
            .expect_err("non-numeric length should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_inspect_and_checksum() {
        let cli = Cli::try_parse_from(["jtlvi", "inspect", "-i", "msg.bin"]).unwrap();
        assert!(matches!(cli.command, Command::Inspect(_)));
        let cli = Cli::try_parse_from(["jtlvi", "checksum"]).unwrap();
        assert!(matches!(cli.command, Command::Checksum(_)));
    }
}
