use clap::{Args, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use jtlvi_codec::stream::read_to_end_bounded;
use jtlvi_codec::DEFAULT_MAX_MESSAGE;

use crate::exit::{io_error, stream_error, CliResult};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod encode;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON pair document into a binary message.
    Encode(EncodeArgs),
    /// Decode a binary message into tag/value pairs.
    Decode(DecodeArgs),
    /// Validate a message and print its record layout.
    Inspect(InspectArgs),
    /// Print the BSD checksum of arbitrary input.
    Checksum(ChecksumArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Checksum(args) => checksum::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Read from FILE instead of stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
    /// Refuse inputs larger than this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_MESSAGE)]
    pub max_size: usize,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Write the message to FILE instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Keep input order instead of sorting by tag.
    #[arg(long)]
    pub no_sort: bool,
    /// Omit the end-of-message trailer (forced back on when padding).
    #[arg(long)]
    pub no_trailer: bool,
    /// Pad the message to at least this many bytes.
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    pub padded_length: usize,
    /// Padding pattern as hex (e.g. f00f).
    #[arg(long, value_name = "HEX", default_value = "00")]
    pub padding_hex: String,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Read the whole input named by `args` (stdin when no file is given).
pub fn read_input(args: &InputArgs) -> CliResult<Vec<u8>> {
    let bytes = match &args.input {
        Some(path) => {
            let mut file = File::open(path).map_err(|err| {
                io_error(&format!("failed opening {}", path.display()), err)
            })?;
            read_to_end_bounded(&mut file, args.max_size)
                .map_err(|err| stream_error(&format!("failed reading {}", path.display()), err))?
        }
        None => read_to_end_bounded(&mut io::stdin().lock(), args.max_size)
            .map_err(|err| stream_error("failed reading stdin", err))?,
    };
    tracing::debug!(len = bytes.len(), "read input");
    Ok(bytes)
}

/// Write `bytes` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> CliResult<()> {
    match path {
        Some(path) => std::fs::write(path, bytes)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err)),
        None => {
            let mut out = io::stdout().lock();
            out.write_all(bytes)
                .and_then(|()| out.flush())
                .map_err(|err| io_error("failed writing stdout", err))
        }
    }
}
