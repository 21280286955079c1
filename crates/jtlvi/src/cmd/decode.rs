use jtlvi_codec::decode;

use crate::cmd::{read_input, DecodeArgs};
use crate::exit::{decode_error, CliResult, SUCCESS};
use crate::output::{print_pairs, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args.input)?;
    let pairs = decode(&input).map_err(|err| decode_error("decode failed", err))?;
    tracing::info!(records = pairs.len(), len = input.len(), "decoded message");

    print_pairs(&pairs, format)?;
    Ok(SUCCESS)
}
