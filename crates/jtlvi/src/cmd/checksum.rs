use jtlvi_codec::bsd_checksum;

use crate::cmd::{read_input, ChecksumArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_checksum, OutputFormat};

pub fn run(args: ChecksumArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args.input)?;
    print_checksum(input.len(), bsd_checksum(&input), format)?;
    Ok(SUCCESS)
}
