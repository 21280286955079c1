use jtlvi_codec::inspect;

use crate::cmd::{read_input, InspectArgs};
use crate::exit::{decode_error, CliResult, SUCCESS};
use crate::output::{print_layout, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let input = read_input(&args.input)?;
    let layout = inspect(&input).map_err(|err| decode_error("invalid message", err))?;
    if layout.trailing_len > 0 {
        tracing::debug!(
            trailing = layout.trailing_len,
            "bytes after trailer were not interpreted"
        );
    }

    print_layout(&layout, format);
    Ok(SUCCESS)
}
