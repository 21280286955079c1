use jtlvi_codec::{encode, pairs_from_json, EncodeOptions};

use crate::cmd::{read_input, write_output, EncodeArgs};
use crate::exit::{encode_error, json_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let options = encode_options(&args)?;

    let input = read_input(&args.input)?;
    let doc: serde_json::Value =
        serde_json::from_slice(&input).map_err(|err| json_error("input is not valid JSON", err))?;
    let source = pairs_from_json(&doc).map_err(|err| encode_error("invalid pairs", err))?;

    let records = source.len();
    let message = encode(source, &options).map_err(|err| encode_error("encode failed", err))?;
    tracing::info!(records, len = message.len(), "encoded message");

    write_output(args.output.as_deref(), &message)?;
    Ok(SUCCESS)
}

fn encode_options(args: &EncodeArgs) -> CliResult<EncodeOptions> {
    let padding = parse_hex(&args.padding_hex)?;
    if padding.is_empty() {
        return Err(CliError::new(USAGE, "--padding-hex must not be empty"));
    }
    Ok(EncodeOptions::default()
        .sort(!args.no_sort)
        .trailer(!args.no_trailer)
        .padded_length(args.padded_length)
        .padding(padding))
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: Vec<u8> = body
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            format!("hex string has an odd number of digits: {input}"),
        ));
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| CliError::new(USAGE, format!("invalid hex string: {input}")))
        })
        .collect()
}
