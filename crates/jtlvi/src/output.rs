use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use jtlvi_codec::{pairs_to_json, MessageLayout, Pair};
use serde::Serialize;

use crate::exit::{io_error, CliResult};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput {
    offset: usize,
    tag: u16,
    len: usize,
}

#[derive(Serialize)]
struct LayoutOutput {
    total_len: usize,
    checksum: u16,
    records: Vec<RecordOutput>,
    trailer_offset: Option<usize>,
    trailing_len: usize,
}

impl From<&MessageLayout> for LayoutOutput {
    fn from(layout: &MessageLayout) -> Self {
        Self {
            total_len: layout.total_len,
            checksum: layout.checksum,
            records: layout
                .records
                .iter()
                .map(|r| RecordOutput {
                    offset: r.offset,
                    tag: r.tag,
                    len: r.len,
                })
                .collect(),
            trailer_offset: layout.trailer_offset,
            trailing_len: layout.trailing_len,
        }
    }
}

#[derive(Serialize)]
struct ChecksumOutput {
    len: usize,
    checksum: u16,
    hex: String,
}

/// Print decoded pairs.
///
/// `Json` emits exactly the document shape `jtlvi encode` accepts. `Raw`
/// writes the concatenated values with no framing.
pub fn print_pairs(pairs: &[Pair], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", pairs_to_json(pairs));
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["TAG", "SIZE", "VALUE"]);
            for pair in pairs {
                table.add_row(vec![
                    pair.tag.to_string(),
                    pair.value.len().to_string(),
                    value_preview(&pair.value),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for pair in pairs {
                println!(
                    "tag={} size={} value={}",
                    pair.tag,
                    pair.value.len(),
                    value_preview(&pair.value)
                );
            }
        }
        OutputFormat::Raw => {
            let joined: Vec<u8> = pairs.iter().flat_map(|p| p.value.iter().copied()).collect();
            return print_raw(&joined);
        }
    }
    Ok(())
}

pub fn print_layout(layout: &MessageLayout, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            println!(
                "{}",
                serde_json::to_string(&LayoutOutput::from(layout))
                    .unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["OFFSET", "TAG", "LENGTH"]);
            for record in &layout.records {
                table.add_row(vec![
                    record.offset.to_string(),
                    record.tag.to_string(),
                    record.len.to_string(),
                ]);
            }
            if let Some(offset) = layout.trailer_offset {
                table.add_row(vec![offset.to_string(), "TRAILER".to_string(), "0".to_string()]);
            }
            println!("{table}");
            println!(
                "size={} checksum=0x{:04x} padding={}",
                layout.total_len, layout.checksum, layout.trailing_len
            );
        }
        OutputFormat::Pretty => {
            println!(
                "size={} checksum=0x{:04x} records={} trailer={} padding={}",
                layout.total_len,
                layout.checksum,
                layout.records.len(),
                layout
                    .trailer_offset
                    .map(|o| o.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                layout.trailing_len
            );
            for record in &layout.records {
                println!(
                    "  offset={} tag={} len={}",
                    record.offset, record.tag, record.len
                );
            }
        }
    }
}

pub fn print_checksum(len: usize, checksum: u16, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let out = ChecksumOutput {
                len,
                checksum,
                hex: format!("{checksum:04x}"),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["SIZE", "CHECKSUM", "HEX"]);
            table.add_row(vec![
                len.to_string(),
                checksum.to_string(),
                format!("{checksum:04x}"),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("size={len} checksum={checksum} (0x{checksum:04x})");
        }
        OutputFormat::Raw => {
            return print_raw(&checksum.to_be_bytes());
        }
    }
    Ok(())
}

pub fn print_raw(data: &[u8]) -> CliResult<()> {
    write_raw(&mut std::io::stdout().lock(), data)
}

fn write_raw<W: Write>(out: &mut W, data: &[u8]) -> CliResult<()> {
    out.write_all(data)
        .and_then(|()| out.flush())
        .map_err(|err| io_error("failed writing stdout", err))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn value_preview(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) if !text.chars().any(char::is_control) => text.to_string(),
        _ => value.iter().map(|b| format!("{b:02x}")).collect(),
    }
}
