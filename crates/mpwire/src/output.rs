use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mpwire_codec::Value;
use serde::Serialize;

use crate::exit::{codec_error, CliError, CliResult, USAGE};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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

/// One top-level value located in an encoded buffer.
#[derive(Debug, Serialize)]
pub struct Segment {
    pub offset: usize,
    pub size: usize,
    pub tag: String,
    pub tag_name: &'static str,
    pub kind: &'static str,
    pub value: serde_json::Value,
}

pub fn print_values(values: &[Value], format: OutputFormat) -> CliResult<()> {
    let rendered = values
        .iter()
        .map(|value| value.to_json().map_err(|err| codec_error("render failed", err)))
        .collect::<CliResult<Vec<_>>>()?;

    match format {
        OutputFormat::Json => {
            for json in &rendered {
                println!("{json}");
            }
        }
        OutputFormat::Pretty => {
            for json in &rendered {
                println!(
                    "{}",
                    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "KIND", "VALUE"]);
            for (index, (value, json)) in values.iter().zip(&rendered).enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    value.kind().to_string(),
                    json.to_string(),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

pub fn print_segments(segments: &[Segment], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for segment in segments {
                println!(
                    "{}",
                    serde_json::to_string(segment).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "SIZE", "TAG", "KIND", "VALUE"]);
            for segment in segments {
                table.add_row(vec![
                    segment.offset.to_string(),
                    segment.size.to_string(),
                    format!("{} ({})", segment.tag, segment.tag_name),
                    segment.kind.to_string(),
                    segment.value.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for segment in segments {
                println!(
                    "offset={} size={} tag={} ({}) kind={} value={}",
                    segment.offset,
                    segment.size,
                    segment.tag,
                    segment.tag_name,
                    segment.kind,
                    segment.value
                );
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse hex text, ignoring ASCII whitespace.
pub fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "hex input has an odd number of digits"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .all(u8::is_ascii_hexdigit)
                .then(|| std::str::from_utf8(pair).ok())
                .flatten()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| {
                    CliError::new(
                        USAGE,
                        format!("invalid hex digits: {}", String::from_utf8_lossy(pair)),
                    )
                })
        })
        .collect()
}
