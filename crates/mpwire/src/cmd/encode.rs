use mpwire_codec::{CodecConfig, Encoder, Value};

use crate::cmd::{read_input, EncodeArgs};
use crate::exit::{codec_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_raw, to_hex};

pub fn run(args: EncodeArgs, config: CodecConfig) -> CliResult<i32> {
    let document = match &args.json {
        Some(json) => json.as_bytes().to_vec(),
        None => read_input(args.file.as_deref(), false)?,
    };
    let value = parse_document(&document)?;

    let bytes = Encoder::with_config(config)
        .encode(&value)
        .map_err(|err| codec_error("encode failed", err))?;
    tracing::info!(kind = value.kind(), size = bytes.len(), "encoded document");

    if args.hex {
        println!("{}", to_hex(&bytes));
    } else {
        print_raw(&bytes);
    }
    Ok(SUCCESS)
}

fn parse_document(document: &[u8]) -> CliResult<Value> {
    let json: serde_json::Value = serde_json::from_slice(document)
        .map_err(|err| CliError::new(USAGE, format!("input is not valid JSON: {err}")))?;
    Ok(Value::from_json(&json))
}
