use mpwire_codec::tag::tag_name;
use mpwire_codec::{CodecConfig, CodecError, Decoder};

use crate::cmd::{read_input, InspectArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_segments, OutputFormat, Segment};

pub fn run(args: InspectArgs, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    let input = read_input(args.file.as_deref(), args.hex)?;
    let segments = segments(&input, config).map_err(|err| codec_error("inspect failed", err))?;
    print_segments(&segments, format);
    Ok(SUCCESS)
}

/// Split `input` into its top-level values.
fn segments(input: &[u8], config: CodecConfig) -> Result<Vec<Segment>, CodecError> {
    let decoder = Decoder::with_config(config);
    let mut iter = decoder.iter(input);
    let mut segments = Vec::new();
    let mut offset = 0;

    while let Some(value) = iter.next() {
        let value = value?;
        let end = iter.offset();
        let tag = input[offset];
        segments.push(Segment {
            offset,
            size: end - offset,
            tag: format!("0x{tag:02x}"),
            tag_name: tag_name(tag),
            kind: value.kind(),
            value: value.to_json()?,
        });
        offset = end;
    }
    Ok(segments)
}
