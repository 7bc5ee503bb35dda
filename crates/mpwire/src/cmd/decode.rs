use mpwire_codec::{CodecConfig, Decoder};

use crate::cmd::{read_input, DecodeArgs};
use crate::exit::{codec_error, CliResult, SUCCESS};
use crate::output::{print_values, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat, config: CodecConfig) -> CliResult<i32> {
    let input = read_input(args.file.as_deref(), args.hex)?;
    let decoder = Decoder::with_config(config);

    let values = if args.first {
        let (value, consumed) = decoder
            .decode(&input)
            .map_err(|err| codec_error("decode failed", err))?;
        if consumed < input.len() {
            tracing::info!(
                consumed,
                trailing = input.len() - consumed,
                "ignoring trailing bytes"
            );
        }
        vec![value]
    } else {
        decoder
            .decode_all(&input)
            .map_err(|err| codec_error("decode failed", err))?
    };

    tracing::debug!(count = values.len(), size = input.len(), "decoded input");
    print_values(&values, format)?;
    Ok(SUCCESS)
}
