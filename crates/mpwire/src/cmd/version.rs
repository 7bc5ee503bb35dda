use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("mpwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: mpwire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("MPWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "defaults: max_encoded_size={}, max_depth={}",
        mpwire_codec::DEFAULT_MAX_ENCODED_SIZE,
        mpwire_codec::DEFAULT_MAX_DEPTH
    );
    println!("features: json={}, cli=true", cfg!(feature = "json"));

    Ok(SUCCESS)
}
