// ============================================================================
// vidkit-cli/src/commands/info.rs
// ============================================================================
//
// INFO COMMAND: probes a media file and prints its details

use log::debug;
use vidkit_core::{CoreError, VideoTools, format_bytes};

use crate::cli::InfoArgs;
use crate::error::CliResult;
use crate::output::{print_heading, print_info};

pub fn run_info(args: InfoArgs) -> CliResult<()> {
    let mut tools = VideoTools::new(args.input_path.as_str());
    if !tools.has_correct_input_file() {
        return Err(CoreError::InvalidInputPath);
    }
    let details = tools.get_details(false)?;
    debug!("Probed {} ({} raw keys)", tools.path(), details.raw.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(details.as_ref())?);
        return Ok(());
    }

    print_heading("Media details");
    print_info("File", tools.path());
    print_info("Extension", &details.extension);
    print_info("Size", format_bytes(details.size));
    print_info("Dimensions", format!("{}x{}", details.width, details.height));
    if let Some(format_name) = details
        .raw
        .get("format")
        .and_then(|f| f.get("format_name"))
        .and_then(|v| v.as_str())
    {
        print_info("Container", format_name);
    }
    Ok(())
}
