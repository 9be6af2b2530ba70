use std::error::Error;

use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use tally_core::serde::to_canonical_json_bytes;

use crate::summary::tool_versions;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print every crate version and the supported election kinds as JSON.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    crates: BTreeMap<String, String>,
    election_kinds: Vec<String>,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        crates: tool_versions(),
        election_kinds: vec!["instant-runoff".into(), "open-party-list".into()],
    };
    println!("{}", String::from_utf8(to_canonical_json_bytes(&info)?)?);
    Ok(())
}
