//! `tugboat inspect` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, InspectArgs};
use tugboat::ops::inspect;
use tugboat::util::Shell;

pub fn execute(args: InspectArgs, _global: &GlobalArgs, _shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let summary = inspect(&session.recipe);

    if args.json {
        println!("{}", summary.to_json());
        return Ok(());
    }

    let pkg = &summary.package;
    println!("name: {}", pkg.name);
    println!("version: {}", pkg.version);
    if let Some(ref license) = pkg.license {
        println!("license: {}", license);
    }
    if let Some(ref description) = pkg.description {
        println!("description: {}", description);
    }
    if !pkg.topics.is_empty() {
        println!("topics: {}", pkg.topics.join(", "));
    }

    println!("options:");
    for opt in &summary.options {
        println!("    {}: {} (default: {})", opt.name, opt.values.join("|"), opt.default);
    }

    println!("cmake_target_name: {}", summary.package_info.cmake_target_name);
    println!("libs: {}", summary.package_info.libs.join(", "));

    Ok(())
}
