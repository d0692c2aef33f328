//! `tugboat publish-info` command
//!
//! Prints the metadata document on stdout so it can be piped.

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, PublishInfoArgs};
use tugboat::ops::publish_info;
use tugboat::util::{Shell, Status};

pub fn execute(args: PublishInfoArgs, _global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;

    let metadata = publish_info(&session.recipe, &session.layout)?;
    shell.status(Status::Published, &metadata.cmake_target_name);
    println!("{}", metadata.to_json());

    Ok(())
}
