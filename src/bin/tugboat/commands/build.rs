//! `tugboat build` command

use anyhow::Result;

use super::Session;
use crate::cli::{BuildArgs, GlobalArgs};
use tugboat::ops::build;
use tugboat::util::shell::format_duration;
use tugboat::util::{Shell, Status};

pub fn execute(args: BuildArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let tool = session.tool(global)?;
    let opts = session.build_options(args.jobs, global);

    let spinner = shell.spinner(Status::Building, session.label());
    let built = build(&session.recipe, &session.layout, &tool, &opts)?;
    let elapsed = spinner.finish();

    shell.status(
        Status::Finished,
        format!("`{}` build in {}", built.build_type(), format_duration(elapsed)),
    );
    Ok(())
}
