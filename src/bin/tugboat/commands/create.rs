//! `tugboat create` command

use anyhow::Result;

use super::Session;
use crate::cli::{CreateArgs, GlobalArgs};
use tugboat::ops::{create, Phase};
use tugboat::util::shell::{format_duration, Spinner};
use tugboat::util::{Shell, Status};

fn phase_status(phase: Phase) -> Status {
    match phase {
        Phase::Generate => Status::Generating,
        Phase::Build => Status::Building,
        Phase::Package => Status::Installing,
        Phase::PublishInfo => Status::Staging,
    }
}

pub fn execute(args: CreateArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let raw = session.raw_options(&args.options.options);
    let tool = session.tool(global)?;
    let opts = session.build_options(args.jobs, global);
    let start = std::time::Instant::now();

    let label = session.label();
    let mut spinner: Option<Spinner> = None;
    let result = create(
        &session.recipe,
        &raw,
        &session.layout,
        &tool,
        &opts,
        |phase| {
            // Replacing the spinner clears the previous phase's one
            spinner = Some(shell.spinner(phase_status(phase), format!("{} ({})", label, phase)));
        },
    );
    drop(spinner);
    let result = result?;

    shell.status(
        Status::Packaged,
        format!(
            "{} in {}",
            result.metadata.cmake_target_name,
            session.display_path(result.tree.root()).display()
        ),
    );
    shell.status(
        Status::Finished,
        format!("create in {}", format_duration(start.elapsed())),
    );
    Ok(())
}
