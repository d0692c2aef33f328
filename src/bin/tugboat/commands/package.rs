//! `tugboat package` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, PackageArgs};
use tugboat::ops::package;
use tugboat::util::{Shell, Status};

pub fn execute(args: PackageArgs, global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let tool = session.tool(global)?;

    let spinner = shell.spinner(Status::Installing, session.label());
    let tree = package(&session.recipe, &session.layout, &tool)?;
    spinner.finish();

    shell.status(
        Status::Packaged,
        format!(
            "{} ({} files) in {}",
            session.label(),
            tree.files()?.len(),
            session.display_path(tree.root()).display()
        ),
    );
    Ok(())
}
