//! `tugboat generate` command

use anyhow::Result;

use super::Session;
use crate::cli::{GenerateArgs, GlobalArgs};
use tugboat::ops::generate;
use tugboat::util::{Shell, Status};

pub fn execute(args: GenerateArgs, _global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let raw = session.raw_options(&args.options.options);

    shell.status(Status::Generating, session.label());
    let generated = generate(&session.recipe, &raw, &session.layout)?;

    shell.status(
        Status::Created,
        session.display_path(&generated.toolchain_file).display(),
    );
    for file in &generated.dependency_files {
        shell.status(Status::Created, session.display_path(file).display());
    }

    Ok(())
}
