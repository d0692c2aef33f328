//! `tugboat clean` command

use anyhow::Result;

use super::Session;
use crate::cli::{CleanArgs, GlobalArgs};
use tugboat::ops::clean;
use tugboat::util::{Shell, Status};

pub fn execute(args: CleanArgs, _global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;

    let removed = clean(&session.layout)?;
    if removed.is_empty() {
        shell.note("nothing to clean");
    }
    for dir in removed {
        shell.status(Status::Removed, session.display_path(&dir).display());
    }

    Ok(())
}
