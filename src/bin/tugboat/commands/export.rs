//! `tugboat export` command

use anyhow::Result;

use super::Session;
use crate::cli::{ExportArgs, GlobalArgs};
use tugboat::ops::export_sources;
use tugboat::util::{Shell, Status};

pub fn execute(args: ExportArgs, _global: &GlobalArgs, shell: &Shell) -> Result<()> {
    let session = Session::open(&args.recipe)?;
    let dest = session.ctx.resolve_path(&args.dest);

    let exported = export_sources(&session.recipe, &session.layout, &dest)?;
    for file in &exported {
        tracing::debug!("exported {}", file.display());
    }

    shell.status(
        Status::Exported,
        format!(
            "{} files of {} to {}",
            exported.len(),
            session.label(),
            session.display_path(&dest).display()
        ),
    );
    Ok(())
}
