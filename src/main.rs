use clap::Parser;
use color_eyre::Result;
use tracing::{debug, warn};

use imapdu::{cli::Cli, config::Config, folder::FolderUsage, imap::ImapSession, output::Report};

fn main() -> Result<()> {
    imapdu::tracing::install()?;

    let cli = Cli::parse();
    let config = Config::from_opt_path(cli.config.as_deref())?;
    let opts = cli.into_options(&config)?;
    debug!(?opts, "resolved options");

    let passwd = opts.password.get()?;
    let report = Report::new(opts.fmt, opts.human_readable);

    let mut session =
        ImapSession::connect(&opts.server, opts.port, opts.tls, &opts.user, &passwd)?;

    for folder in session.list_folders() {
        match session.folder_usage(&folder) {
            FolderUsage::Measured(stats) => println!("{}", report.render(&folder, &stats)),
            FolderUsage::Empty => debug!(%folder, "folder is empty, skipping"),
            FolderUsage::Unavailable(reason) => warn!(%folder, %reason, "skipping folder"),
        }
    }

    session.logout();

    Ok(())
}
