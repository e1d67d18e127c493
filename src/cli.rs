use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::{env, path::PathBuf};

use crate::{config::Config, output::OutputFmt, secret::PasswordSource};

const DEFAULT_PORT: u16 = 143;
const DEFAULT_TLS_PORT: u16 = 993;

/// Disk usage calculator for IMAP accounts.
#[derive(Debug, Parser)]
#[command(name = "imapdu", version, about)]
pub struct Cli {
    /// IMAP server hostname
    #[arg(value_name = "SERVER")]
    pub server: String,

    /// Use a secure connection (SSL/TLS)
    ///
    /// Also switches the default port to 993.
    #[arg(long)]
    pub tls: bool,

    /// Port to connect to (default: 143, or 993 with --tls)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// IMAP username (default: the current OS user)
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Produce CSV output
    #[arg(long)]
    pub csv: bool,

    /// Print sizes in human readable format (default)
    #[arg(long, overrides_with = "no_human_readable")]
    pub human_readable: bool,

    /// Print sizes as raw byte counts
    #[arg(long, overrides_with = "human_readable")]
    pub no_human_readable: bool,

    /// Override the default configuration file path
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read the password from this environment variable
    #[arg(long, value_name = "VAR", group = "password")]
    pub password_env: Option<String>,

    /// Read the password from the first line of this file
    #[arg(long, value_name = "PATH", group = "password")]
    pub password_file: Option<PathBuf>,

    /// Run this shell command and use its output as the password
    #[arg(long, value_name = "CMD", group = "password")]
    pub password_cmd: Option<String>,
}

/// Fully resolved connection and output options.
#[derive(Debug)]
pub struct Options {
    pub server: String,
    pub port: u16,
    pub tls: bool,
    pub user: String,
    pub fmt: OutputFmt,
    pub human_readable: bool,
    pub password: PasswordSource,
}

impl Cli {
    /// Resolves the effective options: flags win over the server's config
    /// section, which wins over the top-level config, which wins over the
    /// built-in defaults.
    pub fn into_options(self, config: &Config) -> Result<Options> {
        let defaults = config.for_server(&self.server);

        let tls = self.tls || defaults.tls.unwrap_or(false);
        let port = self
            .port
            .or(defaults.port)
            .unwrap_or(if tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT });

        let user = self
            .user
            .or(defaults.user)
            .or_else(current_user)
            .ok_or_else(|| eyre!("cannot determine IMAP username, use --user"))?;

        let password = if let Some(var) = self.password_env {
            PasswordSource::Env(var)
        } else if let Some(path) = self.password_file {
            PasswordSource::File(path)
        } else if let Some(cmd) = self.password_cmd {
            PasswordSource::Cmd(cmd)
        } else if let Some(var) = defaults.password_env {
            PasswordSource::Env(var)
        } else if let Some(path) = defaults.password_file {
            PasswordSource::File(path)
        } else if let Some(cmd) = defaults.password_cmd {
            PasswordSource::Cmd(cmd)
        } else {
            PasswordSource::Prompt
        };

        Ok(Options {
            server: self.server,
            port,
            tls,
            user,
            fmt: if self.csv {
                OutputFmt::Csv
            } else {
                OutputFmt::Plain
            },
            human_readable: !self.no_human_readable,
            password,
        })
    }
}

fn current_user() -> Option<String> {
    ["USER", "LOGNAME", "USERNAME"]
        .iter()
        .find_map(|var| env::var(var).ok())
        .filter(|user| !user.is_empty())
}
