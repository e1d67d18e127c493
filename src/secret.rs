use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use std::{env, fs, path::PathBuf, process::Command};

/// Where the IMAP password comes from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PasswordSource {
    /// Ask on the terminal, without echo.
    #[default]
    Prompt,
    /// Read an environment variable.
    Env(String),
    /// Read the first line of a file.
    File(PathBuf),
    /// Run a shell command and use its output, trailing newline trimmed.
    Cmd(String),
}

impl PasswordSource {
    pub fn get(&self) -> Result<String> {
        match self {
            Self::Prompt => prompt_passwd("Password"),
            Self::Env(var) => {
                env::var(var).with_context(|| format!("cannot read password from ${var}"))
            }
            Self::File(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("cannot read password file {}", path.display()))?;
                Ok(content.lines().next().unwrap_or_default().to_owned())
            }
            Self::Cmd(cmd) => {
                let output = run_cmd(cmd)
                    .with_context(|| format!("cannot run password command {cmd:?}"))?;
                Ok(output.trim_end_matches('\n').to_owned())
            }
        }
    }
}

fn prompt_passwd(prompt: &str) -> Result<String> {
    inquire::Password::new(prompt)
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()
        .map_err(|err| eyre!("cannot read password from prompt: {err}"))
}

fn run_cmd(cmd: &str) -> Result<String> {
    let output = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", cmd]).output()?
    } else {
        Command::new("sh").arg("-c").arg(cmd).output()?
    };

    if !output.status.success() {
        return Err(eyre!("command exited with {}", output.status));
    }

    Ok(String::from_utf8(output.stdout)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn password_from_env() {
        env::set_var("IMAPDU_TEST_PASSWD", "hunter2");
        let source = PasswordSource::Env("IMAPDU_TEST_PASSWD".into());
        assert_eq!(source.get().unwrap(), "hunter2");
    }

    #[test]
    fn password_from_missing_env_fails() {
        let source = PasswordSource::Env("IMAPDU_TEST_UNSET".into());
        assert!(source.get().is_err());
    }

    #[test]
    fn password_from_file_takes_first_line() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "password\ntrailing garbage\n").unwrap();
        let source = PasswordSource::File(file.path().to_owned());
        assert_eq!(source.get().unwrap(), "password");
    }

    #[test]
    fn password_from_cmd_trims_trailing_newline() {
        let source = PasswordSource::Cmd("echo 'password'".into());
        assert_eq!(source.get().unwrap(), "password");
    }

    #[test]
    fn password_from_failing_cmd_fails() {
        let source = PasswordSource::Cmd("exit 1".into());
        assert!(source.get().is_err());
    }
}
