use color_eyre::{eyre::Context, Result};
use tracing::{debug, warn};

use crate::folder::{sequence_sets, FolderStats, FolderUsage};

/// Number of sequence-set atoms sent per FETCH command, so a sparse
/// SEARCH result never produces an unbounded command line.
const ATOMS_PER_FETCH: usize = 200;

/// An authenticated session with one IMAP server.
///
/// All commands are blocking and issued one at a time; folders are
/// measured strictly in enumeration order.
pub struct ImapSession {
    sess: imap::Session<imap::Connection>,
}

impl ImapSession {
    /// Connects to the server, plain or TLS, and logs in.
    pub fn connect(host: &str, port: u16, tls: bool, user: &str, passwd: &str) -> Result<Self> {
        let mode = if tls {
            imap::ConnectionMode::Tls
        } else {
            imap::ConnectionMode::Plaintext
        };

        debug!(host, port, ?mode, "connecting to IMAP server");
        let client = imap::ClientBuilder::new(host, port)
            .mode(mode)
            .connect()
            .with_context(|| format!("cannot connect to IMAP server {host}:{port}"))?;

        debug!(user, "logging in");
        let sess = client
            .login(user, passwd)
            .map_err(|err| err.0)
            .with_context(|| format!("cannot login to IMAP server {host} as {user}"))?;

        Ok(Self { sess })
    }

    /// Lists all folder names, in the order the server returns them.
    ///
    /// A failing LIST degrades to an empty list.
    pub fn list_folders(&mut self) -> Vec<String> {
        match self.sess.list(Some(""), Some("*")) {
            Ok(names) => names.iter().map(|name| name.name().to_owned()).collect(),
            Err(err) => {
                warn!("cannot list folders: {err}");
                Vec::new()
            }
        }
    }

    /// Measures one folder: message count, total size and biggest
    /// message size, from a read-only EXAMINE + SEARCH ALL + FETCH
    /// RFC822.SIZE sequence.
    ///
    /// The FETCH covers exactly the searched sequence numbers, so the
    /// aggregate matches the search population even when sequence
    /// numbers are not contiguous.
    pub fn folder_usage(&mut self, folder: &str) -> FolderUsage {
        let mailbox = match self.sess.examine(folder) {
            Ok(mailbox) => mailbox,
            Err(err) => return FolderUsage::Unavailable(format!("cannot examine folder: {err}")),
        };
        if mailbox.exists == 0 {
            return FolderUsage::Empty;
        }

        let ids = match self.sess.search("ALL") {
            Ok(ids) => ids,
            Err(err) => return FolderUsage::Unavailable(format!("cannot search folder: {err}")),
        };
        if ids.is_empty() {
            return FolderUsage::Empty;
        }

        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        if ids.len() as u32 != mailbox.exists {
            debug!(
                folder,
                searched = ids.len(),
                exists = mailbox.exists,
                "SEARCH and EXAMINE disagree on message count"
            );
        }

        let mut sizes = Vec::with_capacity(ids.len());
        for set in sequence_sets(&ids, ATOMS_PER_FETCH) {
            let fetches = match self.sess.fetch(&set, "RFC822.SIZE") {
                Ok(fetches) => fetches,
                Err(err) => {
                    return FolderUsage::Unavailable(format!("cannot fetch sizes: {err}"))
                }
            };
            for fetch in fetches.iter() {
                match fetch.size {
                    Some(size) => sizes.push(size),
                    None => {
                        return FolderUsage::Unavailable(format!(
                            "message {} has no RFC822.SIZE",
                            fetch.message
                        ))
                    }
                }
            }
        }

        if sizes.len() != ids.len() {
            return FolderUsage::Unavailable(format!(
                "fetched {} sizes for {} messages",
                sizes.len(),
                ids.len()
            ));
        }

        FolderUsage::Measured(FolderStats::from_sizes(&sizes))
    }

    /// Closes the examined folder and logs out, ignoring errors.
    pub fn logout(&mut self) {
        if let Err(err) = self.sess.close() {
            debug!("cannot close folder: {err}");
        }
        if let Err(err) = self.sess.logout() {
            debug!("cannot logout: {err}");
        }
    }
}
