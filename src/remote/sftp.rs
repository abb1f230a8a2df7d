//! SFTP-backed [`RemoteFs`] over an ssh2 session (requires `ssh` feature).
//!
//! One TCP connection carries one SSH session carrying one SFTP channel,
//! reused for every operation of an invocation.

use super::{FileAttr, RemoteFs};
use crate::error::{Error, Result};
use ssh2::{ErrorCode, FileStat, Session, Sftp};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

// SFTP status codes (draft-ietf-secsh-filexfer-02)
const FX_NO_SUCH_FILE: i32 = 2;
const FX_NO_SUCH_PATH: i32 = 10;

/// Connection settings for [`SftpSession::connect`].
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `host` | `localhost` |
/// | `port` | 22 |
/// | `password` | `None` |
/// | `timeout` | `None` (block indefinitely) |
#[derive(Clone)]
pub struct SessionConfig {
    /// Host name or address to connect to
    pub host: String,
    /// TCP port
    pub port: u16,
    /// User to authenticate as
    pub username: String,
    /// Password, tried after the ssh agent
    pub password: Option<String>,
    /// Timeout for the TCP connect and for blocking session calls
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SessionConfig {
    /// Settings for `username` at `localhost:22`
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 22,
            username: username.into(),
            password: None,
            timeout: None,
        }
    }

    /// Set the host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the password
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the session timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn session_error(context: impl Into<String>) -> impl FnOnce(ssh2::Error) -> Error {
    let context = context.into();
    move |e| Error::Session {
        context,
        source: e.into(),
    }
}

/// An authenticated SFTP session.
pub struct SftpSession {
    // Field order matters: the SFTP channel must be dropped before its session.
    sftp: Sftp,
    _session: Session,
}

impl SftpSession {
    /// Connect, handshake, authenticate and open the SFTP subsystem.
    ///
    /// Authentication tries the ssh agent first (when `SSH_AUTH_SOCK` is
    /// set), then the password if one was given. The server's host key is
    /// not verified.
    ///
    /// # Errors
    ///
    /// - TCP connect, handshake or subsystem start fails ([`Error::Session`])
    /// - No method was accepted ([`Error::Authentication`])
    pub fn connect(config: &SessionConfig) -> Result<Self> {
        let addr = config.address();
        let tcp = open_tcp(&addr, config.timeout).map_err(|source| Error::Session {
            context: format!("unable to connect to [{addr}]"),
            source,
        })?;

        let mut session = Session::new().map_err(session_error("unable to create ssh session"))?;
        session.set_tcp_stream(tcp);
        if let Some(timeout) = config.timeout {
            session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        }
        session
            .handshake()
            .map_err(session_error(format!("ssh handshake with [{addr}] failed")))?;

        authenticate(&session, config)?;

        let sftp = session
            .sftp()
            .map_err(session_error("unable to start sftp subsystem"))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%addr, user = %config.username, "sftp session established");

        Ok(Self {
            sftp,
            _session: session,
        })
    }
}

/// Connect to `addr`, bounding each attempt by `timeout` when one is set.
///
/// Every resolved address is tried in turn; the last failure is returned.
fn open_tcp(addr: &str, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let Some(timeout) = timeout else {
        return TcpStream::connect(addr);
    };

    let mut last_error = None;
    for socket_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("no addresses resolved for {addr}"))
    }))
}

fn authenticate(session: &Session, config: &SessionConfig) -> Result<()> {
    let mut attempted = Vec::new();

    if std::env::var_os("SSH_AUTH_SOCK").is_some() {
        attempted.push("agent");
        if let Err(_e) = session.userauth_agent(&config.username) {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "agent authentication rejected");
        }
    }

    if let Some(password) = config.password.as_deref().filter(|_| !session.authenticated()) {
        attempted.push("password");
        if let Err(_e) = session.userauth_password(&config.username, password) {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_e, "password authentication rejected");
        }
    }

    if session.authenticated() {
        Ok(())
    } else {
        Err(Error::Authentication {
            username: config.username.clone(),
            attempted,
        })
    }
}

fn is_no_such_file(error: &ssh2::Error) -> bool {
    matches!(
        error.code(),
        ErrorCode::SFTP(FX_NO_SUCH_FILE) | ErrorCode::SFTP(FX_NO_SUCH_PATH)
    )
}

impl From<&FileStat> for FileAttr {
    fn from(stat: &FileStat) -> Self {
        Self {
            is_dir: stat.is_dir(),
            size: stat.size.unwrap_or(0),
            modified: stat.mtime.map(|secs| UNIX_EPOCH + Duration::from_secs(secs)),
        }
    }
}

impl RemoteFs for SftpSession {
    type File = ssh2::File;

    fn stat(&self, path: &Path) -> io::Result<Option<FileAttr>> {
        match self.sftp.stat(path) {
            Ok(stat) => Ok(Some(FileAttr::from(&stat))),
            Err(e) if is_no_such_file(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if !matches!(component, Component::Normal(_) | Component::ParentDir) {
                continue;
            }

            match self.stat(&current)? {
                Some(attr) if attr.is_dir => continue,
                Some(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("not a directory: {}", current.display()),
                    ));
                }
                None => {
                    if let Err(e) = self.sftp.mkdir(&current, 0o755) {
                        // Lost a race with another writer; fine as long as it is a directory now.
                        match self.stat(&current) {
                            Ok(Some(attr)) if attr.is_dir => {}
                            _ => return Err(e.into()),
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<ssh2::File> {
        self.sftp.create(path).map_err(io::Error::from)
    }
}
