//! > An HTTP static file server for a fixed directory
//!
//! `site-serve` serves the files beneath a single base directory over
//! HTTP/1.x.  It prioritizes small size and compile times over speed,
//! scalability, or security.
//!
//! # Example
//!
//! ```rust,no_run
//! let path = std::env::current_dir().unwrap();
//! let server = site_serve::Server::new(&path);
//!
//! println!("Serving {}", path.display());
//! println!("See http://{}", server.addr());
//! println!("Hit CTRL-C to stop");
//!
//! server.serve().unwrap();
//! ```

use std::sync::{RwLock, TryLockError};

mod error;
mod handler;
mod listing;
mod path;

pub use error::Error;

/// Custom server settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerBuilder {
    source: std::path::PathBuf,
    hostname: Option<String>,
    port: Option<u16>,
}

impl ServerBuilder {
    pub fn new(source: impl Into<std::path::PathBuf>) -> Self {
        Self {
            source: source.into(),
            hostname: None,
            port: None,
        }
    }

    /// Override the hostname
    pub fn hostname(&mut self, hostname: impl Into<String>) -> &mut Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Override the port
    ///
    /// By default, the first available port is selected.
    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    /// Create a server
    ///
    /// This is needed for accessing the dynamically assigned port
    pub fn build(&self) -> Server {
        let source = self.source.clone();
        let hostname = self.hostname.as_deref().unwrap_or("localhost");
        let port = self
            .port
            .or_else(|| get_available_port(hostname))
            // Just have `serve` error out
            .unwrap_or(3000);

        Server {
            source,
            addr: format!("{}:{}", hostname, port),
            server: RwLock::new(None),
        }
    }

    /// Bind and run the server
    pub fn serve(&self) -> Result<(), Error> {
        self.build().serve()
    }
}

pub struct Server {
    source: std::path::PathBuf,
    addr: String,
    server: RwLock<Option<tiny_http::Server>>,
}

impl Server {
    /// Serve on the first available port on localhost
    pub fn new(source: impl Into<std::path::PathBuf>) -> Self {
        ServerBuilder::new(source).build()
    }

    /// The location being served
    pub fn source(&self) -> &std::path::Path {
        self.source.as_path()
    }

    /// The address the server is available at
    ///
    /// This is useful for telling users how to access the served up files since the port is
    /// dynamically assigned by default.
    pub fn addr(&self) -> &str {
        self.addr.as_str()
    }

    /// Whether the server was running at the instant the call happened
    pub fn is_running(&self) -> bool {
        matches!(self.server.read().as_deref(), Ok(Some(_)))
    }

    /// Bind the listening socket without serving any requests
    ///
    /// Fails with [`Error::Directory`] when the base directory is missing and
    /// with [`Error::Bind`] when the address is in use or otherwise cannot be
    /// bound.  Calling it a second time while the socket is held is an error.
    pub fn start(&self) -> Result<(), Error> {
        match self.server.try_write().as_deref_mut() {
            Ok(slot @ None) => {
                *slot = Some(self.bind()?);
                Ok(())
            }
            Ok(Some(_)) | Err(TryLockError::WouldBlock) => Err(Error::AlreadyRunning),
            Err(TryLockError::Poisoned(_)) => Err(Error::Poisoned),
        }
    }

    /// Accept and answer requests until [`Server::close`] releases the socket
    ///
    /// Binds first when [`Server::start`] has not run yet.  Per-request
    /// failures are answered on their own connection and logged; they never
    /// end the loop.  Returns `Ok(())` once the socket has been released,
    /// since closing is the designed way to stop serving.
    pub fn serve(&self) -> Result<(), Error> {
        match self.server.try_write().as_deref_mut() {
            Ok(slot @ None) => {
                *slot = Some(self.bind()?);
            }
            // already bound by an earlier `start` call
            Ok(Some(_)) => {}
            Err(TryLockError::WouldBlock) => return Err(Error::AlreadyRunning),
            Err(TryLockError::Poisoned(_)) => return Err(Error::Poisoned),
        }

        {
            let server = self.server.read().map_err(|_| Error::Poisoned)?;
            // unwrap is safe here, the slot was filled above
            for request in server.as_ref().unwrap().incoming_requests() {
                if let Err(e) = handler::handle(self.source(), request) {
                    log::error!("{}", e);
                }
            }
        }

        *self.server.write().map_err(|_| Error::Poisoned)? = None;

        Ok(())
    }

    /// Closes the server gracefully
    ///
    /// Idempotent, and safe to call from another thread (say, an interrupt
    /// handler) while `serve` is blocked; the serve loop observes the closed
    /// socket and returns.
    pub fn close(&self) {
        if let Ok(Some(server)) = self.server.read().as_deref() {
            server.unblock();
        }
    }

    fn bind(&self) -> Result<tiny_http::Server, Error> {
        if !self.source.is_dir() {
            return Err(Error::Directory {
                path: self.source.clone(),
            });
        }
        tiny_http::Server::http(self.addr()).map_err(|e| Error::Bind {
            addr: self.addr.clone(),
            reason: e.to_string(),
        })
    }
}

fn get_available_port(host: &str) -> Option<u16> {
    // Start after "well-known" ports (0 to 1023) as they require superuser
    // privileges on UNIX-like operating systems.
    (1024..9000).find(|port| port_is_available(host, *port))
}

fn port_is_available(host: &str, port: u16) -> bool {
    std::net::TcpListener::bind((host, port)).is_ok()
}
