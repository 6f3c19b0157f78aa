//! Cooperative shutdown flag
//!
//! Signal handlers only flip the flag; the poll loop checks it before every
//! tick and after every sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Process-wide "please stop" flag shared between signal listeners and the loop
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop at its next check
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Install Ctrl+C (and SIGTERM on Unix) handlers, then spawn a task that
    /// sets this flag when one arrives
    ///
    /// The handlers are registered before this returns, so a signal sent
    /// while the runtime is still busy with startup is not lost. Must be
    /// called from inside a Tokio runtime.
    pub fn listen_for_signals(&self) {
        let signals = Signals::install();
        if !signals.is_installed() {
            warn!("No shutdown signal could be installed, the loop can only be killed");
        }
        let flag = self.clone();
        tokio::spawn(async move {
            signals.recv().await;
            info!("Shutdown signal received");
            flag.request();
        });
    }
}

/// Registered signal streams
#[cfg(unix)]
struct Signals {
    interrupt: Option<tokio::signal::unix::Signal>,
    terminate: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl Signals {
    fn install() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let install = |kind: SignalKind, name: &str| match signal(kind) {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Failed to install {} handler: {}", name, e);
                None
            }
        };

        Self {
            interrupt: install(SignalKind::interrupt(), "SIGINT"),
            terminate: install(SignalKind::terminate(), "SIGTERM"),
        }
    }

    fn is_installed(&self) -> bool {
        self.interrupt.is_some() || self.terminate.is_some()
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = recv_or_pend(self.interrupt.as_mut()) => {}
            _ = recv_or_pend(self.terminate.as_mut()) => {}
        }
    }
}

#[cfg(unix)]
async fn recv_or_pend(stream: Option<&mut tokio::signal::unix::Signal>) {
    match stream {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
struct Signals {
    ctrl_c: Option<tokio::signal::windows::CtrlC>,
}

#[cfg(not(unix))]
impl Signals {
    fn install() -> Self {
        let ctrl_c = match tokio::signal::windows::ctrl_c() {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
                None
            }
        };
        Self { ctrl_c }
    }

    fn is_installed(&self) -> bool {
        self.ctrl_c.is_some()
    }

    async fn recv(mut self) {
        match self.ctrl_c.as_mut() {
            Some(stream) => {
                stream.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_is_shared_between_clones() {
        let flag = ShutdownFlag::new();
        let other = flag.clone();

        assert!(!other.is_requested());
        flag.request();
        assert!(other.is_requested());
    }

    #[tokio::test]
    async fn test_handlers_are_installed_synchronously() {
        assert!(Signals::install().is_installed());

        let flag = ShutdownFlag::new();
        flag.listen_for_signals();
        tokio::task::yield_now().await;
        assert!(!flag.is_requested());
    }
}
