/// Signal handling for the abort window.
///
/// SIGINT (Ctrl-C) and SIGTERM are treated identically: each sets the shared
/// abort flag and returns. Neither terminates the process directly, so an
/// abort is always observed and reported by the countdown loop rather than
/// by a handler mid-flight.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::debug;

/// Shared abort flag crossing the signal boundary.
///
/// A single word that only ever transitions false -> true, set by the signal
/// listener tasks and read by the countdown loop. Cloning shares the same
/// underlying flag.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an abort. Idempotent: setting an already-set flag is a no-op.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Errors that can occur while installing signal listeners.
#[derive(Debug)]
pub enum SignalError {
    /// Failed to register the OS signal stream.
    Install {
        signal: &'static str,
        source: std::io::Error,
    },
}

impl std::fmt::Display for SignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalError::Install { signal, source } => {
                write!(f, "failed to install {} listener: {}", signal, source)
            }
        }
    }
}

impl std::error::Error for SignalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SignalError::Install { source, .. } => Some(source),
        }
    }
}

/// Install SIGINT and SIGTERM listeners that set `flag` when delivered.
///
/// Must be called from within a tokio runtime. Listeners stay installed for
/// the life of the process; repeated deliveries just re-set the flag.
pub fn install(flag: &AbortFlag) -> Result<(), SignalError> {
    spawn_listener(SignalKind::interrupt(), "SIGINT", flag.clone())?;
    spawn_listener(SignalKind::terminate(), "SIGTERM", flag.clone())?;
    Ok(())
}

fn spawn_listener(
    kind: SignalKind,
    name: &'static str,
    flag: AbortFlag,
) -> Result<(), SignalError> {
    let mut stream = signal(kind).map_err(|source| SignalError::Install {
        signal: name,
        source,
    })?;
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            debug!(signal = name, "cancellation signal received");
            flag.set();
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_unset() {
        let flag = AbortFlag::new();
        assert!(!flag.is_set());
    }

    #[test]
    fn test_set_is_idempotent() {
        let flag = AbortFlag::new();
        flag.set();
        assert!(flag.is_set());
        // Second set has no additional effect
        flag.set();
        assert!(flag.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = AbortFlag::new();
        let seen_by_loop = flag.clone();
        assert!(!seen_by_loop.is_set());
        flag.set();
        assert!(seen_by_loop.is_set());
    }

    #[tokio::test]
    async fn test_install_succeeds_on_runtime() {
        let flag = AbortFlag::new();
        install(&flag).expect("listener installation failed");
        assert!(!flag.is_set());
    }
}
