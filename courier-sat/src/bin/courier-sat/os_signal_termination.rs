use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use courier_sat::engine::termination::TerminationCondition;
use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;

/// Stops the current check once the process received SIGINT or SIGTERM. The optimisation loop
/// then reports the best routes found so far.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    interrupted: Arc<AtomicBool>,
}

impl OsSignal {
    /// Registers the signal handlers; they stay installed for the rest of the process.
    pub(crate) fn install() -> std::io::Result<OsSignal> {
        let interrupted = Arc::new(AtomicBool::new(false));

        for signal in [SIGINT, SIGTERM] {
            let _ = signal_hook::flag::register(signal, Arc::clone(&interrupted))?;
        }

        Ok(OsSignal { interrupted })
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}
