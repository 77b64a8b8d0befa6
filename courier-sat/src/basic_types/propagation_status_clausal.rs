#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PropagationStatusClausal {
    NoConflictDetected,
    ConflictDetected { reason_code: u32 },
}
