//! Process identifiers.

use std::fmt;

/// Slot of a registered process inside the environment: the N-th process
/// handed to the environment is `ProcessId(N)`.
///
/// Registration order is also the tie-break for processes due at the same
/// instant, so ids order the same way as registration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessId({})", self.0)
    }
}

impl TryFrom<usize> for ProcessId {
    type Error = std::num::TryFromIntError;

    fn try_from(n: usize) -> Result<ProcessId, Self::Error> {
        u32::try_from(n).map(ProcessId)
    }
}
