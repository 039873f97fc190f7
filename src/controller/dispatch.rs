//! Wipe confirmation gate
//!
//! A wipe can only be dispatched with a [`ConfirmedWipe`], and the only way to
//! obtain one is to confirm a [`PendingWipe`].

/// A wipe request waiting for the operator's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWipe {
    machine_id: String,
}

impl PendingWipe {
    pub(crate) fn new(machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    /// Question shown to the operator before anything is sent.
    pub fn prompt(&self) -> String {
        format!(
            "ARE YOU ABSOLUTELY SURE?\n\nThis will issue a WIPE command to: {}",
            self.machine_id
        )
    }

    pub fn confirm(self) -> ConfirmedWipe {
        ConfirmedWipe {
            machine_id: self.machine_id,
        }
    }
}

/// A wipe the operator has agreed to.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedWipe {
    machine_id: String,
}

impl ConfirmedWipe {
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_target() {
        let pending = PendingWipe::new("a1:b2:c3:d4:e5:f6");
        assert_eq!(
            pending.prompt(),
            "ARE YOU ABSOLUTELY SURE?\n\nThis will issue a WIPE command to: a1:b2:c3:d4:e5:f6"
        );
        assert_eq!(pending.confirm().machine_id(), "a1:b2:c3:d4:e5:f6");
    }
}
