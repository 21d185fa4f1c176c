/// Shared-secret check guarding privileged operations
#[derive(Debug, Clone)]
pub struct PrivilegeGate {
    secret: String,
}

impl PrivilegeGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        candidate == self.secret
    }
}

/// Capabilities of one user session, threaded into every privileged call.
///
/// Starts unprivileged; once granted, privilege lasts for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    privileged: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn privileged() -> Self {
        Self { privileged: true }
    }

    /// Opens the gate on a matching secret; a mismatch leaves it unchanged.
    pub fn request_privilege(&mut self, gate: &PrivilegeGate, secret: &str) -> bool {
        if gate.verify(secret) {
            self.privileged = true;
            log::info!("Admin mode enabled");
            true
        } else {
            log::warn!("Admin login rejected");
            false
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }
}

/// Explicit answer to "are you sure?" for destructive operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_secret_keeps_gate_closed() {
        let gate = PrivilegeGate::new("open-sesame");
        let mut session = Session::new();

        assert!(!session.request_privilege(&gate, "guess"));
        assert!(!session.is_privileged());
    }

    #[test]
    fn test_privilege_survives_later_failed_attempt() {
        let gate = PrivilegeGate::new("open-sesame");
        let mut session = Session::new();

        assert!(session.request_privilege(&gate, "open-sesame"));
        assert!(!session.request_privilege(&gate, "guess"));
        assert!(session.is_privileged());
    }
}
