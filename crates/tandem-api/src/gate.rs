//! Join gate: a single shared password in front of the room.
//!
//! This keeps casual visitors out. It is not authentication: there are no
//! sessions or tokens, and every other endpoint is reachable without it.

#[derive(Clone, Default)]
pub struct JoinGate {
    password: Option<String>,
}

impl JoinGate {
    /// `None` (or an empty password) leaves the gate open.
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_none()
    }

    pub fn admits(&self, attempt: &str) -> bool {
        match &self.password {
            None => true,
            Some(expected) => expected == attempt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_gate_admits_anyone() {
        let gate = JoinGate::new(None);
        assert!(gate.is_open());
        assert!(gate.admits(""));
        assert!(JoinGate::new(Some(String::new())).is_open());
    }

    #[test]
    fn closed_gate_checks_password() {
        let gate = JoinGate::new(Some("hunter2".into()));
        assert!(!gate.is_open());
        assert!(gate.admits("hunter2"));
        assert!(!gate.admits("hunter3"));
    }
}
