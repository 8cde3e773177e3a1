use thiserror::Error;
use tracing::debug;

use crate::store::{KeyValueBackend, Store};

const ADMIN_ID: &str = "jihan";
const ADMIN_PW: &str = "1234";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("the id or password does not match")]
    Rejected,
    #[error("the administrator id or password does not match")]
    AdminRejected,
}

/// Compares a submitted password against the stored one.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, stored: &str, submitted: &str) -> bool;
}

/// Stored passwords are plaintext; matching is exact string equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, stored: &str, submitted: &str) -> bool {
        stored == submitted
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuthGate<V = PlaintextVerifier> {
    verifier: V,
}

impl AuthGate<PlaintextVerifier> {
    pub fn plaintext() -> Self {
        Self {
            verifier: PlaintextVerifier,
        }
    }
}

impl<V: CredentialVerifier> AuthGate<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Checks against the staff collection as currently stored, so accounts
    /// added since startup are honored.
    pub fn login_staff<B: KeyValueBackend>(
        &self,
        store: &Store<B>,
        id: &str,
        pw: &str,
    ) -> Result<(), AuthError> {
        let matched = store
            .read_staff()
            .iter()
            .any(|account| account.id == id && self.verifier.verify(&account.pw, pw));
        debug!(id, matched, "staff login attempt");
        if matched {
            Ok(())
        } else {
            Err(AuthError::Rejected)
        }
    }

    pub fn login_admin(&self, id: &str, pw: &str) -> Result<(), AuthError> {
        if id == ADMIN_ID && self.verifier.verify(ADMIN_PW, pw) {
            Ok(())
        } else {
            Err(AuthError::AdminRejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AuthError, AuthGate, CredentialVerifier};
    use crate::model::StaffAccount;
    use crate::records::RecordService;
    use crate::store::{MemoryBackend, Store};

    #[tokio::test]
    async fn registered_staff_can_log_in_without_reload() {
        let store = Store::new(MemoryBackend::new());
        store.initialize().expect("initialize should succeed");
        let records = RecordService::new(store).with_latency(Duration::ZERO);
        let gate = AuthGate::plaintext();

        for (id, pw) in [("park", "p@ss"), ("choi", "0000"), ("한글아이디", "비번")] {
            assert_eq!(
                gate.login_staff(records.store(), id, pw),
                Err(AuthError::Rejected)
            );
            records
                .add_staff(StaffAccount::new(id, pw))
                .await
                .expect("staff should add");
            gate.login_staff(records.store(), id, pw)
                .expect("new account should log in");
            assert_eq!(
                gate.login_staff(records.store(), id, "wrong"),
                Err(AuthError::Rejected)
            );
        }
    }

    #[test]
    fn master_seed_account_logs_in() {
        let store = Store::new(MemoryBackend::new());
        AuthGate::plaintext()
            .login_staff(&store, "bestteameden", "1234")
            .expect("seed account should log in even before initialize");
    }

    #[test]
    fn admin_pair_is_separate_from_staff() {
        let gate = AuthGate::plaintext();
        gate.login_admin("jihan", "1234").expect("admin should log in");
        assert_eq!(
            gate.login_admin("bestteameden", "1234"),
            Err(AuthError::AdminRejected)
        );
        let store = Store::new(MemoryBackend::new());
        assert_eq!(
            gate.login_staff(&store, "jihan", "1234"),
            Err(AuthError::Rejected)
        );
    }

    #[test]
    fn custom_verifier_is_used() {
        struct Reversed;
        impl CredentialVerifier for Reversed {
            fn verify(&self, stored: &str, submitted: &str) -> bool {
                stored.chars().rev().collect::<String>() == submitted
            }
        }

        let store = Store::new(MemoryBackend::new());
        let gate = AuthGate::new(Reversed);
        gate.login_staff(&store, "bestteameden", "4321")
            .expect("reversed password should match");
        assert!(gate.login_staff(&store, "bestteameden", "1234").is_err());
    }
}
