//! Session and navigation state for one sitting at the tool.
//!
//! Nothing here is persisted; `logout` drops every result along with the
//! session flags.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::auth::{AuthError, AuthGate, CredentialVerifier};
use crate::model::{AdEconomicsReport, ScenePlanItem, ScriptResult};
use crate::store::{KeyValueBackend, Store};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    ScriptGenerator,
    ScenePlanMaker,
    MetaCalculator,
    ProposalGenerator,
    AdminPage,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ScriptGenerator => "SCRIPT_GENERATOR",
            Self::ScenePlanMaker => "SCENE_PLAN_MAKER",
            Self::MetaCalculator => "META_CALCULATOR",
            Self::ProposalGenerator => "PROPOSAL_GENERATOR",
            Self::AdminPage => "ADMIN_PAGE",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub staff: bool,
    pub admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("log in with a staff account first")]
    NotAuthenticated,
    #[error("this operation requires the administrator login")]
    AdminRequired,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    session: Session,
    tab: Tab,
    transferred_script: Option<String>,
    last_script: Option<ScriptResult>,
    last_scene_plan: Option<Vec<ScenePlanItem>>,
    last_economics: Option<AdEconomicsReport>,
    last_proposal: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn transferred_script(&self) -> Option<&str> {
        self.transferred_script.as_deref()
    }

    pub fn last_script(&self) -> Option<&ScriptResult> {
        self.last_script.as_ref()
    }

    pub fn last_scene_plan(&self) -> Option<&[ScenePlanItem]> {
        self.last_scene_plan.as_deref()
    }

    pub fn last_economics(&self) -> Option<&AdEconomicsReport> {
        self.last_economics.as_ref()
    }

    pub fn last_proposal(&self) -> Option<&str> {
        self.last_proposal.as_deref()
    }

    pub fn login_staff<V, B>(
        &mut self,
        gate: &AuthGate<V>,
        store: &Store<B>,
        id: &str,
        pw: &str,
    ) -> Result<(), AuthError>
    where
        V: CredentialVerifier,
        B: KeyValueBackend,
    {
        gate.login_staff(store, id, pw)?;
        self.session.staff = true;
        info!(id, "staff session opened");
        Ok(())
    }

    pub fn login_admin<V: CredentialVerifier>(
        &mut self,
        gate: &AuthGate<V>,
        id: &str,
        pw: &str,
    ) -> Result<(), AuthError> {
        gate.login_admin(id, pw)?;
        self.session.admin = true;
        info!("admin session opened");
        Ok(())
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn require_staff(&self) -> Result<(), ShellError> {
        if self.session.staff {
            Ok(())
        } else {
            Err(ShellError::NotAuthenticated)
        }
    }

    pub fn require_admin(&self) -> Result<(), ShellError> {
        if self.session.admin {
            Ok(())
        } else {
            Err(ShellError::AdminRequired)
        }
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), ShellError> {
        self.require_staff()?;
        self.tab = tab;
        Ok(())
    }

    /// Hands a finished script to the scene-plan tab and switches to it.
    pub fn transfer_to_scene_plan(&mut self, script: impl Into<String>) -> Result<(), ShellError> {
        self.require_staff()?;
        self.transferred_script = Some(script.into());
        self.tab = Tab::ScenePlanMaker;
        Ok(())
    }

    pub fn record_script(&mut self, result: ScriptResult) {
        self.last_script = Some(result);
    }

    pub fn record_scene_plan(&mut self, plan: Vec<ScenePlanItem>) {
        self.last_scene_plan = Some(plan);
    }

    pub fn record_economics(&mut self, report: AdEconomicsReport) {
        self.last_economics = Some(report);
    }

    pub fn record_proposal(&mut self, html: String) {
        self.last_proposal = Some(html);
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, ShellError, Tab};
    use crate::auth::{AuthError, AuthGate};
    use crate::model::ScriptResult;
    use crate::store::{MemoryBackend, Store};

    fn logged_in() -> AppState {
        let store = Store::new(MemoryBackend::new());
        let mut state = AppState::new();
        state
            .login_staff(&AuthGate::plaintext(), &store, "bestteameden", "1234")
            .expect("seed account should log in");
        state
    }

    #[test]
    fn navigation_requires_staff_session() {
        let mut state = AppState::new();
        assert_eq!(
            state.select_tab(Tab::MetaCalculator),
            Err(ShellError::NotAuthenticated)
        );
        assert_eq!(
            state.transfer_to_scene_plan("대본"),
            Err(ShellError::NotAuthenticated)
        );
        assert_eq!(state.tab(), Tab::ScriptGenerator);
    }

    #[test]
    fn transfer_switches_to_scene_plan_tab() {
        let mut state = logged_in();
        state
            .transfer_to_scene_plan("모공 방치하면 끝남!!")
            .expect("transfer should succeed");
        assert_eq!(state.tab(), Tab::ScenePlanMaker);
        assert_eq!(state.transferred_script(), Some("모공 방치하면 끝남!!"));
    }

    #[test]
    fn admin_flag_is_independent_of_staff_login() {
        let mut state = logged_in();
        assert_eq!(state.require_admin(), Err(ShellError::AdminRequired));
        assert_eq!(
            state.login_admin(&AuthGate::plaintext(), "bestteameden", "1234"),
            Err(AuthError::AdminRejected)
        );
        state
            .login_admin(&AuthGate::plaintext(), "jihan", "1234")
            .expect("admin credentials should be accepted");
        assert!(state.require_admin().is_ok());
    }

    #[test]
    fn logout_resets_everything() {
        let mut state = logged_in();
        state.select_tab(Tab::AdminPage).expect("staff can navigate");
        state
            .login_admin(&AuthGate::plaintext(), "jihan", "1234")
            .expect("admin login");
        state.record_script(ScriptResult {
            hook_strategy: String::new(),
            keyword_strategy: String::new(),
            hook_type: String::new(),
            flow_type: String::new(),
            char_count: 0,
            full_script: "x".to_owned(),
            success_points: String::new(),
        });
        state.record_proposal("<html></html>".to_owned());

        state.logout();
        assert_eq!(state, AppState::new());
        assert_eq!(state.tab(), Tab::ScriptGenerator);
        assert!(!state.session().staff && !state.session().admin);
        assert!(state.last_script().is_none());
    }
}
