//! Session identity and the per-command access gate.
//!
//! The session is the client's cached belief about who is logged in: a
//! bearer token plus the user record returned at login. Token validity is
//! judged only by the `exp` claim in the token payload; the signature is
//! never checked here, the backend does that.

use crate::models::{AuthPayload, Role, User};
use crate::storage::{keys, Storage};
use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Claims read from a JWT payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying it
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// A token is live while its `exp` claim lies in the future. Tokens without
/// a readable `exp` are treated as expired.
pub fn token_is_live(token: &str, now: DateTime<Utc>) -> bool {
    let now_secs = now.timestamp_millis() as f64 / 1000.0;
    decode_claims(token)
        .and_then(|c| c.exp)
        .is_some_and(|exp| exp as f64 > now_secs)
}

/// Snapshot the gate evaluates against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Session restore has not finished yet
    pub loading: bool,
    pub user: Option<User>,
    pub token_live: bool,
}

impl SessionSnapshot {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            loading: false,
            user: Some(user),
            token_live: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token_live
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_owner(&self) -> bool {
        self.role() == Some(Role::Owner)
    }
}

/// Reads and writes the session keys of local storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Storage,
}

impl SessionStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        match self.storage.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                eprintln!("Warning: could not read stored token: {}", e);
                None
            }
        }
    }

    /// The cached user record; unreadable data counts as no user
    pub fn current_user(&self) -> Option<User> {
        match self.storage.get_json::<User>(keys::USER) {
            Ok(user) => user,
            Err(e) => {
                eprintln!("Warning: ignoring stored user record: {:#}", e);
                None
            }
        }
    }

    pub fn save(&self, auth: &AuthPayload) -> Result<()> {
        self.storage.set(keys::TOKEN, &auth.token)?;
        self.save_user(&auth.user)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        self.storage.set_json(keys::USER, user)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(keys::TOKEN)?;
        self.storage.remove(keys::USER)
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.token().is_some_and(|t| token_is_live(&t, now))
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    /// Rebuild the session at startup. A cached user with a live token is
    /// signed in; anything else clears the stored credentials.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<SessionSnapshot> {
        match self.current_user() {
            Some(user) if self.is_authenticated(now) => Ok(SessionSnapshot::signed_in(user)),
            _ => {
                self.clear()?;
                Ok(SessionSnapshot::anonymous())
            }
        }
    }

    /// Re-read the stored state without clearing anything
    pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            loading: false,
            user: self.current_user(),
            token_live: self.is_authenticated(now),
        }
    }
}

/// Access predicate attached to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Public,
    Protected,
    Roles(&'static [Role]),
}

impl Guard {
    pub fn allows(&self, role: Option<Role>) -> bool {
        match self {
            Self::Public | Self::Protected => true,
            Self::Roles(roles) => role.is_some_and(|r| roles.contains(&r)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Loading,
    Render,
    RedirectLogin,
    RedirectHome,
}

impl GateOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Render => "render",
            Self::RedirectLogin => "redirect_login",
            Self::RedirectHome => "redirect_home",
        }
    }
}

/// The decision table: loading wins, then authentication, then role
pub fn decide(loading: bool, authenticated: bool, authorized: bool) -> GateOutcome {
    if loading {
        GateOutcome::Loading
    } else if !authenticated {
        GateOutcome::RedirectLogin
    } else if !authorized {
        GateOutcome::RedirectHome
    } else {
        GateOutcome::Render
    }
}

/// Evaluate a guard against the current snapshot. Every navigation is
/// judged on its own; nothing is remembered between calls.
pub fn evaluate(guard: Guard, snapshot: &SessionSnapshot) -> GateOutcome {
    if guard == Guard::Public {
        return GateOutcome::Render;
    }
    decide(
        snapshot.loading,
        snapshot.is_authenticated(),
        guard.allows(snapshot.role()),
    )
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// An unsigned token whose payload carries the given expiry
    pub fn token_expiring_at(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::json!({ "sub": "lan@example.com", "role": "USER", "exp": exp, "iat": 0 })
                .to_string(),
        );
        format!("{}.{}.signature", header, payload)
    }

    pub fn user(role: Role) -> User {
        User {
            id: 1,
            full_name: "Lan Pham".to_string(),
            email: "lan@example.com".to_string(),
            phone: "0901234567".to_string(),
            role,
            created_at: "2024-01-01T00:00:00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{token_expiring_at, user};
    use super::*;
    use chrono::{Duration, TimeZone};

    const ADMIN_ONLY: Guard = Guard::Roles(&[Role::Admin]);

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_decode_claims() {
        let token = token_expiring_at(1_717_243_200);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.exp, Some(1_717_243_200));
        assert_eq!(claims.role.as_deref(), Some("USER"));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.%%%.c").is_none());
        assert!(decode_claims("").is_none());
    }

    #[test]
    fn test_token_expiry() {
        let future = (now() + Duration::hours(1)).timestamp();
        let past = (now() - Duration::seconds(1)).timestamp();
        assert!(token_is_live(&token_expiring_at(future), now()));
        assert!(!token_is_live(&token_expiring_at(past), now()));
        // exp equal to now is already expired
        assert!(!token_is_live(&token_expiring_at(now().timestamp()), now()));
        assert!(!token_is_live("garbage", now()));
    }

    #[test]
    fn test_decision_table() {
        for authenticated in [true, false] {
            for authorized in [true, false] {
                assert_eq!(
                    decide(true, authenticated, authorized),
                    GateOutcome::Loading
                );
            }
        }
        assert_eq!(decide(false, false, true), GateOutcome::RedirectLogin);
        assert_eq!(decide(false, false, false), GateOutcome::RedirectLogin);
        assert_eq!(decide(false, true, false), GateOutcome::RedirectHome);
        assert_eq!(decide(false, true, true), GateOutcome::Render);
    }

    #[test]
    fn test_evaluate_guards() {
        let anon = SessionSnapshot::anonymous();
        let customer = SessionSnapshot::signed_in(user(Role::User));
        let admin = SessionSnapshot::signed_in(user(Role::Admin));

        assert_eq!(evaluate(Guard::Public, &anon), GateOutcome::Render);
        assert_eq!(
            evaluate(Guard::Public, &SessionSnapshot::loading()),
            GateOutcome::Render
        );
        assert_eq!(evaluate(Guard::Protected, &anon), GateOutcome::RedirectLogin);
        assert_eq!(evaluate(Guard::Protected, &customer), GateOutcome::Render);
        assert_eq!(evaluate(ADMIN_ONLY, &customer), GateOutcome::RedirectHome);
        assert_eq!(evaluate(ADMIN_ONLY, &admin), GateOutcome::Render);
        assert_eq!(
            evaluate(ADMIN_ONLY, &SessionSnapshot::loading()),
            GateOutcome::Loading
        );
    }

    #[test]
    fn test_expired_token_is_not_authenticated() {
        let snapshot = SessionSnapshot {
            loading: false,
            user: Some(user(Role::Admin)),
            token_live: false,
        };
        assert_eq!(evaluate(ADMIN_ONLY, &snapshot), GateOutcome::RedirectLogin);
    }

    #[test]
    fn test_restore_live_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Storage::open(dir.path()).unwrap());
        let token = token_expiring_at((now() + Duration::days(1)).timestamp());
        store
            .save(&AuthPayload {
                token,
                user: user(Role::Owner),
            })
            .unwrap();

        let snapshot = store.restore(now()).unwrap();
        assert!(snapshot.is_authenticated());
        assert!(snapshot.is_owner());
        assert!(!snapshot.is_admin());
    }

    #[test]
    fn test_restore_expired_session_clears() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let store = SessionStore::new(storage.clone());
        let token = token_expiring_at((now() - Duration::days(1)).timestamp());
        store
            .save(&AuthPayload {
                token,
                user: user(Role::User),
            })
            .unwrap();

        let snapshot = store.restore(now()).unwrap();
        assert!(!snapshot.is_authenticated());
        assert!(storage.get(keys::TOKEN).unwrap().is_none());
        assert!(storage.get(keys::USER).unwrap().is_none());
    }

    #[test]
    fn test_restore_corrupt_user_clears() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let store = SessionStore::new(storage.clone());
        storage
            .set(
                keys::TOKEN,
                &token_expiring_at((now() + Duration::days(1)).timestamp()),
            )
            .unwrap();
        storage.set(keys::USER, "{broken").unwrap();

        let snapshot = store.restore(now()).unwrap();
        assert_eq!(snapshot, SessionSnapshot::anonymous());
        assert!(store.token().is_none());
    }
}
