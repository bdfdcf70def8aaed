use std::fmt;

use log::{error, info};

use super::{Action, Store};
use crate::api::AuthApi;
use crate::api::types::Session;

/// Password kept out of `Debug` output and logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(pub String);

impl fmt::Debug for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Secret(***)")
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
	pub session: Option<Session>,
	pub username: Option<String>,
	pub pending: bool,
	pub error: Option<String>,
}

impl AuthState {
	pub fn is_authenticated(&self) -> bool {
		self.session.as_ref().is_some_and(|s| !s.auth_expired)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
	LoginStart { username: String, secret: Secret },
	LoginSuccess { username: String, session: Session },
	LoginFailure(String),
	Logout,
}

impl AuthState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::Auth(action) = action else {
			return self;
		};
		match action {
			AuthAction::LoginStart { .. } => {
				self.pending = true;
				self.error = None;
			}
			AuthAction::LoginSuccess { username, session } => {
				self.pending = false;
				self.username = Some(username.clone());
				self.session = Some(session.clone());
			}
			AuthAction::LoginFailure(e) => {
				self.pending = false;
				self.session = None;
				self.error = Some(e.clone());
			}
			AuthAction::Logout => return Self::default(),
		}
		self
	}
}

pub async fn login<A: AuthApi + ?Sized>(store: &Store, api: &A, username: &str, secret: &Secret) {
	match api.login(username, &secret.0).await {
		Ok(session) => {
			info!("signed in as {username}");
			store.dispatch(AuthAction::LoginSuccess {
				username: username.to_string(),
				session,
			});
		}
		Err(e) => {
			error!("login failed for {username}: {e}");
			let message = if e.is_unauthorized() {
				"Invalid username or password".to_string()
			} else {
				e.to_string()
			};
			store.dispatch(AuthAction::LoginFailure(message));
		}
	}
}

pub async fn logout<A: AuthApi + ?Sized>(api: &A) {
	if let Err(e) = api.logout().await {
		info!("logout request failed: {e}");
	}
}

#[cfg(test)]
mod tests {
	use async_trait::async_trait;
	use futures::executor::block_on;

	use super::*;
	use crate::api::{ApiError, ApiResult};
	use crate::store::AppState;

	struct FakeAuth;

	#[async_trait(?Send)]
	impl AuthApi for FakeAuth {
		async fn login(&self, username: &str, secret: &str) -> ApiResult<Session> {
			if secret != "hunter2" {
				return Err(ApiError::Status {
					status: 401,
					body: String::new(),
				});
			}
			Ok(Session {
				user_id: format!("id-{username}"),
				session_token: "token".into(),
				auth_expired: false,
			})
		}

		async fn logout(&self) -> ApiResult<()> {
			Ok(())
		}
	}

	#[test]
	fn secrets_are_redacted() {
		let action = AuthAction::LoginStart {
			username: "admin".into(),
			secret: Secret("hunter2".into()),
		};
		assert!(!format!("{action:?}").contains("hunter2"));
	}

	#[test]
	fn successful_login_stores_session() {
		let (store, _) = Store::new(AppState::default());
		block_on(login(&store, &FakeAuth, "admin", &Secret("hunter2".into())));
		let auth = store.select(|s| s.auth.clone());
		assert!(auth.is_authenticated());
		assert_eq!(auth.username.as_deref(), Some("admin"));
	}

	#[test]
	fn rejected_login_reports_credentials_error() {
		let (store, _) = Store::new(AppState::default());
		block_on(login(&store, &FakeAuth, "admin", &Secret("nope".into())));
		let auth = store.select(|s| s.auth.clone());
		assert!(!auth.is_authenticated());
		assert_eq!(auth.error.as_deref(), Some("Invalid username or password"));
	}
}
