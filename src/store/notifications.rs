use super::Action;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
	Success,
	Info,
	Warning,
	Error,
}

impl Severity {
	pub fn class(self) -> &'static str {
		match self {
			Severity::Success => "snackbar snackbar-success",
			Severity::Info => "snackbar snackbar-info",
			Severity::Warning => "snackbar snackbar-warning",
			Severity::Error => "snackbar snackbar-error",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
	pub id: u64,
	pub key: String,
	pub message: String,
	pub severity: Severity,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationsState {
	pub items: Vec<Notification>,
	next_id: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NotificationAction {
	Push {
		key: String,
		message: String,
		severity: Severity,
	},
	Dismiss(u64),
}

impl NotificationAction {
	pub fn push(message: impl Into<String>, severity: Severity, key: impl Into<String>) -> Self {
		NotificationAction::Push {
			key: key.into(),
			message: message.into(),
			severity,
		}
	}
}

impl NotificationsState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::Notifications(action) = action else {
			return self;
		};
		match action {
			NotificationAction::Push {
				key,
				message,
				severity,
			} => {
				// one visible notification per key
				self.items.retain(|n| n.key != *key);
				self.items.push(Notification {
					id: self.next_id,
					key: key.clone(),
					message: message.clone(),
					severity: *severity,
				});
				self.next_id += 1;
			}
			NotificationAction::Dismiss(id) => self.items.retain(|n| n.id != *id),
		}
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn reduce(state: NotificationsState, action: NotificationAction) -> NotificationsState {
		state.reduce(&Action::Notifications(action))
	}

	#[test]
	fn same_key_replaces_previous_notification() {
		let state = reduce(
			NotificationsState::default(),
			NotificationAction::push("first", Severity::Info, "k"),
		);
		let state = reduce(state, NotificationAction::push("second", Severity::Error, "k"));
		assert_eq!(state.items.len(), 1);
		assert_eq!(state.items[0].message, "second");
		assert_eq!(state.items[0].id, 1);
	}

	#[test]
	fn dismiss_removes_by_id() {
		let state = reduce(
			NotificationsState::default(),
			NotificationAction::push("a", Severity::Info, "a"),
		);
		let state = reduce(state, NotificationAction::push("b", Severity::Info, "b"));
		let state = reduce(state, NotificationAction::Dismiss(0));
		assert_eq!(state.items.len(), 1);
		assert_eq!(state.items[0].key, "b");
	}
}
