//! Selected node and the expanded sections of its info panel.

use std::collections::BTreeSet;

use log::error;

use super::edge_info::EdgeInfoAction;
use super::explore::ExploreAction;
use super::{Action, Store};
use crate::api::{EntityApi, EntityInfo};

pub const OBJECT_INFORMATION: &str = "Object Information";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedNode {
	/// Object id, used for the entity endpoints.
	pub id: String,
	pub kind: String,
	pub name: String,
	/// Id of the node in the displayed graph, when it is part of one.
	pub graph_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityInfoState {
	pub selected: Option<SelectedNode>,
	pub expanded: BTreeSet<String>,
	pub info: Option<EntityInfo>,
	pub loading: bool,
	pub error: Option<String>,
}

impl Default for EntityInfoState {
	fn default() -> Self {
		Self {
			selected: None,
			expanded: default_sections(),
			info: None,
			loading: false,
			error: None,
		}
	}
}

fn default_sections() -> BTreeSet<String> {
	BTreeSet::from([OBJECT_INFORMATION.to_string()])
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityInfoAction {
	Select(SelectedNode),
	Clear,
	ToggleSection(String),
	InfoLoaded { id: String, info: EntityInfo },
	InfoFailed { id: String, error: String },
}

impl EntityInfoState {
	pub fn reduce(self, action: &Action) -> Self {
		match action {
			Action::EntityInfo(action) => self.reduce_own(action),
			// one selected element at a time, and a new query drops it
			Action::EdgeInfo(EdgeInfoAction::Select(_))
			| Action::Explore(ExploreAction::ClearGraph) => Self::default(),
			Action::Explore(ExploreAction::GraphStart(request)) if request.replaces_selection() => {
				Self::default()
			}
			_ => self,
		}
	}

	fn reduce_own(mut self, action: &EntityInfoAction) -> Self {
		match action {
			EntityInfoAction::Select(node) => {
				return Self {
					selected: Some(node.clone()),
					loading: true,
					..Self::default()
				};
			}
			EntityInfoAction::Clear => return Self::default(),
			EntityInfoAction::ToggleSection(section) => {
				if !self.expanded.remove(section) {
					self.expanded.insert(section.clone());
				}
			}
			EntityInfoAction::InfoLoaded { id, info } => {
				if self.is_selected(id) {
					self.loading = false;
					self.info = Some(info.clone());
				}
			}
			EntityInfoAction::InfoFailed { id, error } => {
				if self.is_selected(id) {
					self.loading = false;
					self.error = Some(error.clone());
				}
			}
		}
		self
	}

	pub fn is_selected(&self, id: &str) -> bool {
		self.selected.as_ref().is_some_and(|n| n.id == id)
	}

	pub fn is_expanded(&self, section: &str) -> bool {
		self.expanded.contains(section)
	}
}

pub async fn load_entity_info<A: EntityApi + ?Sized>(store: &Store, api: &A, id: &str) {
	match api.entity_info(id).await {
		Ok(info) => store.dispatch(EntityInfoAction::InfoLoaded {
			id: id.to_string(),
			info,
		}),
		Err(e) => {
			error!("failed to load entity {id}: {e}");
			store.dispatch(EntityInfoAction::InfoFailed {
				id: id.to_string(),
				error: e.to_string(),
			});
		}
	}
}

/// Endpoint family for a node kind. Kinds without a dedicated endpoint use
/// the generic one.
fn kind_path(kind: &str) -> &'static str {
	match kind {
		"User" => "users",
		"Group" => "groups",
		"Computer" => "computers",
		"Domain" => "domains",
		"GPO" => "gpos",
		"OU" => "ous",
		"Container" => "containers",
		"AIACA" => "aiacas",
		"RootCA" => "rootcas",
		"EnterpriseCA" => "enterprisecas",
		"NTAuthStore" => "ntauthstores",
		"CertTemplate" => "certtemplates",
		_ => "base",
	}
}

/// Graph URL listing the objects behind one relationship count, e.g.
/// `adminRights` of a user.
pub fn section_graph_url(node: &SelectedNode, section: &str) -> String {
	let mut slug = String::with_capacity(section.len() + 4);
	for c in section.chars() {
		if c.is_ascii_uppercase() {
			if !slug.is_empty() {
				slug.push('-');
			}
			slug.push(c.to_ascii_lowercase());
		} else {
			slug.push(c);
		}
	}
	format!(
		"/api/v2/{}/{}/{slug}?type=graph",
		kind_path(&node.kind),
		node.id
	)
}
