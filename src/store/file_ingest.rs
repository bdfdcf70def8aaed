use log::error;

use super::{Action, Store};
use crate::api::FileIngestApi;
use crate::api::types::FileIngestJob;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileIngestState {
	pub jobs: Vec<FileIngestJob>,
	pub page: u32,
	pub loading: bool,
	pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FileIngestAction {
	Fetch { page: u32 },
	Loaded { page: u32, jobs: Vec<FileIngestJob> },
	Failed(String),
}

impl FileIngestState {
	pub fn reduce(mut self, action: &Action) -> Self {
		let Action::FileIngest(action) = action else {
			return self;
		};
		match action {
			FileIngestAction::Fetch { page } => {
				self.page = *page;
				self.loading = true;
				self.error = None;
			}
			FileIngestAction::Loaded { page, jobs } => {
				if *page == self.page {
					self.loading = false;
					self.jobs = jobs.clone();
				}
			}
			FileIngestAction::Failed(e) => {
				self.loading = false;
				self.error = Some(e.clone());
			}
		}
		self
	}
}

pub async fn fetch_jobs<A: FileIngestApi + ?Sized>(
	store: &Store,
	api: &A,
	page: u32,
	page_size: u32,
) {
	match api.file_ingest_jobs(page.saturating_mul(page_size), page_size).await {
		Ok(jobs) => store.dispatch(FileIngestAction::Loaded { page, jobs }),
		Err(e) => {
			error!("failed to list file ingest jobs: {e}");
			store.dispatch(FileIngestAction::Failed(e.to_string()));
		}
	}
}
