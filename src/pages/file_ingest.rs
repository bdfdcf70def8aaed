use leptos::prelude::*;

use crate::context::use_app;
use crate::store::file_ingest::FileIngestAction;

#[component]
pub fn FileIngest() -> impl IntoView {
	let app = use_app();
	let page_size = app.config().file_ingest_page_size;
	let ingest = Memo::new(move |_| app.state.with(|s| s.file_ingest.clone()));
	let page = move || ingest.with(|i| i.page);

	Effect::new(move |_| app.dispatch(FileIngestAction::Fetch { page: 0 }));

	let rows = move || {
		ingest
			.get()
			.jobs
			.into_iter()
			.map(|job| {
				view! {
					<tr>
						<td>{job.id}</td>
						<td>{job.user_email_address.unwrap_or_default()}</td>
						<td>{job.status.to_string()}</td>
						<td>{job.status_message}</td>
						<td>{job.start_time}</td>
						<td>{job.end_time.unwrap_or_default()}</td>
						<td>{format!("{} / {}", job.total_files - job.failed_files.min(job.total_files), job.total_files)}</td>
					</tr>
				}
			})
			.collect_view()
	};

	view! {
		<div class="page file-ingest">
			<h1>"File Ingest"</h1>
			{move || ingest.with(|i| i.error.clone()).map(|e| view! { <p class="error">{e}</p> })}
			<table class="jobs">
				<thead>
					<tr>
						<th>"ID"</th>
						<th>"User"</th>
						<th>"Status"</th>
						<th>"Message"</th>
						<th>"Started"</th>
						<th>"Ended"</th>
						<th>"Files ingested"</th>
					</tr>
				</thead>
				<tbody>{rows}</tbody>
			</table>
			<footer class="pagination">
				<button
					class="btn"
					disabled=move || page() == 0 || ingest.with(|i| i.loading)
					on:click=move |_| app.dispatch(FileIngestAction::Fetch { page: page().saturating_sub(1) })
				>
					"Previous"
				</button>
				<span>{move || format!("Page {}", page() + 1)}</span>
				<button
					class="btn"
					disabled=move || ingest.with(|i| i.loading || (i.jobs.len() as u32) < page_size)
					on:click=move |_| app.dispatch(FileIngestAction::Fetch { page: page().saturating_add(1) })
				>
					"Next"
				</button>
			</footer>
		</div>
	}
}
