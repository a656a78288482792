use leptos::prelude::*;

use crate::components::schema_graph::{
	Graph, GraphError, LayoutConfig, LayoutPolicy, SchemaGraphCanvas, StyleTable, document,
};

const SAMPLE_GRAPH: &str = include_str!("../../assets/sample-graph.json");

/// Lay out the bundled sample document with the bundled node styles.
fn sample_graph(config: &LayoutConfig) -> Result<(Graph, StyleTable), GraphError> {
	let styles = StyleTable::bundled()?;
	let graph = document::load(SAMPLE_GRAPH, config, &styles, LayoutPolicy::default())?;
	Ok((graph, styles))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = LayoutConfig::default();
	let loaded = sample_graph(&config);
	let initial: Vec<String> = loaded
		.as_ref()
		.map(|(graph, _)| {
			graph
				.nodes
				.iter()
				.filter(|n| n.is_checked)
				.map(|n| n.id.clone())
				.collect()
		})
		.unwrap_or_default();
	let (selected, set_selected) = signal(None::<String>);
	let (checked, set_checked) = signal(initial);

	let canvas = loaded.map(|(graph, styles)| {
		view! {
			<SchemaGraphCanvas
				graph=Signal::stored(graph)
				config=config
				styles=styles
				fullscreen=true
				on_select=Callback::new(move |id| set_selected.set(id))
				on_check=Callback::new(move |id: String| {
					set_checked
						.update(|ids| {
							match ids.iter().position(|c| *c == id) {
								Some(pos) => {
									ids.remove(pos);
								}
								None => ids.push(id),
							}
						})
				})
			/>
		}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{canvas}
				<div class="graph-overlay">
					<h1>"Schema Graph"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Ctrl-click to check."
					</p>
					<p class="selection">
						{move || match selected.get() {
							Some(id) => format!("Selected: {id}"),
							None => "Nothing selected".to_string(),
						}}
					</p>
					<p class="checked">{move || format!("Checked: {}", checked.get().join(", "))}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
