pub mod edge_panel;
pub mod entity_panel;
pub mod graph_canvas;
pub mod search_bar;
pub mod snackbar;
