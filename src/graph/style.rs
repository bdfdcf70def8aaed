//! Colors and icons derived from node kinds.

pub const DEFAULT_NODE_COLOR: &str = "#fafafa";
pub const DEFAULT_ICON: &str = "fa-question";
pub const TIER_ZERO_BORDER: &str = "#e7a33c";
pub const OWNED_BORDER: &str = "#d62728";
pub const DEFAULT_BORDER: &str = "#404040";
pub const LABEL_BACKGROUND: &str = "rgba(255, 255, 255, 0.9)";

pub const EDGE_COLOR: &str = "#1a30ff";
pub const ACL_EDGE_COLOR: &str = "#b22222";

pub const NODE_SIZE: f64 = 15.0;
pub const HIGHLIGHTED_NODE_SIZE: f64 = 20.0;
pub const LABEL_FONT_SIZE: f64 = 14.0;

/// Font Awesome class, unicode glyph and fill color per kind.
const KINDS: &[(&str, &str, char, &str)] = &[
	("AZBase", "fa-question", '\u{f128}', "#59bfb3"),
	("AZApp", "fa-window-restore", '\u{f2d2}', "#03fc84"),
	("AZVMScaleSet", "fa-server", '\u{f233}', "#007cd0"),
	("AZRole", "fa-window-restore", '\u{f2d2}', "#ed8537"),
	("AZDevice", "fa-desktop", '\u{f108}', "#b18fcf"),
	("AZFunctionApp", "fa-bolt", '\u{f0e7}', "#f4ba44"),
	("AZGroup", "fa-users", '\u{f0c0}', "#f57c9b"),
	("AZKeyVault", "fa-lock", '\u{f023}', "#ed658c"),
	("AZManagementGroup", "fa-cube", '\u{f1b2}', "#bd93d8"),
	("AZResourceGroup", "fa-cube", '\u{f1b2}', "#89bd9e"),
	("AZServicePrincipal", "fa-robot", '\u{f544}', "#c1d6d6"),
	("AZSubscription", "fa-key", '\u{f084}', "#d2cca1"),
	("AZTenant", "fa-cloud", '\u{f0c2}', "#54f2f2"),
	("AZUser", "fa-user", '\u{f007}', "#34d2eb"),
	("AZVM", "fa-desktop", '\u{f108}', "#f9ada0"),
	("AZManagedCluster", "fa-cubes", '\u{f1b3}', "#326ce5"),
	("AZContainerRegistry", "fa-box-open", '\u{f49e}', "#0885d7"),
	("AZWebApp", "fa-object-group", '\u{f247}', "#4696e9"),
	("AZLogicApp", "fa-sitemap", '\u{f0e8}', "#9ee047"),
	("AZAutomationAccount", "fa-cog", '\u{f013}', "#f4ba44"),
	("Base", "fa-question", '\u{f128}', "#e6e600"),
	("Computer", "fa-desktop", '\u{f108}', "#e67873"),
	("Domain", "fa-globe", '\u{f0ac}', "#17e6b9"),
	("GPO", "fa-th-list", '\u{f00b}', "#998e4c"),
	("Group", "fa-users", '\u{f0c0}', "#dbe617"),
	("OU", "fa-sitemap", '\u{f0e8}', "#ffaa00"),
	("User", "fa-user", '\u{f007}', "#17e625"),
	("Container", "fa-box", '\u{f466}', "#f79a78"),
	("AIACA", "fa-box", '\u{f466}', "#9769f0"),
	("RootCA", "fa-landmark", '\u{f66f}', "#6968e8"),
	("EnterpriseCA", "fa-box", '\u{f466}', "#4696e9"),
	("NTAuthStore", "fa-store", '\u{f54e}', "#d575f5"),
	("CertTemplate", "fa-id-card", '\u{f2c2}', "#b153f3"),
	("IssuancePolicy", "fa-clipboard-check", '\u{f46c}', "#99b2dd"),
];

pub fn has_style(kind: &str) -> bool {
	KINDS.iter().any(|(k, ..)| *k == kind)
}

pub fn icon_for_kind(kind: &str) -> &'static str {
	KINDS
		.iter()
		.find(|(k, ..)| *k == kind)
		.map(|(_, icon, ..)| *icon)
		.unwrap_or(DEFAULT_ICON)
}

pub fn color_for_kind(kind: &str) -> &'static str {
	KINDS
		.iter()
		.find(|(k, ..)| *k == kind)
		.map(|(.., color)| *color)
		.unwrap_or(DEFAULT_NODE_COLOR)
}

/// Unicode glyph for a Font Awesome class, drawn on the canvas.
pub fn glyph_for_icon(icon: &str) -> char {
	KINDS
		.iter()
		.find(|(_, i, ..)| *i == icon)
		.map(|(_, _, glyph, _)| *glyph)
		.unwrap_or('\u{f128}')
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_kinds_have_icons_and_colors() {
		assert_eq!(icon_for_kind("User"), "fa-user");
		assert_eq!(color_for_kind("Domain"), "#17e6b9");
		assert_eq!(glyph_for_icon("fa-users"), '\u{f0c0}');
	}

	#[test]
	fn unknown_kinds_fall_back() {
		assert_eq!(icon_for_kind("Meta"), DEFAULT_ICON);
		assert_eq!(color_for_kind("Meta"), DEFAULT_NODE_COLOR);
	}
}
