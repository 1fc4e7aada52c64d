//! Visual node of a toast.
//!
//! A `ToastNode` is what a display surface holds: a root container carrying the
//! severity classes and inline style, the message text and a close control.
//! Styles are kept as ordered declarations so a surface can apply patches and
//! render the node back as markup.

use std::fmt::{self, Display};

use crate::types::{NodeId, Severity};

pub const ROOT_CLASS: &str = "custom-notification";
pub const CLOSE_GLYPH: &str = "\u{d7}";
pub const CLOSE_ARIA_LABEL: &str = "Close notification";

const OFFSCREEN: &str = "translateX(120%)";
const ONSCREEN: &str = "translateX(0)";
const CLOSE_IDLE_OPACITY: &str = "0.8";
const CLOSE_HOVER_OPACITY: &str = "1";
const FONT_STACK: &str =
    "var(--font-family-base, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif)";

/// Ordered list of CSS declarations; setting an existing property replaces it in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle(Vec<(String, String)>);

impl InlineStyle {
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(name, _)| name == property) {
            Some((_, current)) => *current = value,
            None => self.0.push((property.to_string(), value)),
        }
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }
}

impl Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (name, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

/// A single style mutation addressed to one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StylePatch {
    pub property: &'static str,
    pub value: String,
}

impl StylePatch {
    fn new(property: &'static str, value: &str) -> Self {
        Self {
            property,
            value: value.to_string(),
        }
    }

    #[must_use]
    pub fn slide_in() -> Self {
        Self::new("transform", ONSCREEN)
    }

    #[must_use]
    pub fn slide_out() -> Self {
        Self::new("transform", OFFSCREEN)
    }

    #[must_use]
    pub fn fade_out() -> Self {
        Self::new("opacity", "0")
    }

    #[must_use]
    pub fn close_hover(hovered: bool) -> Self {
        Self::new(
            "opacity",
            if hovered {
                CLOSE_HOVER_OPACITY
            } else {
                CLOSE_IDLE_OPACITY
            },
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastNode {
    pub root: NodeId,
    pub close_button: NodeId,
    pub severity: Severity,
    pub classes: Vec<String>,
    pub message: String,
    pub style: InlineStyle,
    pub close_style: InlineStyle,
}

impl ToastNode {
    /// Builds the off-screen node for a fresh notification.
    #[must_use]
    pub fn build(severity: Severity, message: &str) -> Self {
        let palette = severity.palette();
        let style = InlineStyle::default()
            .with("position", "fixed")
            .with("top", "20px")
            .with("right", "20px")
            .with("background-color", palette.background)
            .with("border", format!("2px solid {}", palette.border))
            .with("color", "white")
            .with("padding", "16px 20px")
            .with("border-radius", "8px")
            .with(
                "box-shadow",
                "0 4px 12px rgba(0, 0, 0, 0.15), 0 8px 24px rgba(0, 0, 0, 0.1)",
            )
            .with("z-index", "10000")
            .with("display", "flex")
            .with("align-items", "center")
            .with("max-width", "400px")
            .with("min-width", "300px")
            .with("font-weight", "500")
            .with("font-size", "14px")
            .with("line-height", "1.4")
            .with("transform", OFFSCREEN)
            .with("transition", "all 0.3s cubic-bezier(0.34, 1.56, 0.64, 1)")
            .with("backdrop-filter", "blur(8px)")
            .with("font-family", FONT_STACK);

        let close_style = InlineStyle::default()
            .with("background", "none")
            .with("border", "none")
            .with("color", "white")
            .with("font-size", "18px")
            .with("font-weight", "bold")
            .with("cursor", "pointer")
            .with("padding", "0")
            .with("margin-left", "12px")
            .with("line-height", "1")
            .with("opacity", CLOSE_IDLE_OPACITY)
            .with("transition", "opacity 0.2s ease");

        Self {
            root: NodeId::new(),
            close_button: NodeId::new(),
            severity,
            classes: vec![
                ROOT_CLASS.to_string(),
                format!("{ROOT_CLASS}--{}", severity.as_str()),
            ],
            message: message.to_string(),
            style,
            close_style,
        }
    }

    /// Applies a patch to the addressed node. Returns `false` if `node` is not part of this toast.
    pub fn apply(&mut self, node: NodeId, patch: &StylePatch) -> bool {
        if node == self.root {
            self.style.set(patch.property, patch.value.clone());
        } else if node == self.close_button {
            self.close_style.set(patch.property, patch.value.clone());
        } else {
            return false;
        }
        true
    }
}

impl Display for ToastNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<div id="{}" class="{}" style="{}"><span style="flex: 1;">{}</span><button id="{}" aria-label="{CLOSE_ARIA_LABEL}" style="{}">{CLOSE_GLYPH}</button></div>"#,
            self.root,
            self.classes.join(" "),
            escape(&self.style.to_string()),
            escape(&self.message),
            self.close_button,
            escape(&self.close_style.to_string()),
        )
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{InlineStyle, StylePatch, ToastNode};
    use crate::types::{NodeId, Severity};

    #[test]
    fn build_applies_severity_classes_and_palette() {
        let node = ToastNode::build(Severity::Success, "Saved.");
        assert_eq!(
            node.classes,
            vec!["custom-notification", "custom-notification--success"]
        );
        assert_eq!(node.style.get("background-color"), Some("#059669"));
        assert_eq!(node.style.get("border"), Some("2px solid #10b981"));
        assert_eq!(node.style.get("transform"), Some("translateX(120%)"));
        assert_eq!(node.style.get("font-family"), Some(super::FONT_STACK));
    }

    #[test]
    fn patches_address_root_or_close_button() {
        let mut node = ToastNode::build(Severity::Info, "hi");
        let root = node.root;
        let close = node.close_button;

        assert!(node.apply(root, &StylePatch::slide_in()));
        assert_eq!(node.style.get("transform"), Some("translateX(0)"));

        assert!(node.apply(close, &StylePatch::close_hover(true)));
        assert_eq!(node.close_style.get("opacity"), Some("1"));
        assert_eq!(node.style.get("opacity"), None);

        assert!(!node.apply(NodeId::new(), &StylePatch::fade_out()));
    }

    #[test]
    fn set_replaces_existing_declaration_in_place() {
        let mut style = InlineStyle::default();
        style.set("a", "1");
        style.set("b", "2");
        style.set("a", "3");
        assert_eq!(style.len(), 2);
        assert_eq!(style.to_string(), "a: 3; b: 2;");
    }

    #[test]
    fn markup_escapes_message_text() {
        let node = ToastNode::build(Severity::Error, "<b>\"x\" & y</b>");
        let html = node.to_string();
        assert!(html.contains("&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;"));
        assert!(html.contains(r#"aria-label="Close notification""#));
        assert!(!html.contains("<b>"));
        let font = "font-family: var(--font-family-base, -apple-system, \
                    BlinkMacSystemFont, &#39;Segoe UI&#39;, Roboto, sans-serif);";
        assert!(html.contains(font));
    }
}
