//! Editor surface contract.
//!
//! Components present their fields through an [`Inspector`] in
//! [`Component::render_editor`](crate::Component::render_editor). A GUI
//! toolkit implements the trait with real widgets; [`TextInspector`] renders a
//! read-only text view for logs and terminals.

use std::fmt::Write as _;

/// A widget surface a component can draw its fields onto.
pub trait Inspector {
    /// Section title, usually the component type identifier.
    fn heading(&mut self, text: &str);

    /// Plain text line.
    fn label(&mut self, text: &str);

    /// Visual separator.
    fn separator(&mut self);

    /// Editable float. Returns `true` if the value was changed.
    fn edit_f32(&mut self, label: &str, value: &mut f32) -> bool;

    /// Editable string. Returns `true` if the value was changed.
    fn edit_text(&mut self, label: &str, value: &mut String) -> bool;
}

/// Renders every widget as an indented line of text. Never edits values.
#[derive(Debug, Default)]
pub struct TextInspector {
    out: String,
}

impl TextInspector {
    /// Create an empty text inspector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The text rendered so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Consume and return the rendered text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.out
    }
}

impl Inspector for TextInspector {
    fn heading(&mut self, text: &str) {
        let _ = writeln!(self.out, "[{text}]");
    }

    fn label(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn separator(&mut self) {
        self.out.push_str("----\n");
    }

    fn edit_f32(&mut self, label: &str, value: &mut f32) -> bool {
        let _ = writeln!(self.out, "  {label}: {value}");
        false
    }

    fn edit_text(&mut self, label: &str, value: &mut String) -> bool {
        let _ = writeln!(self.out, "  {label}: {value:?}");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_inspector_layout() {
        let mut ui = TextInspector::new();
        let mut x = 1.5_f32;
        let mut name = String::from("player");
        ui.heading("Position");
        assert!(!ui.edit_f32("x", &mut x));
        ui.separator();
        ui.label("Entity 1");
        assert!(!ui.edit_text("name", &mut name));
        assert_eq!(
            ui.into_string(),
            "[Position]\n  x: 1.5\n----\nEntity 1\n  name: \"player\"\n"
        );
    }
}
