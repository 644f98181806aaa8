//! Editable inputs backing the fields of the wizard

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use super::palette::Palette;
use crate::form::{FieldSpec, Steps};

/// Height of a single-line input including its border
const TEXT_INPUT_HEIGHT: u16 = 3;
/// Height of a multi-line input including its border
const TEXT_AREA_HEIGHT: u16 = 7;

/// One editable input
pub enum FormField {
    /// Single-line text input. `cursor_pos` counts chars, not bytes.
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
}

fn byte_index(value: &str, char_pos: usize) -> usize {
    value
        .char_indices()
        .nth(char_pos)
        .map_or(value.len(), |(i, _)| i)
}

impl FormField {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        if spec.kind().is_multiline() {
            FormField::TextArea {
                textarea: Box::new(TextArea::default()),
                placeholder: spec.placeholder().to_string(),
            }
        } else {
            FormField::TextInput {
                value: String::new(),
                cursor_pos: 0,
                placeholder: spec.placeholder().to_string(),
                max_length: spec.max_length(),
            }
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, FormField::TextArea { .. })
    }

    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    /// Apply an editing key. Returns true if the value changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => match key.code {
                KeyCode::Char(c) => {
                    let len = value.chars().count();
                    if max_length.map_or(true, |m| len < m) {
                        value.insert(byte_index(value, *cursor_pos), c);
                        *cursor_pos += 1;
                        true
                    } else {
                        false
                    }
                }
                KeyCode::Backspace => {
                    if *cursor_pos > 0 {
                        *cursor_pos -= 1;
                        value.remove(byte_index(value, *cursor_pos));
                        true
                    } else {
                        false
                    }
                }
                KeyCode::Delete => {
                    if *cursor_pos < value.chars().count() {
                        value.remove(byte_index(value, *cursor_pos));
                        true
                    } else {
                        false
                    }
                }
                KeyCode::Left => {
                    *cursor_pos = cursor_pos.saturating_sub(1);
                    false
                }
                KeyCode::Right => {
                    if *cursor_pos < value.chars().count() {
                        *cursor_pos += 1;
                    }
                    false
                }
                KeyCode::Home => {
                    *cursor_pos = 0;
                    false
                }
                KeyCode::End => {
                    *cursor_pos = value.chars().count();
                    false
                }
                _ => false,
            },
            // TextArea handles its own key events
            FormField::TextArea { textarea, .. } => textarea.input(key),
        }
    }

    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextInput { .. } => TEXT_INPUT_HEIGHT,
            FormField::TextArea { .. } => TEXT_AREA_HEIGHT,
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        focused: bool,
        invalid: bool,
        palette: &Palette,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.input_border(focused, invalid))
            .style(palette.base());

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(palette.muted),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor_pos), '|');
                    }
                    let suffix = max_length
                        .filter(|_| focused)
                        .map(|m| format!(" ({}/{})", value.chars().count(), m))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(palette.muted)),
                    ])
                };

                frame.render_widget(Paragraph::new(content).block(block), area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_style(palette.base());
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(block);
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(palette.muted));

                frame.render_widget(&**textarea, area);
            }
        }
    }
}

/// Inputs for every field of a step layout, kept by field name
pub struct FormInputs {
    fields: Vec<(String, FormField)>,
}

impl FormInputs {
    pub fn new(steps: &Steps) -> Self {
        Self {
            fields: steps
                .fields()
                .map(|spec| (spec.name().to_string(), FormField::from_spec(spec)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Overwrite any input whose text differs from `value_of(name)`
    pub fn sync<'a>(&mut self, value_of: impl Fn(&str) -> &'a str) {
        for (name, field) in &mut self.fields {
            let value = value_of(name);
            if field.value() != value {
                field.set_value(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{contact_steps, FieldKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn text_input(max_length: Option<usize>) -> FormField {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: "test".to_string(),
            max_length,
        }
    }

    #[test]
    fn test_text_input_handles_chars() {
        let mut field = text_input(None);

        assert!(field.handle_key(key(KeyCode::Char('h'))));
        assert!(field.handle_key(key(KeyCode::Char('i'))));
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn test_text_input_respects_max_length() {
        let mut field = text_input(Some(3));

        field.handle_key(key(KeyCode::Char('a')));
        field.handle_key(key(KeyCode::Char('b')));
        field.handle_key(key(KeyCode::Char('c')));
        assert!(!field.handle_key(key(KeyCode::Char('d'))));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_text_input_multibyte_editing() {
        let mut field = text_input(None);
        field.set_value("héllo");

        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Right));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "hllo");

        field.handle_key(key(KeyCode::Char('ä')));
        assert_eq!(field.value(), "hällo");

        field.handle_key(key(KeyCode::Backspace));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "llo");
    }

    #[test]
    fn test_text_input_ignores_control_chords() {
        let mut field = text_input(None);
        let chord = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(!field.handle_key(chord));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_text_area_set_and_get() {
        let spec = FieldSpec::new("message", "Message", FieldKind::TextArea);
        let mut field = FormField::from_spec(&spec);
        assert!(field.is_multiline());
        assert_eq!(field.render_height(), TEXT_AREA_HEIGHT);

        field.set_value("line one\nline two");
        assert_eq!(field.value(), "line one\nline two");

        field.set_value("");
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_from_spec_picks_input_kind() {
        let spec = FieldSpec::new("email", "Email", FieldKind::Email).with_placeholder("you@x.com");
        let field = FormField::from_spec(&spec);
        assert!(!field.is_multiline());
        assert_eq!(field.render_height(), TEXT_INPUT_HEIGHT);
    }

    #[test]
    fn test_inputs_sync_from_values() {
        let steps = contact_steps();
        let mut inputs = FormInputs::new(&steps);
        assert!(inputs.get("message").is_some_and(FormField::is_multiline));

        inputs.get_mut("name").unwrap().set_value("Ada");
        inputs.sync(|_| "");
        assert_eq!(inputs.get("name").unwrap().value(), "");

        inputs.sync(|name| if name == "email" { "ada@x.com" } else { "" });
        assert_eq!(inputs.get("email").unwrap().value(), "ada@x.com");
        assert!(inputs.get("company").is_none());
    }
}
