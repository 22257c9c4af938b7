//! Create and edit forms.
//!
//! A `Form` holds the local field state of one create/edit modal. Typing
//! edits the focused field; submitting validates the values and hands them
//! to the entity builders in `entities`, which produce a complete record
//! (create) or a patch of the changed fields (edit).

mod entities;
mod error;

pub use entities::{
    apply_form, apply_nested_form, asset_fields, budget_item_fields, diff_patch,
    email_fields_from_template, has_multiline, Editable,
};
pub use error::FormError;

use crate::crm::{Choice, Collection};
use chrono::{NaiveDate, NaiveTime};
use log::*;
use regex::Regex;
use std::collections::HashMap;
use tui_textarea::TextArea;

/// Kind of input a field accepts.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    Email,
    Number,
    Date,
    Time,
    Choice(Vec<&'static str>),
    Multiline,
}

/// A labelled form field and its current value.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub input: FieldInput,
    pub required: bool,
    pub value: String,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str, value: &str) -> FormField {
        FormField {
            key,
            label,
            input: FieldInput::Text,
            required: false,
            value: value.to_string(),
        }
    }

    pub fn email(key: &'static str, label: &'static str, value: &str) -> FormField {
        FormField {
            input: FieldInput::Email,
            ..FormField::text(key, label, value)
        }
    }

    pub fn number(key: &'static str, label: &'static str, value: f64) -> FormField {
        let value = if value == 0.0 {
            String::new()
        } else {
            value.to_string()
        };
        FormField {
            input: FieldInput::Number,
            ..FormField::text(key, label, &value)
        }
    }

    pub fn date(key: &'static str, label: &'static str, value: Option<&str>) -> FormField {
        FormField {
            input: FieldInput::Date,
            ..FormField::text(key, label, value.unwrap_or(""))
        }
    }

    pub fn time(key: &'static str, label: &'static str, value: Option<&str>) -> FormField {
        FormField {
            input: FieldInput::Time,
            ..FormField::text(key, label, value.unwrap_or(""))
        }
    }

    pub fn choice<C: Choice>(key: &'static str, label: &'static str, value: C) -> FormField {
        FormField {
            input: FieldInput::Choice(C::labels()),
            ..FormField::text(key, label, value.label())
        }
    }

    pub fn multiline(key: &'static str, label: &'static str, value: &str) -> FormField {
        FormField {
            input: FieldInput::Multiline,
            ..FormField::text(key, label, value)
        }
    }

    /// Mark the field as required.
    ///
    pub fn required(mut self) -> FormField {
        self.required = true;
        self
    }
}

/// What a form creates or edits.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Entity(Collection),
    Asset { campaign_id: String },
    BudgetItem { campaign_id: String },
}

/// Whether a form creates a new record or edits an existing one.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Values common to every new record.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefaults {
    pub owner: String,
}

/// Validated field values keyed by field key.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    values: HashMap<&'static str, String>,
}

impl FormValues {
    pub fn new() -> FormValues {
        FormValues::default()
    }

    /// Set a value, mostly useful for building values by hand.
    ///
    pub fn with(mut self, key: &'static str, value: &str) -> FormValues {
        self.values.insert(key, value.to_string());
        self
    }

    /// Trimmed value, empty when the field is absent.
    ///
    pub fn text(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Value with trailing whitespace trimmed, keeping line breaks.
    ///
    pub fn multiline(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(|v| v.trim_end().to_string())
            .unwrap_or_default()
    }

    /// Trimmed value, or None when blank.
    ///
    pub fn optional(&self, key: &str) -> Option<String> {
        let value = self.text(key);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Numeric value, zero when blank or unparsable.
    ///
    pub fn number(&self, key: &str) -> f64 {
        self.text(key).parse::<f64>().unwrap_or(0.0)
    }

    /// Choice value matched by label, the first option when unmatched.
    ///
    pub fn choice<C: Choice + Default>(&self, key: &str) -> C {
        C::from_label(&self.text(key)).unwrap_or_default()
    }
}

/// Whether the text looks like an email address.
///
pub fn is_email(text: &str) -> bool {
    match Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$") {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!("Failed to compile email pattern: {}", e);
            text.contains('@')
        }
    }
}

/// Houses the local state of one create/edit form.
///
pub struct Form {
    kind: FormKind,
    mode: FormMode,
    fields: Vec<FormField>,
    focused: usize,
    editor: TextArea<'static>,
    error: Option<String>,
}

impl Form {
    /// Return a form over the given fields, focused on the first one. The
    /// first multiline field is edited through a text area.
    ///
    pub fn new(kind: FormKind, mode: FormMode, fields: Vec<FormField>) -> Form {
        let notes = fields
            .iter()
            .find(|f| f.input == FieldInput::Multiline)
            .map(|f| f.value.clone())
            .unwrap_or_default();
        Form {
            kind,
            mode,
            fields,
            focused: 0,
            editor: TextArea::from(notes.lines().collect::<Vec<_>>()),
            error: None,
        }
    }

    pub fn kind(&self) -> &FormKind {
        &self.kind
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Title shown above the form.
    ///
    pub fn title(&self) -> String {
        match (&self.kind, &self.mode) {
            (FormKind::Entity(c), FormMode::Create) => format!("Create {}", c.singular()),
            (FormKind::Entity(c), FormMode::Edit { .. }) => format!("Edit {}", c.singular()),
            (FormKind::Asset { .. }, _) => "Add asset".to_string(),
            (FormKind::BudgetItem { .. }, _) => "Add budget item".to_string(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focused_field(&self) -> Option<&FormField> {
        self.fields.get(self.focused)
    }

    /// Whether the focused field is the multiline text area.
    ///
    pub fn is_editing_multiline(&self) -> bool {
        matches!(
            self.focused_field().map(|f| &f.input),
            Some(FieldInput::Multiline)
        )
    }

    pub fn editor(&self) -> &TextArea<'static> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.editor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) -> &mut Self {
        self.error = error;
        self
    }

    /// Move focus to the next field, wrapping around.
    ///
    pub fn next_field(&mut self) -> &mut Self {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
        self
    }

    /// Move focus to the previous field, wrapping around.
    ///
    pub fn previous_field(&mut self) -> &mut Self {
        if !self.fields.is_empty() {
            self.focused = if self.focused == 0 {
                self.fields.len() - 1
            } else {
                self.focused - 1
            };
        }
        self
    }

    /// Type a character into the focused single-line field. Choice fields
    /// ignore typing.
    ///
    pub fn input_char(&mut self, c: char) -> &mut Self {
        if let Some(field) = self.fields.get_mut(self.focused) {
            match field.input {
                FieldInput::Choice(_) | FieldInput::Multiline => {}
                _ => {
                    field.value.push(c);
                    self.error = None;
                }
            }
        }
        self
    }

    /// Delete the last character of the focused single-line field.
    ///
    pub fn backspace(&mut self) -> &mut Self {
        if let Some(field) = self.fields.get_mut(self.focused) {
            match field.input {
                FieldInput::Choice(_) | FieldInput::Multiline => {}
                _ => {
                    field.value.pop();
                }
            }
        }
        self
    }

    /// Step the focused choice field to the next or previous option.
    ///
    pub fn cycle_choice(&mut self, forward: bool) -> &mut Self {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if let FieldInput::Choice(options) = &field.input {
                if options.is_empty() {
                    return self;
                }
                let current = options
                    .iter()
                    .position(|o| *o == field.value)
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % options.len()
                } else if current == 0 {
                    options.len() - 1
                } else {
                    current - 1
                };
                field.value = options[next].to_string();
            }
        }
        self
    }

    /// Current value of a field. Multiline fields read from the text area.
    ///
    pub fn value(&self, key: &str) -> Option<String> {
        self.fields.iter().find(|f| f.key == key).map(|f| {
            if f.input == FieldInput::Multiline {
                self.editor.lines().join("\n")
            } else {
                f.value.clone()
            }
        })
    }

    /// Replace the value of a single-line field.
    ///
    pub fn set_value(&mut self, key: &str, value: &str) -> &mut Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.to_string();
        }
        self
    }

    /// Check every field and return the collected values, or the first
    /// failure in field order.
    ///
    pub fn validate(&self) -> Result<FormValues, FormError> {
        let mut values = FormValues::new();
        for field in &self.fields {
            let value = self.value(field.key).unwrap_or_default();
            let trimmed = value.trim();
            if trimmed.is_empty() {
                if field.required {
                    return Err(FormError::MissingField(field.label.to_string()));
                }
                values.values.insert(field.key, value);
                continue;
            }
            match field.input {
                FieldInput::Email if !is_email(trimmed) => {
                    return Err(FormError::InvalidEmail(field.label.to_string()))
                }
                FieldInput::Number => match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() && n >= 0.0 => {}
                    _ => return Err(FormError::InvalidNumber(field.label.to_string())),
                },
                FieldInput::Date if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_err() => {
                    return Err(FormError::InvalidDate(field.label.to_string()))
                }
                FieldInput::Time if NaiveTime::parse_from_str(trimmed, "%H:%M").is_err() => {
                    return Err(FormError::InvalidTime(field.label.to_string()))
                }
                _ => {}
            }
            values.values.insert(field.key, value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::Priority;

    fn form() -> Form {
        Form::new(
            FormKind::Entity(Collection::Tasks),
            FormMode::Create,
            vec![
                FormField::text("title", "Title", "").required(),
                FormField::choice("priority", "Priority", Priority::Low),
                FormField::date("due_date", "Due date", None),
                FormField::time("due_time", "Due time", None),
                FormField::number("budget", "Budget", 0.0),
                FormField::email("email", "Email", ""),
                FormField::multiline("notes", "Notes", "first\nsecond"),
            ],
        )
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = form();
        form.input_char('H').input_char('i');
        assert_eq!(form.value("title").as_deref(), Some("Hi"));
        form.backspace();
        assert_eq!(form.value("title").as_deref(), Some("H"));
    }

    #[test]
    fn choice_fields_ignore_typing_and_cycle() {
        let mut form = form();
        form.next_field();
        form.input_char('x');
        assert_eq!(form.value("priority").as_deref(), Some("Low"));
        form.cycle_choice(true);
        assert_eq!(form.value("priority").as_deref(), Some("Medium"));
        form.cycle_choice(false).cycle_choice(false).cycle_choice(false);
        assert_eq!(form.value("priority").as_deref(), Some("High"));
    }

    #[test]
    fn focus_wraps() {
        let mut form = form();
        form.previous_field();
        assert_eq!(form.focused(), 6);
        assert!(form.is_editing_multiline());
        form.next_field();
        assert_eq!(form.focused(), 0);
    }

    #[test]
    fn multiline_value_comes_from_editor() {
        let form = form();
        assert_eq!(form.value("notes").as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn validate_requires_presence() {
        let mut form = form();
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::MissingField("Title".to_string())
        );
        form.set_value("title", "   ");
        assert!(form.validate().is_err());
        form.set_value("title", "Call Bob");
        let values = form.validate().unwrap();
        assert_eq!(values.text("title"), "Call Bob");
        assert_eq!(values.choice::<Priority>("priority"), Priority::Low);
        assert_eq!(values.optional("due_date"), None);
    }

    #[test]
    fn validate_checks_formats() {
        let mut form = form();
        form.set_value("title", "Call Bob");

        form.set_value("due_date", "31/03/2025");
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::InvalidDate("Due date".to_string())
        );
        form.set_value("due_date", "2025-03-31");

        form.set_value("due_time", "9am");
        assert!(matches!(form.validate(), Err(FormError::InvalidTime(_))));
        form.set_value("due_time", "09:30");

        form.set_value("budget", "-5");
        assert!(matches!(form.validate(), Err(FormError::InvalidNumber(_))));
        form.set_value("budget", "1500.50");

        form.set_value("email", "not-an-email");
        assert!(matches!(form.validate(), Err(FormError::InvalidEmail(_))));
        form.set_value("email", "bob@example.com");

        let values = form.validate().unwrap();
        assert_eq!(values.number("budget"), 1500.5);
        assert_eq!(values.multiline("notes"), "first\nsecond");
    }

    #[test]
    fn is_email_examples() {
        assert!(is_email("jane@example.com"));
        assert!(!is_email("jane@example"));
        assert!(!is_email("jane example.com"));
        assert!(!is_email("@example.com"));
    }

    #[test]
    fn title_reflects_kind_and_mode() {
        assert_eq!(form().title(), "Create task");
        let edit = Form::new(
            FormKind::Entity(Collection::Campaigns),
            FormMode::Edit {
                id: "1".to_string(),
            },
            vec![],
        );
        assert_eq!(edit.title(), "Edit campaign");
        let asset = Form::new(
            FormKind::Asset {
                campaign_id: "1".to_string(),
            },
            FormMode::Create,
            vec![],
        );
        assert_eq!(asset.title(), "Add asset");
    }

    #[test]
    fn form_values_helpers() {
        let values = FormValues::new()
            .with("name", "  Q4 Launch ")
            .with("budget", "abc");
        assert_eq!(values.text("name"), "Q4 Launch");
        assert_eq!(values.number("budget"), 0.0);
        assert_eq!(values.text("missing"), "");
        assert_eq!(values.choice::<Priority>("missing"), Priority::None);
    }
}
