//! Field rules for todo payloads.
//!
//! Request bodies are checked field by field against the raw JSON so that a
//! wrong type is reported as a field error (422) rather than a body
//! deserialization failure. A successful check yields [`NewTodo`] or
//! [`TodoPatch`], which can only hold valid values.

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

pub const TITLE_MAX_CHARS: usize = 255;

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const IS_DONE: &str = "is_done";

/// Field name → reasons, in the order the fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, reason: impl Into<String>) {
        let reason = reason.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, reasons)) => reasons.push(reason),
            None => self.fields.push((field, vec![reason])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of reasons across all fields.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, reasons)| reasons.len()).sum()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, reasons)| reasons.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// First reason, with a count of the remaining ones.
    pub fn summary(&self) -> String {
        let Some(first) = self.fields.first().and_then(|(_, reasons)| reasons.first()) else {
            return "The given data was invalid.".to_string();
        };
        match self.len() - 1 {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            more => format!("{first} (and {more} more errors)"),
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, reasons) in &self.fields {
            map.serialize_entry(field, reasons)?;
        }
        map.end()
    }
}

/// A todo that passed the create rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    description: Option<String>,
    is_done: bool,
}

impl NewTodo {
    pub fn new(
        title: &str,
        description: Option<&str>,
        is_done: bool,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = check_title_str(title).map_err(|reason| errors.add(TITLE, reason));
        errors.into_result(Self {
            title: title.unwrap_or_default(),
            description: description.and_then(normalize_text),
            is_done,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }
}

/// The subset of fields an update request supplied.
///
/// `description` is `Some(None)` when the request explicitly cleared it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    title: Option<String>,
    description: Option<Option<String>>,
    is_done: Option<bool>,
}

impl TodoPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Result<Self, ValidationErrors> {
        match check_title_str(title) {
            Ok(title) => {
                self.title = Some(title);
                Ok(self)
            }
            Err(reason) => {
                let mut errors = ValidationErrors::new();
                errors.add(TITLE, reason);
                Err(errors)
            }
        }
    }

    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = Some(description.and_then(normalize_text));
        self
    }

    pub fn is_done(mut self, is_done: bool) -> Self {
        self.is_done = Some(is_done);
        self
    }

    pub fn into_parts(self) -> (Option<String>, Option<Option<String>>, Option<bool>) {
        (self.title, self.description, self.is_done)
    }
}

/// Rules for `POST /todos`: `title` required, `description` nullable string,
/// `is_done` boolean defaulting to `false`.
pub fn validate_create(payload: &Value) -> Result<NewTodo, ValidationErrors> {
    let fields = object_fields(payload);
    let mut errors = ValidationErrors::new();

    let title = match fields.and_then(|fields| fields.get(TITLE)) {
        Some(value) => check_title(value),
        None => Err(required(TITLE)),
    }
    .map_err(|reason| errors.add(TITLE, reason))
    .ok();

    let description = match fields.and_then(|fields| fields.get(DESCRIPTION)) {
        Some(value) => check_description(value)
            .map_err(|reason| errors.add(DESCRIPTION, reason))
            .ok()
            .flatten(),
        None => None,
    };

    let is_done = match fields.and_then(|fields| fields.get(IS_DONE)) {
        Some(value) => check_boolean(IS_DONE, value)
            .map_err(|reason| errors.add(IS_DONE, reason))
            .unwrap_or_default(),
        None => false,
    };

    errors.into_result(NewTodo {
        title: title.unwrap_or_default(),
        description,
        is_done,
    })
}

/// Rules for `PUT/PATCH /todos/{id}`: every field optional, but a present
/// field must satisfy the same rule as on create.
pub fn validate_update(payload: &Value) -> Result<TodoPatch, ValidationErrors> {
    let Some(fields) = object_fields(payload) else {
        return Ok(TodoPatch::new());
    };
    let mut errors = ValidationErrors::new();
    let mut patch = TodoPatch::new();

    if let Some(value) = fields.get(TITLE) {
        match check_title(value) {
            Ok(title) => patch.title = Some(title),
            Err(reason) => errors.add(TITLE, reason),
        }
    }

    if let Some(value) = fields.get(DESCRIPTION) {
        match check_description(value) {
            Ok(description) => patch.description = Some(description),
            Err(reason) => errors.add(DESCRIPTION, reason),
        }
    }

    if let Some(value) = fields.get(IS_DONE) {
        match check_boolean(IS_DONE, value) {
            Ok(is_done) => patch.is_done = Some(is_done),
            Err(reason) => errors.add(IS_DONE, reason),
        }
    }

    errors.into_result(patch)
}

// Anything other than an object carries no fields.
fn object_fields(payload: &Value) -> Option<&Map<String, Value>> {
    payload.as_object()
}

fn check_title(value: &Value) -> Result<String, String> {
    match value {
        Value::Null => Err(required(TITLE)),
        Value::String(raw) => check_title_str(raw),
        _ => Err(must_be_string(TITLE)),
    }
}

fn check_title_str(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(required(TITLE));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(format!(
            "The {TITLE} field must not be greater than {TITLE_MAX_CHARS} characters."
        ));
    }
    Ok(trimmed.to_string())
}

fn check_description(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => Ok(normalize_text(raw)),
        _ => Err(must_be_string(DESCRIPTION)),
    }
}

fn check_boolean(field: &'static str, value: &Value) -> Result<bool, String> {
    let parsed = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(raw) => match raw.as_str() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| format!("The {field} field must be true or false."))
}

// Blank text is stored as NULL.
fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(field: &str) -> String {
    format!("The {field} field is required.")
}

fn must_be_string(field: &str) -> String {
    format!("The {field} field must be a string.")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{NewTodo, TodoPatch, ValidationErrors, validate_create, validate_update};

    #[test]
    fn create_defaults_is_done_to_false() {
        let todo = validate_create(&json!({ "title": "Buy milk" })).expect("payload is valid");
        assert_eq!(todo.title(), "Buy milk");
        assert_eq!(todo.description(), None);
        assert!(!todo.is_done());
    }

    #[test]
    fn create_accepts_explicit_done_flag_and_trims_text() {
        let todo = validate_create(&json!({
            "title": "  Read  ",
            "description": "  chapter 3 ",
            "is_done": true,
        }))
        .expect("payload is valid");
        assert_eq!(todo.title(), "Read");
        assert_eq!(todo.description(), Some("chapter 3"));
        assert!(todo.is_done());
    }

    #[test]
    fn create_requires_a_title() {
        for payload in [
            json!({}),
            json!({ "title": "" }),
            json!({ "title": "   " }),
            json!({ "title": null }),
            json!([]),
        ] {
            let errors = validate_create(&payload).expect_err("title is required");
            assert_eq!(
                errors.get("title"),
                Some(["The title field is required.".to_string()].as_slice()),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn title_length_boundary_is_255_characters() {
        let at_limit = "é".repeat(255);
        assert!(validate_create(&json!({ "title": at_limit })).is_ok());

        let over_limit = "a".repeat(256);
        let errors = validate_create(&json!({ "title": over_limit })).expect_err("too long");
        assert_eq!(
            errors.summary(),
            "The title field must not be greater than 255 characters."
        );
    }

    #[test]
    fn wrong_types_are_reported_per_field() {
        let errors = validate_create(&json!({
            "title": 12,
            "description": ["x"],
            "is_done": "yes",
        }))
        .expect_err("every field is invalid");

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["title", "description", "is_done"]);
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.summary(),
            "The title field must be a string. (and 2 more errors)"
        );
    }

    #[test]
    fn boolean_like_values_are_accepted() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
        ] {
            let patch = validate_update(&json!({ "is_done": raw })).expect("boolean-like");
            assert_eq!(patch, TodoPatch::new().is_done(expected));
        }
    }

    #[test]
    fn null_done_flag_is_rejected() {
        let errors = validate_update(&json!({ "is_done": null })).expect_err("null flag");
        assert_eq!(errors.summary(), "The is_done field must be true or false.");
    }

    #[test]
    fn update_only_carries_supplied_fields() {
        let patch = validate_update(&json!({ "is_done": true, "unknown": 1 })).expect("valid");
        assert_eq!(patch.into_parts(), (None, None, Some(true)));
    }

    #[test]
    fn update_can_clear_the_description() {
        let patch = validate_update(&json!({ "description": null })).expect("valid");
        assert_eq!(patch.into_parts(), (None, Some(None), None));

        let patch = validate_update(&json!({ "description": "  " })).expect("valid");
        assert_eq!(patch.into_parts(), (None, Some(None), None));
    }

    #[test]
    fn update_rejects_empty_or_null_title_when_present() {
        for payload in [json!({ "title": "" }), json!({ "title": null })] {
            let errors = validate_update(&payload).expect_err("title must stay valid");
            assert_eq!(errors.summary(), "The title field is required.");
        }
    }

    #[test]
    fn non_object_update_body_is_an_empty_patch() {
        let patch = validate_update(&json!("nonsense")).expect("nothing to check");
        assert_eq!(patch.into_parts(), (None, None, None));
    }

    #[test]
    fn typed_constructors_apply_the_same_title_rule() {
        assert!(NewTodo::new("", None, false).is_err());
        assert!(TodoPatch::new().title(&"x".repeat(256)).is_err());

        let todo = NewTodo::new("Ship it", Some(""), false).expect("valid");
        assert_eq!(todo.description(), None);
    }

    #[test]
    fn errors_serialize_as_field_map_in_check_order() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "first");
        errors.add("is_done", "second");
        errors.add("title", "third");

        let value = serde_json::to_value(&errors).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({ "title": ["first", "third"], "is_done": ["second"] })
        );
        assert_eq!(errors.summary(), "first (and 2 more errors)");
    }
}
