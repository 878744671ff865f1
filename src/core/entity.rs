//! Entity kinds and decoded entities.
//!
//! Entity kinds are static configuration: each declares its required
//! fields, the optional fields consumers know about, the names it is
//! spelled with in every marker syntax, and a validation-error template.

use crate::core::Marker;
use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field mapping produced by the decoder.
pub type Fields = BTreeMap<String, String>;

/// Registered entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Contact card.
    Contact,
    /// Calendar event.
    Event,
}

/// Static definition of an entity kind.
#[derive(Debug)]
pub struct KindSpec {
    /// The kind described.
    pub kind: EntityKind,
    /// Canonical lowercase name.
    pub name: &'static str,
    /// Fields that must be present and non-empty.
    pub required: &'static [&'static str],
    /// Optional fields understood by consumers.
    pub optional: &'static [&'static str],
    /// Tag names (tag family, matched case-insensitively).
    pub tag_names: &'static [&'static str],
    /// Uppercase labels (delimiter family).
    pub labels: &'static [&'static str],
    /// Sentinel names (fenced family).
    pub fence_names: &'static [&'static str],
    /// Validation message; `{kind}` and `{field}` are substituted.
    pub error_template: &'static str,
}

static CONTACT: KindSpec = KindSpec {
    kind: EntityKind::Contact,
    name: "contact",
    required: &["name"],
    optional: &["email", "phone", "address", "avatar"],
    tag_names: &["contactcard", "contact"],
    labels: &["CONTACT"],
    fence_names: &["contact"],
    error_template: "{kind} missing required \"{field}\" field",
};

static EVENT: KindSpec = KindSpec {
    kind: EntityKind::Event,
    name: "event",
    required: &["title", "date"],
    optional: &["startTime", "endTime", "location", "description"],
    tag_names: &["calendarevent", "calendar-event", "event"],
    labels: &["CALENDAR", "EVENT"],
    fence_names: &["event"],
    error_template: "{kind} missing required \"{field}\" field",
};

impl EntityKind {
    /// All registered kinds.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Contact, Self::Event]
    }

    /// Returns the static definition for this kind.
    #[must_use]
    pub fn spec(self) -> &'static KindSpec {
        match self {
            Self::Contact => &CONTACT,
            Self::Event => &EVENT,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Looks up a kind by tag name, ignoring ASCII case.
    #[must_use]
    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|k| k.spec().tag_names.iter().any(|t| t.eq_ignore_ascii_case(name)))
    }

    /// Looks up a kind by delimiter label (exact, uppercase).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|k| k.spec().labels.iter().any(|l| *l == label))
    }

    /// Looks up a kind by fence sentinel name.
    #[must_use]
    pub fn from_fence_name(name: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|k| k.spec().fence_names.iter().any(|n| *n == name))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl KindSpec {
    /// Returns true if `field` is required or a known optional field.
    #[must_use]
    pub fn is_known(&self, field: &str) -> bool {
        self.required.iter().chain(self.optional).any(|f| *f == field)
    }

    /// Renders the validation message for a missing field.
    #[must_use]
    pub fn missing_field_message(&self, field: &str) -> String {
        self.error_template
            .replace("{kind}", self.name)
            .replace("{field}", field)
    }

    /// Checks that every required field is present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] for the first missing field.
    pub fn validate(&self, fields: &Fields) -> Result<(), PayloadError> {
        for field in self.required {
            let present = fields.get(*field).is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(PayloadError::MissingField {
                    field: (*field).to_string(),
                    message: self.missing_field_message(field),
                });
            }
        }
        Ok(())
    }
}

/// Decoded, validated payload of a complete marker.
///
/// Entities can only be constructed through [`Entity::new`], which rejects
/// partial markers and missing required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity kind.
    pub kind: EntityKind,

    /// Decoded fields. Unknown fields are retained.
    pub fields: Fields,

    /// Source marker.
    pub marker: Marker,
}

impl Entity {
    /// Builds an entity from decoded fields.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::IncompleteMarker`] for partial markers and
    /// [`PayloadError::MissingField`] when validation fails.
    pub fn new(kind: EntityKind, fields: Fields, marker: Marker) -> Result<Self, PayloadError> {
        if !marker.is_complete() {
            return Err(PayloadError::IncompleteMarker);
        }
        kind.spec().validate(&fields)?;
        Ok(Self {
            kind,
            fields,
            marker,
        })
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Typed contact view, if this is a contact.
    #[must_use]
    pub fn as_contact(&self) -> Option<Contact> {
        (self.kind == EntityKind::Contact).then(|| Contact {
            name: self.get("name").unwrap_or_default().to_string(),
            email: self.get("email").map(str::to_string),
            phone: self.get("phone").map(str::to_string),
            address: self.get("address").map(str::to_string),
            avatar: self.get("avatar").map(str::to_string),
        })
    }

    /// Typed event view, if this is an event.
    #[must_use]
    pub fn as_event(&self) -> Option<CalendarEvent> {
        (self.kind == EntityKind::Event).then(|| CalendarEvent {
            title: self.get("title").unwrap_or_default().to_string(),
            date: self.get("date").unwrap_or_default().to_string(),
            start_time: self.get("startTime").map(str::to_string),
            end_time: self.get("endTime").map(str::to_string),
            location: self.get("location").map(str::to_string),
            description: self.get("description").map(str::to_string),
        })
    }
}

/// Contact card data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Display name.
    pub name: String,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Calendar event data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Event title.
    pub title: String,
    /// Event date as written by the model.
    pub date: String,
    /// Start time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
