//! Canned replies for the mock content generator.
//!
//! Each preset exists once per syntax family so that a demo can switch
//! rendering modes without changing what the "model" says. The preset is
//! picked from the last user message by keyword.

use crate::core::SyntaxMode;
use crate::error::StreamError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// One contact card.
    Contact,
    /// One calendar event.
    Calendar,
    /// A contact and an event.
    Both,
    /// Markdown prose with no entities.
    Text,
    /// Two contacts and two events.
    Multi,
}

/// Keywords checked in order against the lowercased message.
///
/// Multi-entity keywords come first so that "several contacts" is not
/// taken for a single contact.
const KEYWORDS: &[(&str, Preset)] = &[
    ("multiple", Preset::Multi),
    ("several", Preset::Multi),
    ("many", Preset::Multi),
    ("everything", Preset::Both),
    ("text", Preset::Text),
    ("markdown", Preset::Text),
    ("plain", Preset::Text),
    ("contact", Preset::Contact),
    ("email", Preset::Contact),
    ("phone", Preset::Contact),
    ("meeting", Preset::Calendar),
    ("schedule", Preset::Calendar),
    ("event", Preset::Calendar),
    ("calendar", Preset::Calendar),
];

impl Preset {
    /// All presets.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Contact,
            Self::Calendar,
            Self::Both,
            Self::Text,
            Self::Multi,
        ]
    }

    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Calendar => "calendar",
            Self::Both => "both",
            Self::Text => "text",
            Self::Multi => "multi",
        }
    }

    /// Parses a preset name; `event` is accepted for `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::UnknownPreset`] for unknown names.
    pub fn parse(name: &str) -> Result<Self, StreamError> {
        match name.trim().to_lowercase().as_str() {
            "contact" => Ok(Self::Contact),
            "calendar" | "event" => Ok(Self::Calendar),
            "both" => Ok(Self::Both),
            "text" => Ok(Self::Text),
            "multi" => Ok(Self::Multi),
            _ => Err(StreamError::UnknownPreset {
                name: name.to_string(),
            }),
        }
    }

    /// Keywords that select this preset.
    #[must_use]
    pub fn keywords(self) -> Vec<&'static str> {
        KEYWORDS
            .iter()
            .filter(|(_, preset)| *preset == self)
            .map(|(keyword, _)| *keyword)
            .collect()
    }

    /// Picks a preset for a user message. Defaults to [`Preset::Both`].
    #[must_use]
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map_or(Self::Both, |(_, preset)| *preset)
    }

    /// Reply text in the given syntax family.
    #[must_use]
    pub const fn content(self, syntax: SyntaxMode) -> &'static str {
        match (syntax, self) {
            (SyntaxMode::Tag, Self::Contact) => TAG_CONTACT,
            (SyntaxMode::Tag, Self::Calendar) => TAG_CALENDAR,
            (SyntaxMode::Tag, Self::Both) => TAG_BOTH,
            (SyntaxMode::Tag, Self::Multi) => TAG_MULTI,
            (SyntaxMode::Delimiter, Self::Contact) => DELIMITER_CONTACT,
            (SyntaxMode::Delimiter, Self::Calendar) => DELIMITER_CALENDAR,
            (SyntaxMode::Delimiter, Self::Both) => DELIMITER_BOTH,
            (SyntaxMode::Delimiter, Self::Multi) => DELIMITER_MULTI,
            (SyntaxMode::Fenced, Self::Contact) => FENCED_CONTACT,
            (SyntaxMode::Fenced, Self::Calendar) => FENCED_CALENDAR,
            (SyntaxMode::Fenced, Self::Both) => FENCED_BOTH,
            (SyntaxMode::Fenced, Self::Multi) => FENCED_MULTI,
            (_, Self::Text) => TEXT,
        }
    }

    /// Number of entities the preset's reply contains.
    #[must_use]
    pub const fn entity_count(self) -> usize {
        match self {
            Self::Contact | Self::Calendar => 1,
            Self::Both => 2,
            Self::Text => 0,
            Self::Multi => 4,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One part of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    /// Part type; only `text` parts carry prose.
    #[serde(rename = "type")]
    pub kind: String,
    /// Text of a `text` part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A chat message, either with a plain `content` string or with `parts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `user`, `assistant` or `system`.
    pub role: String,
    /// Plain content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Structured parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<MessagePart>>,
}

impl ChatMessage {
    /// Creates a user message with plain content.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            parts: None,
        }
    }

    /// Text of the message: `content`, or the concatenated text parts.
    #[must_use]
    pub fn text(&self) -> String {
        if let Some(content) = &self.content {
            return content.clone();
        }
        self.parts
            .iter()
            .flatten()
            .filter(|p| p.kind == "text")
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// Text of the last user message with non-empty text, or `""`.
#[must_use]
pub fn last_user_message(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .filter(|m| m.role == "user")
        .map(ChatMessage::text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Picks the reply for a conversation in the given syntax family.
#[must_use]
pub fn reply_for(messages: &[ChatMessage], syntax: SyntaxMode) -> &'static str {
    Preset::detect(&last_user_message(messages)).content(syntax)
}

const TEXT: &str = "Here's a summary of the project status:

## Current Progress
The development team has completed the following milestones:

1. **Authentication System** - Fully implemented with JWT tokens
2. **User Dashboard** - Basic layout complete, needs polish
3. **API Integration** - Connected to all external services

### Next Steps
We need to focus on testing and documentation before the release.

Let me know if you have any questions about the timeline.";

const TAG_CONTACT: &str = r#"Here's the contact information you requested:

<contactcard name="John Smith" email="john.smith@example.com" phone="+1-555-123-4567"></contactcard>

I found John's details in our database. He's a senior developer based in San Francisco."#;

const TAG_CALENDAR: &str = r#"I've scheduled the meeting for you:

<calendarevent title="Meeting with John" date="2026-01-25" startTime="2:00 PM" endTime="3:00 PM" location="Conference Room A"></calendarevent>

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const TAG_BOTH: &str = r#"Here's the contact information you requested:

<contactcard name="John Smith" email="john.smith@example.com" phone="+1-555-123-4567"></contactcard>

I found John's details in our database. He's a senior developer based in San Francisco.

Would you like me to schedule a meeting with John? I can set something up for next week:

<calendarevent title="Meeting with John" date="2026-01-25" startTime="2:00 PM" endTime="3:00 PM" location="Conference Room A"></calendarevent>

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const TAG_MULTI: &str = r#"Here are all the contacts from our team:

<contactcard name="John Smith" email="john.smith@example.com" phone="+1-555-123-4567"></contactcard>

<contactcard name="Jane Doe" email="jane.doe@example.com" phone="+1-555-987-6543"></contactcard>

And here are the upcoming team meetings:

<calendarevent title="Sprint Planning" date="2026-01-25" startTime="10:00 AM" endTime="11:00 AM" location="Conference Room A"></calendarevent>

<calendarevent title="Design Review" date="2026-01-26" startTime="2:00 PM" endTime="3:00 PM" location="Virtual - Zoom"></calendarevent>

Let me know if you need to add anyone else to these meetings."#;

const DELIMITER_CONTACT: &str = r#"Here's the contact information you requested:

【CONTACT:{"name":"John Smith","email":"john.smith@example.com","phone":"+1-555-123-4567"}】

I found John's details in our database. He's a senior developer based in San Francisco."#;

const DELIMITER_CALENDAR: &str = r#"I've scheduled the meeting for you:

【CALENDAR:{"title":"Meeting with John","date":"2026-01-25","startTime":"2:00 PM","endTime":"3:00 PM","location":"Conference Room A"}】

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const DELIMITER_BOTH: &str = r#"Here's the contact information you requested:

【CONTACT:{"name":"John Smith","email":"john.smith@example.com","phone":"+1-555-123-4567"}】

I found John's details in our database. He's a senior developer based in San Francisco.

Would you like me to schedule a meeting with John? I can set something up for next week:

【CALENDAR:{"title":"Meeting with John","date":"2026-01-25","startTime":"2:00 PM","endTime":"3:00 PM","location":"Conference Room A"}】

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const DELIMITER_MULTI: &str = r#"Here are all the contacts from our team:

【CONTACT:{"name":"John Smith","email":"john.smith@example.com","phone":"+1-555-123-4567"}】

【CONTACT:{"name":"Jane Doe","email":"jane.doe@example.com","phone":"+1-555-987-6543"}】

And here are the upcoming team meetings:

【CALENDAR:{"title":"Sprint Planning","date":"2026-01-25","startTime":"10:00 AM","endTime":"11:00 AM","location":"Conference Room A"}】

【CALENDAR:{"title":"Design Review","date":"2026-01-26","startTime":"2:00 PM","endTime":"3:00 PM","location":"Virtual - Zoom"}】

Let me know if you need to add anyone else to these meetings."#;

const FENCED_CONTACT: &str = r#"Here's the contact information you requested:

:::contact
```json
{"name": "John Smith", "email": "john.smith@example.com", "phone": "+1-555-123-4567"}
```
:::

I found John's details in our database. He's a senior developer based in San Francisco."#;

const FENCED_CALENDAR: &str = r#"I've scheduled the meeting for you:

:::event
```json
{"title": "Meeting with John", "date": "2026-01-25", "startTime": "2:00 PM", "endTime": "3:00 PM", "location": "Conference Room A"}
```
:::

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const FENCED_BOTH: &str = r#"Here's the contact information you requested:

:::contact
```json
{"name": "John Smith", "email": "john.smith@example.com", "phone": "+1-555-123-4567"}
```
:::

I found John's details in our database. He's a senior developer based in San Francisco.

Would you like me to schedule a meeting with John? I can set something up for next week:

:::event
```json
{"title": "Meeting with John", "date": "2026-01-25", "startTime": "2:00 PM", "endTime": "3:00 PM", "location": "Conference Room A"}
```
:::

Let me know if you'd like to adjust the time or add any notes to the meeting invite."#;

const FENCED_MULTI: &str = r#"Here are all the contacts from our team:

:::contact
```json
{"name": "John Smith", "email": "john.smith@example.com", "phone": "+1-555-123-4567"}
```
:::

:::contact
```json
{"name": "Jane Doe", "email": "jane.doe@example.com", "phone": "+1-555-987-6543"}
```
:::

And here are the upcoming team meetings:

:::event
```json
{"title": "Sprint Planning", "date": "2026-01-25", "startTime": "10:00 AM", "endTime": "11:00 AM", "location": "Conference Room A"}
```
:::

:::event
```json
{"title": "Design Review", "date": "2026-01-26", "startTime": "2:00 PM", "endTime": "3:00 PM", "location": "Virtual - Zoom"}
```
:::

Let me know if you need to add anyone else to these meetings."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment_finished;
    use test_case::test_case;

    #[test_case("Show me several contacts", Preset::Multi; "multi before contact")]
    #[test_case("Give me everything", Preset::Both; "everything")]
    #[test_case("Plain TEXT please", Preset::Text; "text case-insensitive")]
    #[test_case("What's Jo's phone?", Preset::Contact; "phone")]
    #[test_case("Schedule a meeting", Preset::Calendar; "meeting")]
    #[test_case("Any events?", Preset::Calendar; "event maps to calendar")]
    #[test_case("Hello", Preset::Both; "default")]
    fn test_detect(message: &str, expected: Preset) {
        assert_eq!(Preset::detect(message), expected);
    }

    #[test]
    fn test_parse_and_keywords() {
        assert_eq!(Preset::parse("event").unwrap(), Preset::Calendar);
        assert_eq!(Preset::parse("Multi").unwrap(), Preset::Multi);
        assert!(Preset::parse("nope").is_err());
        assert_eq!(Preset::Text.keywords(), vec!["text", "markdown", "plain"]);
    }

    #[test]
    fn test_last_user_message() {
        let messages = vec![
            ChatMessage::user("first contact"),
            ChatMessage {
                role: "assistant".to_string(),
                content: Some("ok".to_string()),
                parts: None,
            },
            ChatMessage {
                role: "user".to_string(),
                content: None,
                parts: Some(vec![
                    MessagePart {
                        kind: "text".to_string(),
                        text: Some("schedule ".to_string()),
                    },
                    MessagePart {
                        kind: "image".to_string(),
                        text: None,
                    },
                    MessagePart {
                        kind: "text".to_string(),
                        text: Some("it".to_string()),
                    },
                ]),
            },
            ChatMessage::user(""),
        ];
        assert_eq!(last_user_message(&messages), "schedule it");
        assert_eq!(reply_for(&messages, SyntaxMode::Tag), TAG_CALENDAR);
        assert_eq!(last_user_message(&[]), "");
    }

    #[test]
    fn test_every_preset_parses_cleanly() {
        for syntax in SyntaxMode::all() {
            for preset in Preset::all() {
                let result = segment_finished(preset.content(syntax), syntax);
                assert_eq!(result.entity_count(), preset.entity_count(), "{syntax}/{preset}");
                assert!(result.diagnostics.is_empty(), "{syntax}/{preset}");
            }
        }
    }
}
