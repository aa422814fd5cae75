//! Game client event messages
//!
//! Every message is a JSON array: `["<TypeTag>", "<player>", <payload>, ...]`.

pub mod kind;
pub mod payload;

pub use kind::EventKind;
pub use payload::{describe_path, strings, Payload};

use crate::error::{GuideError, Result};

/// One decoded event message
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Type tag as received, quotes stripped
    pub tag: String,
    /// `None` for tags this build does not recognize
    pub kind: Option<EventKind>,
    /// The whole message array, tag included, so handlers index positions as sent
    pub body: Payload,
}

impl Event {
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_payload(Payload::decode(text)?)
    }

    /// Only the outer shape is checked here: an array led by a string tag.
    /// Payload positions are each handler's business.
    pub fn from_payload(body: Payload) -> Result<Self> {
        if body.as_list().is_none() {
            return Err(GuideError::MalformedEvent(
                "event is not a JSON array".to_string(),
            ));
        }
        let raw_tag = body
            .str_at(&[0])
            .ok_or_else(|| GuideError::MalformedEvent("missing type tag".to_string()))?;
        let tag = raw_tag.trim_matches('"').to_string();
        let kind = EventKind::from_tag(&tag);

        Ok(Self { tag, kind, body })
    }

    pub fn player(&self) -> Option<&str> {
        self.body.str_at(&[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_event() {
        let event = Event::parse(r#"["DraftCardPicked","P",["Accursed Jerkin"]]"#).unwrap();
        assert_eq!(event.tag, "DraftCardPicked");
        assert_eq!(event.kind, Some(EventKind::DraftCardPicked));
        assert_eq!(event.player(), Some("P"));
    }

    #[test]
    fn test_parse_unknown_tag_is_not_an_error() {
        let event = Event::parse(r#"["Foo"]"#).unwrap();
        assert_eq!(event.tag, "Foo");
        assert_eq!(event.kind, None);
    }

    #[test]
    fn test_quoted_tag_is_stripped() {
        let event = Event::parse(r#"["\"Logout\"","Dylan"]"#).unwrap();
        assert_eq!(event.kind, Some(EventKind::Logout));
    }

    #[test]
    fn test_bad_shapes() {
        assert!(matches!(
            Event::parse(r#"{"type":"Logout"}"#),
            Err(GuideError::MalformedEvent(_))
        ));
        assert!(matches!(
            Event::parse("[]"),
            Err(GuideError::MalformedEvent(_))
        ));
        assert!(matches!(
            Event::parse("[42, \"x\"]"),
            Err(GuideError::MalformedEvent(_))
        ));
        assert!(matches!(Event::parse("not json"), Err(GuideError::Json(_))));
    }
}
