use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A timed piece of an annotated transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    pub text: String,
}

/// Recognised transcript layouts, checked in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptContent {
    /// The whole document is a JSON string
    PlainText(String),
    /// `{"text": "..."}`
    FieldText(String),
    /// `{"transcript": "..."}`
    FieldTranscript(String),
    /// `{"annotation": [{"start", "end", "text"}, ...]}`
    Annotations(Vec<Segment>),
    /// A top-level array; items are usually objects with `text`
    Segments(Vec<Value>),
    /// Anything else
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptShape {
    PlainText,
    FieldText,
    FieldTranscript,
    Annotations,
    Segments,
    Raw,
}

/// A parsed sidecar: the original JSON plus its classified content
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptDocument {
    content: TranscriptContent,
    raw: Value,
}

impl TranscriptDocument {
    pub fn from_value(raw: Value) -> Self {
        let content = classify(&raw);
        Self { content, raw }
    }

    pub fn content(&self) -> &TranscriptContent {
        &self.content
    }

    pub fn shape(&self) -> TranscriptShape {
        match self.content {
            TranscriptContent::PlainText(_) => TranscriptShape::PlainText,
            TranscriptContent::FieldText(_) => TranscriptShape::FieldText,
            TranscriptContent::FieldTranscript(_) => TranscriptShape::FieldTranscript,
            TranscriptContent::Annotations(_) => TranscriptShape::Annotations,
            TranscriptContent::Segments(_) => TranscriptShape::Segments,
            TranscriptContent::Raw => TranscriptShape::Raw,
        }
    }

    /// The JSON exactly as read from disk
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// Plain-text rendering: segments one per line, unknown layouts
    /// pretty-printed.
    pub fn display_text(&self) -> String {
        match &self.content {
            TranscriptContent::PlainText(text)
            | TranscriptContent::FieldText(text)
            | TranscriptContent::FieldTranscript(text) => text.clone(),
            TranscriptContent::Annotations(segments) => segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            TranscriptContent::Segments(items) => items
                .iter()
                .map(segment_line)
                .collect::<Vec<_>>()
                .join("\n"),
            TranscriptContent::Raw => {
                serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
            }
        }
    }
}

fn classify(raw: &Value) -> TranscriptContent {
    match raw {
        Value::String(text) => TranscriptContent::PlainText(text.clone()),
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                TranscriptContent::FieldText(text.clone())
            } else if let Some(Value::String(text)) = map.get("transcript") {
                TranscriptContent::FieldTranscript(text.clone())
            } else if let Some(segments) = map
                .get("annotation")
                .filter(|v| v.is_array())
                .and_then(|v| Vec::<Segment>::deserialize(v).ok())
            {
                TranscriptContent::Annotations(segments)
            } else {
                TranscriptContent::Raw
            }
        }
        Value::Array(items) => TranscriptContent::Segments(items.clone()),
        _ => TranscriptContent::Raw,
    }
}

fn segment_line(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => item.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape_of(value: Value) -> TranscriptShape {
        TranscriptDocument::from_value(value).shape()
    }

    #[test]
    fn test_shapes() {
        assert_eq!(shape_of(json!("hello")), TranscriptShape::PlainText);
        assert_eq!(shape_of(json!({"text": "hello"})), TranscriptShape::FieldText);
        assert_eq!(
            shape_of(json!({"transcript": "hello"})),
            TranscriptShape::FieldTranscript
        );
        assert_eq!(
            shape_of(json!({"annotation": [{"start": 0, "end": 2.5, "text": "hi"}]})),
            TranscriptShape::Annotations
        );
        assert_eq!(
            shape_of(json!([{"text": "a"}, {"text": "b"}])),
            TranscriptShape::Segments
        );
        assert_eq!(shape_of(json!({"words": []})), TranscriptShape::Raw);
        assert_eq!(shape_of(json!(42)), TranscriptShape::Raw);
        assert_eq!(shape_of(json!(null)), TranscriptShape::Raw);
    }

    #[test]
    fn test_text_field_takes_precedence() {
        let doc = TranscriptDocument::from_value(json!({
            "text": "full text",
            "transcript": "other",
            "annotation": [{"start": 0, "end": 1, "text": "seg"}]
        }));
        assert_eq!(doc.content(), &TranscriptContent::FieldText("full text".into()));
    }

    #[test]
    fn test_annotation_segments() {
        let doc = TranscriptDocument::from_value(json!({
            "annotation": [
                {"start": 0, "end": 2.5, "text": "hi"},
                {"start": 2.5, "end": 4, "text": "there"}
            ]
        }));
        match doc.content() {
            TranscriptContent::Annotations(segments) => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[0].end, 2.5);
                assert_eq!(segments[1].text, "there");
            }
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(doc.display_text(), "hi\nthere");
    }

    #[test]
    fn test_malformed_annotation_is_raw() {
        let doc = TranscriptDocument::from_value(json!({"annotation": [{"text": "no times"}]}));
        assert_eq!(doc.shape(), TranscriptShape::Raw);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(
            TranscriptDocument::from_value(json!({"transcript": "x"})).display_text(),
            "x"
        );
        assert_eq!(
            TranscriptDocument::from_value(json!([{"text": "a"}, "b", 3])).display_text(),
            "a\nb\n3"
        );

        let raw = json!({"language": "ben"});
        let doc = TranscriptDocument::from_value(raw.clone());
        assert_eq!(doc.display_text(), serde_json::to_string_pretty(&raw).unwrap());
        assert_eq!(doc.into_raw(), raw);
    }
}
