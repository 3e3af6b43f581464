use super::{GatewayError, GatewayResult};
use crate::models::{DocumentId, Topic, TopicDocument};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Firestore REST document envelope.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(super) struct RestDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<RestDocument>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Last segment of a full resource name.
pub(super) fn id_from_name(name: &str) -> Option<DocumentId> {
    name.rsplit('/').next().and_then(DocumentId::new)
}

pub(super) fn encode_document(doc: &TopicDocument) -> GatewayResult<RestDocument> {
    let plain = serde_json::to_value(doc).map_err(GatewayError::parse)?;
    let Value::Object(obj) = plain else {
        return Err(GatewayError::parse("topic did not serialize to an object"));
    };

    Ok(RestDocument {
        name: None,
        fields: obj.into_iter().map(|(k, v)| (k, to_typed(v))).collect(),
    })
}

pub(super) fn decode_document(doc: RestDocument) -> GatewayResult<Topic> {
    let id = doc
        .name
        .as_deref()
        .and_then(id_from_name)
        .ok_or_else(|| GatewayError::parse("document without a name"))?;

    let plain = Value::Object(fields_to_plain(doc.fields));
    let body: TopicDocument = serde_json::from_value(plain)
        .map_err(|e| GatewayError::parse(format!("document {id}: {e}")))?;

    Ok(Topic { id, doc: body })
}

fn to_typed(v: Value) -> Value {
    match v {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.into_iter().map(to_typed).collect::<Vec<_>>() } })
        }
        Value::Object(obj) => {
            let fields: Map<String, Value> =
                obj.into_iter().map(|(k, v)| (k, to_typed(v))).collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn fields_to_plain(fields: Map<String, Value>) -> Map<String, Value> {
    fields
        .into_iter()
        .filter_map(|(k, v)| to_plain(v).map(|v| (k, v)))
        .collect()
}

/// Converts a typed value back to plain JSON.
///
/// Every topic field is a string, so numeric and boolean scalars are rendered
/// as strings (a year typed in as a number still reads back). Nulls become
/// absent fields and fall back to the document defaults.
fn to_plain(v: Value) -> Option<Value> {
    let Value::Object(mut obj) = v else {
        return None;
    };

    if let Some(s) = obj.remove("stringValue") {
        return Some(s);
    }
    if let Some(Value::String(s)) = obj.remove("integerValue") {
        return Some(Value::String(s));
    }
    if let Some(d) = obj.remove("doubleValue") {
        return Some(Value::String(d.to_string()));
    }
    if let Some(b) = obj.remove("booleanValue") {
        return Some(Value::String(b.to_string()));
    }
    if let Some(t) = obj.remove("timestampValue") {
        return Some(t);
    }
    if let Some(arr) = obj.remove("arrayValue") {
        let values = arr
            .get("values")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        return Some(Value::Array(values.into_iter().filter_map(to_plain).collect()));
    }
    if let Some(map) = obj.remove("mapValue") {
        let fields = map
            .get("fields")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();
        return Some(Value::Object(fields_to_plain(fields)));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, Section};

    fn rest_doc(value: Value) -> RestDocument {
        serde_json::from_value(value).expect("valid rest document")
    }

    #[test]
    fn test_encode_produces_typed_fields() {
        let doc = TopicDocument {
            title: "Polity Basics".to_string(),
            section: Section::MainsGs1,
            trend: "Asked every year".to_string(),
            study_link: String::new(),
            questions: vec![Question {
                q: "Explain federalism".to_string(),
                year: "2023".to_string(),
                solution: "Dual polity".to_string(),
            }],
        };

        let rest = encode_document(&doc).expect("should encode");
        assert!(rest.name.is_none());
        assert_eq!(rest.fields["title"]["stringValue"], "Polity Basics");
        assert_eq!(rest.fields["section"]["stringValue"], "mains-gs1");
        assert_eq!(rest.fields["studyLink"]["stringValue"], "");
        let first = &rest.fields["questions"]["arrayValue"]["values"][0];
        assert_eq!(first["mapValue"]["fields"]["year"]["stringValue"], "2023");

        let body = serde_json::to_value(&rest).expect("should serialize");
        assert!(body.get("name").is_none());
        assert!(body["fields"].get("id").is_none());
    }

    #[test]
    fn test_decode_reads_id_from_name_and_fields() {
        let rest = rest_doc(json!({
            "name": "projects/p/databases/(default)/documents/artifacts/bpsc-vault-v3/public/data/topics/abc123",
            "fields": {
                "title": { "stringValue": "Geography" },
                "section": { "stringValue": "optional" },
                "questions": { "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "q": { "stringValue": "Monsoon origin?" },
                        "year": { "integerValue": "2019" }
                    } } }
                ] } }
            },
            "createTime": "2024-01-01T00:00:00Z"
        }));

        let topic = decode_document(rest).expect("should decode");
        assert_eq!(topic.id.as_str(), "abc123");
        assert_eq!(topic.doc.section, Section::Optional);
        assert_eq!(topic.doc.questions.len(), 1);
        assert_eq!(topic.doc.questions[0].year, "2019");
        assert_eq!(topic.doc.questions[0].solution, "");
        assert_eq!(topic.doc.trend, "");
    }

    #[test]
    fn test_decode_treats_missing_questions_and_nulls_as_empty() {
        let rest = rest_doc(json!({
            "name": "x/topics/t1",
            "fields": {
                "title": { "stringValue": "Essay prompts" },
                "section": { "stringValue": "mains-essay" },
                "trend": { "nullValue": null },
                "questions": { "arrayValue": {} }
            }
        }));

        let topic = decode_document(rest).expect("should decode");
        assert!(topic.doc.questions.is_empty());
        assert_eq!(topic.doc.trend, "");
    }

    #[test]
    fn test_decode_rejects_unknown_section() {
        let rest = rest_doc(json!({
            "name": "x/topics/t2",
            "fields": { "section": { "stringValue": "mains-gs9" } }
        }));
        let err = decode_document(rest).expect_err("unknown section");
        assert_eq!(err.kind, super::super::ErrorKind::Parse);
        assert!(err.message.contains("t2"));
    }

    #[test]
    fn test_decode_rejects_missing_section() {
        let rest = rest_doc(json!({
            "name": "x/topics/t3",
            "fields": { "title": { "stringValue": "Untagged" } }
        }));
        let err = decode_document(rest).expect_err("missing section");
        assert_eq!(err.kind, super::super::ErrorKind::Parse);
        assert!(err.message.contains("t3"));
    }

    #[test]
    fn test_decode_requires_a_name() {
        let rest = rest_doc(json!({ "fields": {} }));
        assert!(decode_document(rest).is_err());
    }

    #[test]
    fn test_list_response_tolerates_empty_collection() {
        let parsed: ListDocumentsResponse =
            serde_json::from_value(json!({})).expect("empty list parses");
        assert!(parsed.documents.is_empty());
        assert!(parsed.next_page_token.is_none());
    }
}
