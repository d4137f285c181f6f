use answer_core::{Source, SourceTag, StreamChunk};

fn decode(raw: &str) -> StreamChunk {
    serde_json::from_str(raw).expect("valid chunk")
}

#[test]
fn answer_chunk_ignores_extra_fields() {
    let chunk = decode(r#"{"type":"answer","content":"سلام","done":false}"#);
    assert_eq!(
        chunk,
        StreamChunk::Answer {
            content: "سلام".to_string()
        }
    );
    assert!(!chunk.is_terminal());
}

#[test]
fn done_chunk_defaults_missing_lists() {
    let chunk = decode(r#"{"type":"done","found_in_docs":true}"#);
    assert_eq!(
        chunk,
        StreamChunk::Done {
            sources: vec![],
            keywords: vec![],
            found_in_docs: true,
        }
    );
    assert!(chunk.is_terminal());
}

#[test]
fn cancelled_chunk_without_content() {
    let chunk = decode(r#"{"type":"cancelled"}"#);
    assert_eq!(chunk, StreamChunk::Cancelled { content: None });
    assert!(chunk.is_terminal());
}

#[test]
fn unknown_type_is_rejected() {
    let result = serde_json::from_str::<StreamChunk>(r#"{"type":"heartbeat"}"#);
    assert!(result.is_err());
}

#[test]
fn source_tag_prefers_label_and_trims_section() {
    let tag = SourceTag::from_source(&Source {
        label: Some("مسئله ۱۲۳".to_string()),
        page: 123,
        section: Some("نماز > نماز مسافر".to_string()),
    });
    assert_eq!(tag.text, "مسئله ۱۲۳ - نماز");

    let tag = SourceTag::from_source(&Source {
        label: None,
        page: 7,
        section: None,
    });
    assert_eq!(tag.text, "مسئله 7");
}

#[test]
fn done_chunk_with_sources() {
    let chunk = decode(
        r#"{"type":"done","sources":[{"label":"a","page":3,"section":"x > y"},{"page":4}],"keywords":["k"],"found_in_docs":true}"#,
    );
    let StreamChunk::Done { sources, .. } = chunk else {
        panic!("expected done chunk");
    };
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[1].label, None);
    assert_eq!(sources[1].page, 4);
}
