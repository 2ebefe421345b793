// Field mapping of a representative post record, exercised end-to-end
// through the pure layers: group ordering, core field parsing, section
// classification, and entry field construction.

use std::collections::HashMap;

use serde_json::{json, Value};

use blog_migrate::entries::{BlogPosting, Embed, EntryModel};
use blog_migrate::legacy::models::{
    classify_body, classify_group, publish_enabled, BodyKind, ContentRecord, CoreFields,
    FieldGroup, Section,
};

fn group(order: Option<i64>, data: Value) -> FieldGroup {
    FieldGroup {
        order,
        data: data.as_object().cloned().unwrap_or_default(),
    }
}

fn sample_record() -> ContentRecord {
    ContentRecord {
        id: 101,
        title: Some("Fallback title".to_string()),
        published_at: None,
        fields: vec![
            group(
                Some(1),
                json!({"body": ["<iframe src=\"https://example.org/widget\"></iframe>"]}),
            ),
            group(
                None,
                json!({
                    "title": ["Hello"],
                    "slug": ["hello"],
                    "authors": [42],
                }),
            ),
        ],
        taxonomy: HashMap::new(),
    }
}

#[test]
fn test_core_group_sorts_first_and_parses() {
    let record = sample_record();
    let groups = record.sorted_groups();

    let core = CoreFields::from_group(&groups[0]);
    assert_eq!(core.title.as_deref(), Some("Hello"));
    assert_eq!(core.slug.as_deref(), Some("hello"));
    assert_eq!(core.authors, vec![42]);
    assert!(core.body.is_none());
}

#[test]
fn test_second_group_classifies_as_embed_body() {
    let record = sample_record();
    let groups = record.sorted_groups();

    assert!(publish_enabled(&groups[1]));
    match classify_group(&groups[1]) {
        Section::Body(html) => {
            assert_eq!(classify_body(&html), BodyKind::DirectEmbed);

            let embed = Embed {
                name: Some("Embed for Hello".to_string()),
                embed: Some(html),
            };
            let fields = embed.fields();
            assert_eq!(fields["name"], json!({"en-GB": "Embed for Hello"}));
            assert_eq!(
                fields["embed"],
                json!({"en-GB": "<iframe src=\"https://example.org/widget\"></iframe>"})
            );
        }
        other => panic!("expected body section, got {:?}", other),
    }
}

#[test]
fn test_post_entry_fields_with_unresolved_author() {
    let record = sample_record();
    let groups = record.sorted_groups();
    let core = CoreFields::from_group(&groups[0]);

    // Author 42 did not resolve: the link list stays empty, which still
    // serializes as an empty sequence rather than an absent field.
    let entry = BlogPosting {
        name: core.title.clone().or_else(|| record.title.clone()),
        identifier: core.slug.clone(),
        has_part: vec!["embed-entry-id".to_string()],
        ..Default::default()
    };
    let fields = entry.fields();

    assert_eq!(fields["name"], json!({"en-GB": "Hello"}));
    assert_eq!(fields["identifier"], json!({"en-GB": "hello"}));
    assert_eq!(fields["author"], json!({"en-GB": []}));
    assert_eq!(
        fields["hasPart"],
        json!({"en-GB": [{"sys": {"type": "Link", "linkType": "Entry", "id": "embed-entry-id"}}]})
    );
}

#[test]
fn test_unknown_group_shape_is_skipped_not_fatal() {
    let mystery = group(Some(2), json!({"carousel": ["?"]}));
    match classify_group(&mystery) {
        Section::Unknown(keys) => assert_eq!(keys, vec!["carousel".to_string()]),
        other => panic!("expected unknown section, got {:?}", other),
    }
}

#[test]
fn test_lite_youtube_rewrite_target() {
    let body = r#"<lite-youtube videoid="dQw4w9WgXcQ" playlabel="Play"></lite-youtube>"#;
    match classify_body(body) {
        BodyKind::LiteYouTube(video_id) => {
            let embed = Embed {
                name: Some("YouTube embed for Hello".to_string()),
                embed: Some(format!(
                    r#"<iframe src="https://www.youtube.com/embed/{}" title="YouTube"></iframe>"#,
                    video_id
                )),
            };
            let fields = embed.fields();
            assert_eq!(
                fields["embed"]["en-GB"],
                json!(r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" title="YouTube"></iframe>"#)
            );
        }
        other => panic!("expected lite-youtube body, got {:?}", other),
    }
}

#[test]
fn test_draft_sections_detected_via_enabled_flag() {
    let disabled = group(Some(3), json!({"body": ["<p>draft</p>"], "enabled": ["disabled"]}));
    assert!(!publish_enabled(&disabled));
    assert!(matches!(classify_group(&disabled), Section::Body(_)));
}
