//! End-to-end tests for the four relation modes.
//!
//! Each test exercises: bytes -> Document -> primitive binding -> field
//! dispatch, through the public `unmarshal` entry point.

use jsonsideload::{sideload_model, unmarshal, unmarshal_into, Error};
use pretty_assertions::assert_eq;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Author {
    id: u64,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Comment {
    id: u64,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Tag {
    id: u64,
    label: String,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
struct Post {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(skip)]
    author: Option<Author>,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(skip)]
    tags: Vec<Tag>,
}

sideload_model!(Author);
sideload_model!(Comment);
sideload_model!(Tag);
sideload_model!(Post {
    author: one => "hasone,authors,author_id",
    comments: many => "includes,comments",
    tags: many => "hasmany,tags,tag_ids",
});

// ============================================================================
// 1. hasone resolves a sideloaded object by id
// ============================================================================

#[test]
fn test_hasone_match() {
    let post: Post = unmarshal(br#"{"id":1,"author_id":2,"authors":[{"id":2,"name":"A"}]}"#).unwrap();

    assert_eq!(post.id, 1);
    assert_eq!(post.author, Some(Author { id: 2, name: "A".into() }));
}

// ============================================================================
// 2. hasone with a dangling id leaves the field empty
// ============================================================================

#[test]
fn test_hasone_dangling_id() {
    let post: Post = unmarshal(br#"{"id":1,"author_id":99,"authors":[{"id":2,"name":"A"}]}"#).unwrap();
    assert_eq!(post.author, None);
}

#[test]
fn test_hasone_missing_or_null_id() {
    let post: Post = unmarshal(br#"{"id":1,"authors":[{"id":2,"name":"A"}]}"#).unwrap();
    assert_eq!(post.author, None);

    let post: Post = unmarshal(br#"{"id":1,"author_id":null,"authors":[{"id":2,"name":"A"}]}"#).unwrap();
    assert_eq!(post.author, None);
}

#[test]
fn test_hasone_relation_not_an_array() {
    let post: Post = unmarshal(br#"{"id":1,"author_id":2,"authors":{"id":2,"name":"A"}}"#).unwrap();
    assert_eq!(post.author, None);
}

// ============================================================================
// 3. includes resolves nested arrays in source order
// ============================================================================

#[test]
fn test_includes_nested_array() {
    let post: Post = unmarshal(br#"{"id":1,"comments":[{"id":10,"text":"hi"}]}"#).unwrap();
    assert_eq!(post.comments, vec![Comment { id: 10, text: "hi".into() }]);
}

#[test]
fn test_includes_keeps_order_and_duplicates() {
    let post: Post = unmarshal(
        br#"{"id":1,"comments":[
            {"id":12,"text":"c"},
            {"id":10,"text":"a"},
            {"id":12,"text":"c"}
        ]}"#,
    )
    .unwrap();
    let ids: Vec<u64> = post.comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![12, 10, 12]);
}

#[test]
fn test_includes_missing_is_empty() {
    let post: Post = unmarshal(br#"{"id":1}"#).unwrap();
    assert!(post.comments.is_empty());
    assert!(post.tags.is_empty());
}

// ============================================================================
// 4. hasmany follows id order and drops unmatched ids
// ============================================================================

#[test]
fn test_hasmany_drops_unmatched() {
    let post: Post = unmarshal(
        br#"{"id":1,"tag_ids":[5,6],"tags":[{"id":5,"label":"x"},{"id":7,"label":"z"}]}"#,
    )
    .unwrap();
    assert_eq!(post.tags, vec![Tag { id: 5, label: "x".into() }]);
}

#[test]
fn test_hasmany_follows_id_order() {
    let post: Post = unmarshal(
        br#"{"id":1,"tag_ids":[7,5,7],"tags":[{"id":5,"label":"x"},{"id":7,"label":"z"}]}"#,
    )
    .unwrap();
    let labels: Vec<&str> = post.tags.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["z", "x", "z"]);
}

#[test]
fn test_hasmany_ids_not_an_array() {
    let post: Post = unmarshal(br#"{"id":1,"tag_ids":5,"tags":[{"id":5,"label":"x"}]}"#).unwrap();
    assert!(post.tags.is_empty());
}

// ============================================================================
// 5. Malformed payloads
// ============================================================================

#[test]
fn test_truncated_json() {
    let err = unmarshal::<Post>(br#"{"id":"#).unwrap_err();
    assert!(matches!(err, Error::MalformedJson(_)));
    assert!(err.to_string().starts_with("Malformed JSON provided"));
}

#[test]
fn test_non_object_root() {
    let payloads: [&[u8]; 4] = [b"[]", b"null", b"\"post\"", b"3"];
    for payload in payloads {
        let err = unmarshal::<Post>(payload).unwrap_err();
        assert!(err.is_malformed_json(), "payload {:?}", String::from_utf8_lossy(payload));
    }
    // Independent of the target model.
    assert!(unmarshal::<Tag>(b"{").unwrap_err().is_malformed_json());
}

// ============================================================================
// 6. Everything at once
// ============================================================================

#[test]
fn test_full_document() {
    let post: Post = unmarshal(
        br#"{
            "id": 1,
            "title": "Sideloading",
            "author_id": 2,
            "tag_ids": [5, 7],
            "comments": [{"id": 10, "text": "hi"}, {"id": 11, "text": "yo"}],
            "authors": [{"id": 1, "name": "Z"}, {"id": 2, "name": "A"}],
            "tags": [{"id": 5, "label": "x"}, {"id": 7, "label": "z"}]
        }"#,
    )
    .unwrap();

    assert_eq!(
        post,
        Post {
            id: 1,
            title: "Sideloading".into(),
            author: Some(Author { id: 2, name: "A".into() }),
            comments: vec![
                Comment { id: 10, text: "hi".into() },
                Comment { id: 11, text: "yo".into() },
            ],
            tags: vec![
                Tag { id: 5, label: "x".into() },
                Tag { id: 7, label: "z".into() },
            ],
        }
    );
}

#[test]
fn test_unmarshal_into_existing_model() {
    let mut post = Post {
        title: "stale".into(),
        author: Some(Author { id: 9, name: "old".into() }),
        ..Post::default()
    };
    unmarshal_into(br#"{"id":3,"author_id":2,"authors":[{"id":2,"name":"A"}]}"#, &mut post).unwrap();

    assert_eq!(post.id, 3);
    assert_eq!(post.title, "");
    assert_eq!(post.author, Some(Author { id: 2, name: "A".into() }));
}
