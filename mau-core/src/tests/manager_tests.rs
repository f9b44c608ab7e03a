use super::{find, parse, top_kinds};
use crate::*;
use std::collections::BTreeMap;

fn footnote_public_id(document: &Document, id: NodeId) -> Option<String> {
    match document.arena.kind(id) {
        NodeKind::Footnote { ids, .. } | NodeKind::FootnoteRef { ids, .. } => ids.public_id.clone(),
        other => panic!("expected footnote, got {:?}", other),
    }
}

fn header_id(document: &Document, id: NodeId) -> Option<String> {
    match document.arena.kind(id) {
        NodeKind::Header(data) => data.internal_id.clone(),
        other => panic!("expected header, got {:?}", other),
    }
}

const FOOTNOTES: &str = "\
First [footnote](b) then [footnote](a) and [footnote](b) again.

[a, engine=footnote]
----
Body of a
----

[b, engine=footnote]
----
Body of b
----

[c, engine=footnote]
----
Never mentioned
----

::footnotes";

#[test]
fn test_footnotes_numbered_by_first_mention() {
    let doc = parse(FOOTNOTES).unwrap();
    assert_eq!(top_kinds(&doc), vec!["paragraph", "footnotes_command"]);

    let mentions = find(&doc, "macro.footnote");
    let numbers: Vec<Option<String>> = mentions
        .iter()
        .map(|id| footnote_public_id(&doc, *id))
        .collect();
    assert_eq!(
        numbers,
        vec![Some("1".into()), Some("2".into()), Some("1".into())]
    );

    let entries = match doc.arena.kind(doc.content()[1]) {
        NodeKind::FootnotesCommand { entries } => entries.clone(),
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(entries.len(), 3);
    let names: Vec<String> = entries
        .iter()
        .map(|id| match doc.arena.kind(*id) {
            NodeKind::Footnote { name, ids } => {
                assert_eq!(ids.private_id, Some(format!("footnote-{}", name)));
                name.clone()
            }
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(names, vec!["b", "a", "c"]);
    assert_eq!(doc.arena.plain_text(entries[0]), "Body of b");

    match doc.arena.kind(mentions[0]) {
        NodeKind::FootnoteRef { declaration, .. } => assert_eq!(*declaration, Some(entries[0])),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_footnote_bodies_stay_out_of_content() {
    let doc = parse("[n, engine=footnote]\n----\nbody\n----").unwrap();
    assert!(doc.content().is_empty());
}

#[test]
fn test_undefined_footnote() {
    let err = parse("See [footnote](missing)").unwrap_err();
    assert!(err.is_parser());
    assert!(err.message().contains("missing"));
}

#[test]
fn test_duplicate_footnote() {
    let text = "[n, engine=footnote]\n----\none\n----\n\n[n, engine=footnote]\n----\ntwo\n----";
    let err = parse(text).unwrap_err();
    assert!(err.message().contains("Duplicate footnote"));
    assert_eq!(err.context().start.line, 6);
}

#[test]
fn test_duplicate_footnote_across_sub_parse() {
    let text = "----\n[n, engine=footnote]\n++++\none\n++++\n----\n\n[n, engine=footnote]\n----\ntwo\n----";
    assert!(parse(text).is_err());
}

#[test]
fn test_footnote_mention_in_label_and_list() {
    let text = ". Caption [footnote](x)\n* item [footnote](y)\n\n[x, engine=footnote]\n----\nX\n----\n\n[y, engine=footnote]\n----\nY\n----";
    let doc = parse(text).unwrap();
    let list = doc.content()[0];
    let label = doc.arena.get(list).label("title").to_vec();
    let in_label = label
        .iter()
        .copied()
        .find(|id| doc.arena.kind(*id).name() == "macro.footnote")
        .unwrap();
    let in_list = find(&doc, "macro.footnote");
    assert_eq!(in_list.len(), 1);

    let mut numbers = vec![
        footnote_public_id(&doc, in_label).unwrap(),
        footnote_public_id(&doc, in_list[0]).unwrap(),
    ];
    numbers.sort();
    assert_eq!(numbers, vec!["1", "2"]);
}

#[test]
fn test_header_links() {
    let doc = parse("[alias=intro]\n= Introduction\n\nSee [header](intro).").unwrap();
    let link = find(&doc, "macro.header")[0];
    match doc.arena.kind(link) {
        NodeKind::HeaderLink { alias, target_id } => {
            assert_eq!(alias, "intro");
            assert_eq!(target_id.as_deref(), Some("introduction"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_header_link_before_header() {
    let doc = parse("See [header](later)\n\n[alias=later, id=the-end]\n= End").unwrap();
    match doc.arena.kind(find(&doc, "macro.header")[0]) {
        NodeKind::HeaderLink { target_id, .. } => assert_eq!(target_id.as_deref(), Some("the-end")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_header_link_errors() {
    let err = parse("See [header](nowhere)").unwrap_err();
    assert!(err.message().contains("nowhere"));

    let err = parse("[alias=x]\n= One\n[alias=x]\n= Two").unwrap_err();
    assert!(err.message().contains("Duplicate header alias"));
}

#[test]
fn test_header_ids_are_unique() {
    let doc = parse("= Intro\n= Intro\n= Intro").unwrap();
    let ids: Vec<Option<String>> = doc.content().iter().map(|id| header_id(&doc, *id)).collect();
    assert_eq!(
        ids,
        vec![
            Some("intro".into()),
            Some("intro-2".into()),
            Some("intro-3".into())
        ]
    );
}

#[test]
fn test_toc_trees() {
    let doc = parse("::toc\n= A\n== B\n=== C\n==! Skipped\n== D\n= E").unwrap();

    match doc.arena.kind(doc.content()[0]) {
        NodeKind::TocCommand { flat, nested } => {
            assert_eq!(*flat, Some(doc.toc_flat));
            assert_eq!(*nested, Some(doc.toc_nested));
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(doc.arena.content(doc.toc_flat).len(), 5);

    let entry_text = |entry: NodeId| match doc.arena.kind(entry) {
        NodeKind::TocEntry { header } => doc.arena.plain_text(*header),
        other => panic!("unexpected {:?}", other),
    };
    let top = doc.arena.content(doc.toc_nested).to_vec();
    let top_text: Vec<String> = top.iter().map(|e| entry_text(*e)).collect();
    assert_eq!(top_text, vec!["A", "E"]);

    let under_a = doc.arena.content(top[0]).to_vec();
    let under_a_text: Vec<String> = under_a.iter().map(|e| entry_text(*e)).collect();
    assert_eq!(under_a_text, vec!["B", "D"]);
    assert_eq!(doc.arena.content(under_a[0]).len(), 1);
    assert!(doc.arena.content(top[1]).is_empty());
}

#[test]
fn test_toc_includes_headers_from_blocks_in_order() {
    let doc = parse("= First\n----\n= Second\n----\n= Third").unwrap();
    let headers: Vec<String> = doc
        .arena
        .content(doc.toc_flat)
        .iter()
        .map(|entry| match doc.arena.kind(*entry) {
            NodeKind::TocEntry { header } => doc.arena.plain_text(*header),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(headers, vec!["First", "Second", "Third"]);
}

#[test]
fn test_discarded_header_is_not_in_toc() {
    let doc = parse(":+draft:\n@if draft==false\n= Hidden\n= Shown").unwrap();
    assert_eq!(doc.arena.content(doc.toc_flat).len(), 1);
    assert_eq!(header_id(&doc, doc.content()[0]).as_deref(), Some("shown"));
}

#[test]
fn test_block_groups() {
    let text = "\
[cols, left, engine=group]
----
Left side
----

[cols, right, engine=group]
----
Right side
----

::blockgroup:cols";
    let doc = parse(text).unwrap();
    assert_eq!(top_kinds(&doc), vec!["blockgroup_command"]);

    let blocks: BTreeMap<String, NodeId> = match doc.arena.kind(doc.content()[0]) {
        NodeKind::BlockGroupCommand { group, blocks } => {
            assert_eq!(group, "cols");
            blocks.clone()
        }
        other => panic!("unexpected {:?}", other),
    };
    let positions: Vec<&str> = blocks.keys().map(String::as_str).collect();
    assert_eq!(positions, vec!["left", "right"]);
    assert_eq!(doc.arena.plain_text(blocks["right"]), "Right side");
}

#[test]
fn test_block_group_errors() {
    let err = parse("::blockgroup:nothing").unwrap_err();
    assert!(err.message().contains("nothing"));

    let text = "[g, p, engine=group]\n----\na\n----\n\n[g, p, engine=group]\n----\nb\n----";
    let err = parse(text).unwrap_err();
    assert!(err.message().contains("Duplicate position"));

    assert!(parse("::blockgroup").is_err());
}
