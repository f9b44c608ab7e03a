use super::{find, parse, top_kinds};
use crate::nodes::{HeaderData, SourceLine};
use crate::*;

fn header(document: &Document, id: NodeId) -> HeaderData {
    match document.arena.kind(id) {
        NodeKind::Header(data) => data.clone(),
        other => panic!("expected header, got {:?}", other),
    }
}

fn block(document: &Document, id: NodeId) -> crate::nodes::BlockData {
    match document.arena.kind(id) {
        NodeKind::Block(data) => data.clone(),
        other => panic!("expected block, got {:?}", other),
    }
}

#[test]
fn test_paragraph_lines_are_joined() {
    let doc = parse("first line\n  second line\n\nnext paragraph").unwrap();
    assert_eq!(top_kinds(&doc), vec!["paragraph", "paragraph"]);
    assert_eq!(
        doc.arena.plain_text(doc.content()[0]),
        "first line second line"
    );
}

#[test]
fn test_horizontal_rule() {
    let doc = parse("above\n\n---\n\nbelow").unwrap();
    assert_eq!(
        top_kinds(&doc),
        vec!["paragraph", "horizontal_rule", "paragraph"]
    );
}

#[test]
fn test_list_nesting() {
    let doc = parse("# Item 1\n## Sub 1.1\n## Sub 1.2\n# Item 2").unwrap();
    assert_eq!(top_kinds(&doc), vec!["list"]);

    let list = doc.content()[0];
    assert!(matches!(
        doc.arena.kind(list),
        NodeKind::List {
            ordered: true,
            main: true,
            ..
        }
    ));
    let items = doc.arena.content(list).to_vec();
    assert_eq!(items.len(), 2);

    let first = doc.arena.content(items[0]).to_vec();
    assert_eq!(first.len(), 2);
    let nested = first[1];
    assert!(matches!(
        doc.arena.kind(nested),
        NodeKind::List {
            ordered: true,
            main: false,
            ..
        }
    ));
    assert_eq!(doc.arena.content(nested).len(), 2);
    assert_eq!(doc.arena.plain_text(doc.arena.content(nested)[1]), "Sub 1.2");

    let second = doc.arena.content(items[1]).to_vec();
    assert_eq!(second.len(), 1);
    assert_eq!(doc.arena.plain_text(items[1]), "Item 2");
}

#[test]
fn test_list_shorter_marker_in_main_list() {
    let err = parse("## deep\n# shallow").unwrap_err();
    assert!(err.is_parser());
}

#[test]
fn test_list_start_numbering() {
    let doc = parse("* a\n\n# one\n# two\n\n# three\n\n[start=10]\n# ten").unwrap();
    let starts: Vec<(bool, usize)> = doc
        .content()
        .iter()
        .map(|id| match doc.arena.kind(*id) {
            NodeKind::List { ordered, start, .. } => (*ordered, *start),
            other => panic!("expected list, got {:?}", other),
        })
        .collect();
    assert_eq!(starts, vec![(false, 1), (true, 1), (true, 3), (true, 10)]);
}

#[test]
fn test_list_numbering_continues_through_blocks() {
    let doc = parse("# a\n# b\n\n----\n# c\n----\n\n# d").unwrap();
    let start = |id: NodeId| match doc.arena.kind(id) {
        NodeKind::List { start, .. } => *start,
        other => panic!("expected list, got {:?}", other),
    };
    let content = doc.content();
    let inner = doc.arena.content(content[1])[0];
    assert_eq!(
        vec![start(content[0]), start(inner), start(content[2])],
        vec![1, 3, 4]
    );
}

#[test]
fn test_discarded_block_does_not_advance_numbering() {
    let doc = parse(":flag:no\n# a\n\n@if flag==yes\n----\n# b\n----\n\n# c").unwrap();
    match doc.arena.kind(doc.content()[1]) {
        NodeKind::List { start, .. } => assert_eq!(*start, 2),
        other => panic!("expected list, got {:?}", other),
    }
}

#[test]
fn test_invalid_list_start() {
    assert!(parse("[start=x]\n# one").is_err());
}

#[test]
fn test_variable_interpolation_order() {
    let doc = parse(":a:1\n:b:{a}2\n\nvalue {b}").unwrap();
    assert_eq!(doc.environment.get_text("b").as_deref(), Some("12"));
    assert_eq!(doc.arena.plain_text(doc.content()[0]), "value 12");
}

#[test]
fn test_flag_variables() {
    let doc = parse(":+on:\n:-off:\n:site.name:Mau").unwrap();
    assert_eq!(doc.environment.get_text("on").as_deref(), Some("true"));
    assert_eq!(doc.environment.get_text("off").as_deref(), Some("false"));
    assert_eq!(doc.environment.get_text("site.name").as_deref(), Some("Mau"));
    assert!(doc.content().is_empty());
}

#[test]
fn test_undefined_variable() {
    let err = parse("Hello {nobody}").unwrap_err();
    assert!(err.is_parser());
    assert!(err.message().contains("nobody"));
}

#[test]
fn test_escaped_variable() {
    let doc = parse(":name:x\n\\{name} and {name}").unwrap();
    assert_eq!(doc.arena.plain_text(doc.content()[0]), "{name} and x");
}

#[test]
fn test_headers() {
    let doc = parse("= Title\n==! Hidden\n[alias=intro, id=custom]\n== Intro *bold*").unwrap();
    let headers: Vec<HeaderData> = doc.content().iter().map(|id| header(&doc, *id)).collect();

    assert_eq!(headers[0].level, 1);
    assert!(headers[0].in_toc);
    assert_eq!(headers[0].internal_id.as_deref(), Some("title"));

    assert_eq!(headers[1].level, 2);
    assert!(!headers[1].in_toc);
    assert_eq!(headers[1].internal_id.as_deref(), Some("hidden"));

    assert_eq!(headers[2].alias.as_deref(), Some("intro"));
    assert_eq!(headers[2].internal_id.as_deref(), Some("custom"));
    let content = doc.arena.content(doc.content()[2]).to_vec();
    assert_eq!(doc.arena.kind(content[1]).name(), "style");

    assert_eq!(doc.arena.content(doc.toc_flat).len(), 2);
}

#[test]
fn test_label_attaches_to_next_node() {
    let doc = parse(". A *caption*\nThe paragraph").unwrap();
    let node = doc.arena.get(doc.content()[0]);
    let title = node.label("title").to_vec();
    assert_eq!(title.len(), 2);
    assert_eq!(doc.arena.plain_text(title[0]), "A ");
    assert_eq!(doc.arena.get(title[0]).parent, Some(doc.content()[0]));
}

#[test]
fn test_label_role() {
    let doc = parse(".source From the docs\n----\nquote\n----").unwrap();
    let node = doc.arena.get(doc.content()[0]);
    assert!(node.label("title").is_empty());
    assert_eq!(node.label("source").len(), 1);
}

#[test]
fn test_later_label_replaces_earlier() {
    let doc = parse(". First\n. Second\ntext").unwrap();
    let title = doc.arena.get(doc.content()[0]).label("title").to_vec();
    assert_eq!(doc.arena.plain_text(title[0]), "Second");
}

#[test]
fn test_control_discards_node() {
    let doc = parse(
        ":show:yes\n@if show==yes\nVisible\n\n@if show!=yes\nHidden\n\nAlways",
    )
    .unwrap();
    assert_eq!(top_kinds(&doc), vec!["paragraph", "paragraph"]);
    assert_eq!(doc.arena.plain_text(doc.content()[0]), "Visible");
    assert_eq!(doc.arena.plain_text(doc.content()[1]), "Always");
}

#[test]
fn test_discarded_node_registers_nothing() {
    let doc = parse(":flag:no\n@if flag==yes\nSee [footnote](gone)").unwrap();
    assert!(doc.content().is_empty());
    assert!(parse("See [footnote](gone)").is_err());
}

#[test]
fn test_control_consumes_metadata() {
    let doc = parse(":flag:no\n[x]\n. Title\n@if flag==yes\nfirst\n\nsecond").unwrap();
    assert_eq!(top_kinds(&doc), vec!["paragraph"]);
    let node = doc.arena.get(doc.content()[0]);
    assert!(node.info.arguments.is_empty());
    assert!(node.label("title").is_empty());
}

#[test]
fn test_control_errors() {
    assert!(parse("@if nope==1\ntext").unwrap_err().is_parser());
    assert!(parse("@unless a==1\ntext").unwrap_err().is_parser());
}

#[test]
fn test_arguments_attach_to_next_node() {
    let doc = parse("[*note, #draft, important, level=2]\nSome text").unwrap();
    let info = &doc.arena.get(doc.content()[0]).info;
    assert_eq!(info.subtype(), Some("note"));
    assert_eq!(info.tags(), &["draft".to_string()]);
    assert_eq!(info.unnamed_args(), &["important".to_string()]);
    assert_eq!(info.arguments.get("level"), Some("2"));
}

#[test]
fn test_multiple_subtypes_in_document() {
    let err = parse("[*one, *two]\ntext").unwrap_err();
    assert!(err.is_parser());
}

#[test]
fn test_commands() {
    let doc = parse("::toc\n::custom:a, b=1").unwrap();
    assert_eq!(top_kinds(&doc), vec!["toc_command", "command"]);
    let info = &doc.arena.get(doc.content()[1]).info;
    assert_eq!(info.unnamed_args(), &["a".to_string()]);
    assert_eq!(info.arguments.get("b"), Some("1"));
}

#[test]
fn test_command_line_arguments_replace_buffered() {
    let doc = parse("[buffered]\n::custom:inline\n[only]\n::other").unwrap();
    let first = &doc.arena.get(doc.content()[0]).info;
    assert_eq!(first.unnamed_args(), &["inline".to_string()]);
    let second = &doc.arena.get(doc.content()[1]).info;
    assert_eq!(second.unnamed_args(), &["only".to_string()]);
}

#[test]
fn test_default_block() {
    let doc = parse("[classes=\"a, b\"]\n----\n= Inner\n\ntext\n----").unwrap();
    assert_eq!(top_kinds(&doc), vec!["block"]);
    let id = doc.content()[0];
    let data = block(&doc, id);
    assert_eq!(data.engine, "default");
    assert_eq!(data.classes, vec!["a", "b"]);

    let inner: Vec<&str> = doc
        .arena
        .content(id)
        .iter()
        .map(|n| doc.arena.kind(*n).name())
        .collect();
    assert_eq!(inner, vec!["header", "paragraph"]);
    assert_eq!(doc.arena.content(doc.toc_flat).len(), 1);

    let inner_header = doc.arena.content(id)[0];
    assert_eq!(doc.arena.get(inner_header).context().start.line, 2);
}

#[test]
fn test_raw_block() {
    let doc = parse("[engine=raw]\n----\n* not a list\n\n  {not_a_variable}\n----").unwrap();
    let id = doc.content()[0];
    let values: Vec<String> = doc
        .arena
        .content(id)
        .iter()
        .map(|n| match doc.arena.kind(*n) {
            NodeKind::RawLine { value } => value.clone(),
            other => panic!("expected raw line, got {:?}", other),
        })
        .collect();
    assert_eq!(values, vec!["* not a list", "", "  {not_a_variable}"]);
}

#[test]
fn test_source_block() {
    let doc = parse("[python, engine=source]\n----\ndef f(): :1:\n  return 1 :@:\n----").unwrap();
    let id = doc.content()[0];
    assert_eq!(block(&doc, id).language.as_deref(), Some("python"));

    let lines: Vec<SourceLine> = doc
        .arena
        .content(id)
        .iter()
        .map(|n| match doc.arena.kind(*n) {
            NodeKind::SourceLine(line) => line.clone(),
            other => panic!("expected source line, got {:?}", other),
        })
        .collect();
    assert_eq!(lines[0].number, 1);
    assert_eq!(lines[0].text, "def f():");
    assert_eq!(lines[0].marker.as_deref(), Some("1"));
    assert_eq!(lines[1].text, "  return 1");
    assert_eq!(lines[1].highlight.as_deref(), Some("default"));
}

#[test]
fn test_source_block_default_language_and_delimiter_override() {
    let doc = parse("[engine=source, marker_delimiter=|]\n----\ncall() |a|\n----").unwrap();
    let id = doc.content()[0];
    assert_eq!(block(&doc, id).language.as_deref(), Some("text"));
    match doc.arena.kind(doc.arena.content(id)[0]) {
        NodeKind::SourceLine(line) => assert_eq!(line.marker.as_deref(), Some("a")),
        other => panic!("expected source line, got {:?}", other),
    }
}

#[test]
fn test_unknown_engine() {
    let err = parse("[engine=nope]\n----\nx\n----").unwrap_err();
    assert!(err.message().contains("nope"));
}

#[test]
fn test_mau_block_uses_fresh_environment() {
    assert!(parse(":v:1\n[engine=mau]\n----\n{v}\n----").is_err());

    let doc = parse("[engine=mau]\n----\n:v:2\n{v}\n----\n\nafter").unwrap();
    assert!(doc.environment.get("v").is_none());
    assert_eq!(top_kinds(&doc), vec!["block", "paragraph"]);
}

#[test]
fn test_mau_block_resolves_its_own_references() {
    let text = "[engine=mau]\n----\nSee [footnote](n)\n\n[n, engine=footnote]\n++++\nnote\n++++\n----";
    let doc = parse(text).unwrap();
    let mention = find(&doc, "macro.footnote")[0];
    match doc.arena.kind(mention) {
        NodeKind::FootnoteRef { ids, .. } => assert_eq!(ids.public_id.as_deref(), Some("1")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_isolated_block_keeps_headers_out_of_toc() {
    let doc = parse("[isolate=true]\n----\n= Inside\n----\n= Outside").unwrap();
    assert_eq!(doc.arena.content(doc.toc_flat).len(), 1);
    let inside = doc.arena.content(doc.content()[0])[0];
    assert_eq!(header(&doc, inside).internal_id.as_deref(), Some("inside"));
}

#[test]
fn test_isolated_header_ids_stay_unique() {
    let doc = parse("= Intro\n\n[isolate=true]\n----\n= Intro\n----").unwrap();
    let mut ids: Vec<String> = find(&doc, "header")
        .into_iter()
        .filter_map(|id| header(&doc, id).internal_id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["intro", "intro-2"]);
}

#[test]
fn test_block_shares_environment() {
    let doc = parse("----\n:inner:yes\n----\n{inner}").unwrap();
    assert_eq!(doc.arena.plain_text(doc.content()[1]), "yes");
}

#[test]
fn test_unclosed_block_is_lexer_error() {
    assert!(parse("----\nopen").unwrap_err().is_lexer());
}

#[test]
fn test_include_image() {
    let doc = parse("<< image:pic.png, alt text, width=300").unwrap();
    match doc.arena.kind(doc.content()[0]) {
        NodeKind::IncludeImage(image) => {
            assert_eq!(image.uri, "pic.png");
            assert_eq!(image.alt_text.as_deref(), Some("alt text"));
            assert_eq!(image.width.as_deref(), Some("300"));
            assert_eq!(image.height, None);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(parse("<< image").is_err());
}

#[test]
fn test_generic_include() {
    let doc = parse("[uri=b.mp4]\n<< video:a.mp4").unwrap();
    assert_eq!(
        doc.arena.kind(doc.content()[0]),
        &NodeKind::Include {
            include_type: "video".into(),
            uris: vec!["a.mp4".into()],
        }
    );

    let doc = parse("[a.mp4, b.mp4]\n<< video").unwrap();
    match doc.arena.kind(doc.content()[0]) {
        NodeKind::Include { uris, .. } => assert_eq!(uris.len(), 2),
        other => panic!("unexpected {:?}", other),
    }

    let err = parse("<< video").unwrap_err();
    assert!(err.message().contains("video"));
}

#[test]
fn test_comments_are_ignored() {
    let doc = parse("// note to self\ntext\n////\n= not a header\n////").unwrap();
    assert_eq!(top_kinds(&doc), vec!["paragraph"]);
}

#[test]
fn test_parent_links() {
    let doc = parse("A *b*").unwrap();
    let paragraph = doc.content()[0];
    assert_eq!(doc.arena.get(paragraph).parent, Some(doc.root));
    for child in doc.arena.descendants(paragraph) {
        let parent = doc.arena.get(child).parent.unwrap();
        assert!(doc.arena.content(parent).contains(&child));
    }
}
