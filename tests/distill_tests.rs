use form_autopilot::dom::distill::{distill, IdMint};

use crate::common::tree::{
    elem, form_page, input, label_for, node, text, with_attr, with_children, with_value,
};

mod common;

#[test]
fn interactive_fields_are_annotated_and_pruned_tags_dropped() {
    let mut page = form_page(vec![
        label_for(10, "first", "First Name"),
        node(with_attr(input(11, "text"), "id", "first")),
        node(with_children(elem("script", 12), vec![text("var x = 1;")])),
    ]);

    let mut ids = IdMint::new();
    let (snapshot, annotations) = distill(&mut page, false, &mut ids);

    assert_eq!(annotations.len(), 1, "one interactive field, one annotation");
    assert_eq!(annotations[0].field_id, "af-0");
    assert_eq!(annotations[0].label.as_deref(), Some("First Name"));

    assert!(snapshot.serialized_tree.contains("data-autofill-id=\"af-0\""));
    assert!(snapshot.serialized_tree.contains("data-autofill-label=\"First Name\""));
    assert!(
        !snapshot.serialized_tree.contains("script"),
        "script subtree must not survive"
    );

    assert_eq!(snapshot.fields.len(), 1);
    assert_eq!(snapshot.fields[0].id, "af-0");
    assert_eq!(snapshot.fields[0].field_type, "text");
    assert_eq!(snapshot.fields[0].label, "First Name");
    assert_eq!(snapshot.fields[0].option_status, "Ready");
}

#[test]
fn identifiers_are_stable_across_repeated_distillation() {
    let mut page = form_page(vec![node(with_attr(
        input(11, "text"),
        "aria-label",
        "Email",
    ))]);

    let mut ids = IdMint::new();
    let (first, annotations) = distill(&mut page, false, &mut ids);
    assert_eq!(annotations.len(), 1);
    assert_eq!(first.fields[0].id, "af-0");

    // The tree now carries the written-back attributes, like a re-extraction
    // of an annotated live page would.
    let (second, annotations) = distill(&mut page, false, &mut ids);
    assert!(
        annotations.is_empty(),
        "an already-annotated field must not be re-minted or re-labeled"
    );
    assert_eq!(second.fields[0].id, "af-0");
}

#[test]
fn invisible_and_hidden_inputs_are_excluded() {
    let mut styled_out = input(11, "text");
    styled_out.hidden_style = true;

    let mut page = form_page(vec![
        node(styled_out),
        node(input(12, "hidden")),
        node(with_attr(input(13, "text"), "aria-label", "Visible One")),
    ]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields.len(), 1, "only the visible text input counts");
    assert_eq!(snapshot.fields[0].label, "Visible One");
}

#[test]
fn weak_label_is_rescued_by_fieldset_legend() {
    let fieldset = with_children(
        elem("fieldset", 20),
        vec![
            node(with_children(elem("legend", 21), vec![text("Work Authorization")])),
            node(with_attr(input(22, "text"), "aria-label", "Select...")),
        ],
    );
    let mut page = form_page(vec![node(fieldset)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields[0].label, "Work Authorization > Select...");
}

#[test]
fn weak_label_is_rescued_by_aria_group_heading() {
    let group = with_children(
        with_attr(
            with_attr(elem("div", 20), "role", "group"),
            "aria-label",
            "Demographics",
        ),
        vec![node(with_attr(input(21, "text"), "aria-label", "select"))],
    );
    let mut page = form_page(vec![node(group)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields[0].label, "Demographics > select");
}

#[test]
fn folding_collapses_filled_fields_and_blanks_their_content() {
    let mut page = form_page(vec![
        node(with_value(
            with_attr(input(11, "text"), "aria-label", "Email"),
            "jane@example.com",
        )),
        node(with_attr(input(12, "text"), "aria-label", "Phone")),
    ]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, true, &mut ids);

    assert!(
        snapshot.serialized_tree.contains("<filled-field"),
        "filled field must collapse to the marker"
    );
    assert!(snapshot.serialized_tree.contains("[FILLED]"));
    assert!(
        !snapshot.serialized_tree.contains("jane@example.com"),
        "entered values must not reach the snapshot when folding"
    );

    let email = &snapshot.fields[0];
    assert_eq!(email.label, "Email");
    assert_eq!(email.content, "", "folded descriptor content must be blank");

    let phone = &snapshot.fields[1];
    assert_eq!(phone.label, "Phone");
    assert!(
        snapshot.serialized_tree.contains("data-autofill-id=\"af-1\""),
        "unfilled sibling stays a real element"
    );
}

#[test]
fn only_whitelisted_attributes_survive() {
    let field = with_attr(
        with_attr(input(11, "email"), "class", "fancy-input-widget"),
        "placeholder",
        "you@example.com",
    );
    let mut page = form_page(vec![node(field)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert!(snapshot.serialized_tree.contains("placeholder=\"you@example.com\""));
    assert!(
        !snapshot.serialized_tree.contains("fancy-input-widget"),
        "class attribute must be stripped"
    );
}

#[test]
fn long_prose_is_truncated_with_marker() {
    let prose = "Equal opportunity statement. ".repeat(10);
    let mut page = form_page(vec![node(with_children(
        elem("p", 20),
        vec![text(&prose)],
    ))]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert!(snapshot.serialized_tree.contains("...[omitted]"));
    assert!(
        !snapshot.serialized_tree.contains(prose.trim()),
        "full prose must not survive"
    );
}

#[test]
fn combobox_option_status_reflects_listbox_population() {
    let listbox = with_children(
        with_attr(elem("div", 30), "id", "menu"),
        vec![
            node(elem("div", 31)),
            node(elem("div", 32)),
            node(elem("div", 33)),
        ],
    );
    let populated = with_attr(
        with_attr(
            with_attr(input(20, "text"), "role", "combobox"),
            "aria-controls",
            "menu",
        ),
        "aria-label",
        "Country",
    );
    let lazy = with_attr(
        with_attr(
            with_attr(input(21, "text"), "role", "combobox"),
            "aria-controls",
            "absent",
        ),
        "aria-label",
        "City",
    );

    let mut page = form_page(vec![node(populated), node(lazy), node(listbox)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields[0].field_type, "combobox");
    assert_eq!(snapshot.fields[0].option_status, "[Visible: 3]");
    assert_eq!(snapshot.fields[1].option_status, "[Runtime Fetch Required]");
}

#[test]
fn file_inputs_get_the_upload_field_type() {
    let mut page = form_page(vec![node(with_attr(
        input(11, "file"),
        "aria-label",
        "Resume",
    ))]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields[0].field_type, "file_upload");
}

#[test]
fn buttons_fall_back_to_their_own_text() {
    let button = with_children(elem("button", 11), vec![text("Submit Application")]);
    let mut page = form_page(vec![node(button)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert_eq!(snapshot.fields[0].label, "Submit Application");
    assert_eq!(snapshot.fields[0].content, "Submit Application");
    assert_eq!(snapshot.fields[0].field_type, "button");
}

#[test]
fn shadow_subtrees_are_wrapped_and_their_fields_collected() {
    let mut host = elem("div", 30);
    host.shadow_children = vec![node(with_attr(
        input(31, "text"),
        "aria-label",
        "Shadow Field",
    ))];
    let mut page = form_page(vec![node(host)]);

    let mut ids = IdMint::new();
    let (snapshot, _) = distill(&mut page, false, &mut ids);

    assert!(snapshot.serialized_tree.contains("<shadow-root>"));
    assert_eq!(snapshot.fields.len(), 1);
    assert_eq!(snapshot.fields[0].label, "Shadow Field");
}
