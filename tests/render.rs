//! Integration tests for the bracket renderer: exact layout, labels and highlighting.

use maze_tournament::{print_tree, BracketRenderer, BracketTree};

fn leaf(name: &str) -> BracketTree<String> {
    BracketTree::TeamLeaf(name.to_string())
}

fn node(
    left: BracketTree<String>,
    winner: Option<&str>,
    right: BracketTree<String>,
) -> BracketTree<String> {
    BracketTree::match_node(left, winner.map(str::to_string), right).unwrap()
}

fn four_played() -> BracketTree<String> {
    node(
        node(leaf("Ants"), Some("Ants"), leaf("Dingos")),
        Some("Cats"),
        node(leaf("Bees"), Some("Cats"), leaf("Cobras")),
    )
}

#[test]
fn renders_unplayed_four_team_bracket() {
    let tree = BracketTree::knockout(&[1, 2, 3, 4]).unwrap();
    let expected = [
        " 1 ┐",
        "   ├─ ??? ┐",
        " 4 ┘      │  ┏━━━━━┓",
        "          ├──┨ ??? ┃",
        " 2 ┐      │  ┗━━━━━┛",
        "   ├─ ??? ┘",
        " 3 ┘",
    ]
    .join("\n");
    assert_eq!(print_tree(&tree), expected);
}

#[test]
fn renders_two_team_final() {
    let tree = node(leaf("Alpha"), None, leaf("Beta"));
    let expected = [
        " Alpha ┐  ┏━━━━━┓",
        "       ├──┨ ??? ┃",
        " Beta ─┘  ┗━━━━━┛",
    ]
    .join("\n");
    assert_eq!(print_tree(&tree), expected);
}

#[test]
fn renders_winners_in_place_of_placeholder() {
    let expected = [
        " Ants ──┐",
        "        ├─ Ants ┐",
        " Dingos ┘       │  ┏━━━━━━┓",
        "                ├──┨ Cats ┃",
        " Bees ──┐       │  ┗━━━━━━┛",
        "        ├─ Cats ┘",
        " Cobras ┘",
    ]
    .join("\n");
    assert_eq!(print_tree(&four_played()), expected);
}

#[test]
fn renders_eight_team_bracket_with_mixed_name_lengths() {
    let tree = node(
        node(
            node(leaf("Ants"), Some("Ants"), leaf("Hippopotami")),
            Some("Ants"),
            node(leaf("Dingos"), Some("Eels"), leaf("Eels")),
        ),
        None,
        node(
            node(leaf("Bees"), Some("Bees"), leaf("Gnus")),
            Some("Cats"),
            node(leaf("Cats"), Some("Cats"), leaf("Foxes")),
        ),
    );
    let expected = [
        " Ants ───────┐",
        "             ├─ Ants ┐",
        " Hippopotami ┘       │",
        "                     ├─ Ants ┐",
        " Dingos ─────┐       │       │",
        "             ├─ Eels ┘       │",
        " Eels ───────┘               │  ┏━━━━━┓",
        "                             ├──┨ ??? ┃",
        " Bees ───────┐               │  ┗━━━━━┛",
        "             ├─ Bees ┐       │",
        " Gnus ───────┘       │       │",
        "                     ├─ Cats ┘",
        " Cats ───────┐       │",
        "             ├─ Cats ┘",
        " Foxes ──────┘",
    ]
    .join("\n");
    assert_eq!(print_tree(&tree), expected);
    assert_eq!(BracketRenderer::new().col_widths(&tree), vec![3, 4, 4, 11]);
}

#[test]
fn renders_bye_as_extended_line() {
    let knockout = node(
        node(leaf("A"), None, leaf("D")),
        None,
        node(leaf("B"), None, leaf("C")),
    );
    let tree = knockout.with_last_chance_final(leaf("E"), None).unwrap();
    let expected = [
        " A ┐",
        "   ├─ ??? ┐",
        " D ┘      │",
        "          ├─ ??? ┐",
        " B ┐      │      │",
        "   ├─ ??? ┘      │",
        " C ┘             │  ┏━━━━━┓",
        "                 ├──┨ ??? ┃",
        " E ──────────────┘  ┗━━━━━┛",
    ]
    .join("\n");
    assert_eq!(print_tree(&tree), expected);
}

#[test]
fn single_team_is_a_leaf_line() {
    assert_eq!(print_tree(&leaf("Solo")), " Solo ");
}

#[test]
fn col_widths_per_depth() {
    let renderer = BracketRenderer::new();
    let tree = BracketTree::knockout(&[1, 2, 3, 4]).unwrap();
    assert_eq!(renderer.col_widths(&tree), vec![3, 3, 1]);
    assert_eq!(renderer.col_widths(&four_played()), vec![4, 4, 6]);

    let with_bye = tree.with_last_chance_final(BracketTree::TeamLeaf(5), None).unwrap();
    assert_eq!(renderer.col_widths(&with_bye), vec![3, 3, 3, 1]);
}

#[test]
fn custom_placeholder() {
    let tree = node(leaf("Alpha"), None, leaf("Beta"));
    let text = BracketRenderer::new().with_placeholder("tbd").render(&tree);
    assert!(text.contains("┨ tbd ┃"));
    assert!(!text.contains("???"));
}

#[test]
fn name_transform_applies_before_layout() {
    let tree = node(leaf("Alpha"), Some("Beta"), leaf("Beta"));
    let text = BracketRenderer::new()
        .with_name_transform(|name| name.to_uppercase())
        .render(&tree);
    let expected = [
        " ALPHA ┐  ┏━━━━━━┓",
        "       ├──┨ BETA ┃",
        " BETA ─┘  ┗━━━━━━┛",
    ]
    .join("\n");
    assert_eq!(text, expected);
}

#[test]
fn highlight_wraps_names_without_shifting_layout() {
    let plain = print_tree(&four_played());
    let bold = BracketRenderer::new()
        .with_highlight(["Cats"])
        .render(&four_played());

    assert!(bold.contains("\x1b[1mCats\x1b[0m"));
    assert!(!bold.contains("\x1b[1mAnts"));
    assert_eq!(bold.replace("\x1b[1m", "").replace("\x1b[0m", ""), plain);
}
