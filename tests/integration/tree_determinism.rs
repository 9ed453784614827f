use sandtree::tree::{build_tree, find_in, render_tree};
use sandtree::types::EntryKind;

const PATHS: &[&str] = &[
    "/src/main.rs",
    "/README.md",
    "/src/tree/builder.rs",
    "/docs/guide.md",
    "/src/lib.rs",
    "/Cargo.toml",
    "/src/tree/node.rs",
];

#[test]
fn rendering_is_stable_across_input_orders() {
    let forward = build_tree(PATHS.iter().copied());
    let backward = build_tree(PATHS.iter().rev().copied());
    assert_eq!(forward, backward);

    let expected = "\
docs/
  guide.md
src/
  tree/
    builder.rs
    node.rs
  lib.rs
  main.rs
Cargo.toml
README.md
";
    assert_eq!(render_tree(&forward), expected);
}

#[test]
fn folders_carry_their_full_paths() {
    let roots = build_tree(PATHS.iter().copied());
    let tree = find_in(&roots, "/src/tree").unwrap();
    assert_eq!(tree.kind, EntryKind::Folder);
    assert_eq!(tree.count_files(), 2);

    let node = find_in(&roots, "/src/tree/node.rs").unwrap();
    assert_eq!(node.name, "node.rs");
    assert!(node.children.is_none());
    assert!(find_in(&roots, "/src/missing.rs").is_none());
}

#[test]
fn json_shape_uses_type_field() {
    let roots = build_tree(["/a/b.txt"]);
    let value = serde_json::to_value(&roots).unwrap();
    assert_eq!(value[0]["type"], "folder");
    assert_eq!(value[0]["path"], "/a");
    assert_eq!(value[0]["children"][0]["type"], "file");
    assert!(value[0]["children"][0].get("children").is_none());
}
