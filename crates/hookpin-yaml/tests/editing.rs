//! Integration tests for the editing layer: round-trip fidelity, locality of
//! mutation, and the pre-commit re-pin scenario end to end.

use hookpin_yaml::{edit_str, Error, Value};

const PRE_COMMIT_CONFIG: &str = "\
# keep me
repos:
  - repo: local
    hooks:
      - id: eslint
        additional_dependencies:
          - eslint@8.0.0   # pinned
";

#[test]
fn test_noop_edit_is_byte_identical() {
    let inputs = [
        PRE_COMMIT_CONFIG,
        "key: 'quoted'   # comment\n\nother:\n  - 1\n  - 2\n",
        "a: {x: 1, y: [true, false]}\n# trailing comment\n",
        "---\ntop: |\n  block\n  text\nbottom: done\n",
    ];
    for input in inputs {
        let output = edit_str(input, |_root| Ok(())).unwrap();
        assert_eq!(output, input);
    }
}

#[test]
fn test_end_to_end_repin() {
    let output = edit_str(PRE_COMMIT_CONFIG, |root| {
        let mut repos = root.get("repos")?.unwrap().container()?;
        let mut repo = repos.get_index(0)?.unwrap().container()?;
        let mut hooks = repo.get("hooks")?.unwrap().container()?;
        let mut hook = hooks.get_index(0)?.unwrap().container()?;
        let mut deps = hook.get("additional_dependencies")?.unwrap().container()?;
        for i in 0..deps.len() {
            let entry = deps.get_index(i)?.unwrap();
            if entry.as_str().is_some_and(|s| s.starts_with("eslint@")) {
                deps.set_index(i, "eslint@8.5.1")?;
            }
        }
        Ok(())
    })
    .unwrap();

    let expected = "\
# keep me
repos:
  - repo: local
    hooks:
      - id: eslint
        additional_dependencies:
          - eslint@8.5.1   # pinned
";
    assert_eq!(output, expected);
}

#[test]
fn test_locality_of_mutation() {
    let input = "\
untouched: stays   # sibling comment
mutated: old
";
    let output = edit_str(input, |root| root.set("mutated", "new")).unwrap();
    assert_eq!(
        output,
        "untouched: stays   # sibling comment\nmutated: new\n"
    );
}

fn repin_lib(root: &mut hookpin_yaml::View<'_>) -> hookpin_yaml::Result<()> {
    root.set("pin", "lib@2.0.0")
}

#[test]
fn test_idempotent_callback_is_idempotent_through_session() {
    let once = edit_str("pin: lib@1.0.0\n", repin_lib).unwrap();
    let twice = edit_str(&once, repin_lib).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_scalar_terminality_through_chain() {
    let err = edit_str("a: 1\n", |root| {
        // `.a` unwraps to the native number; traversing further must fail
        let value = root.get("a")?.unwrap();
        match &value {
            Value::Scalar(s) => assert_eq!(s.as_int(), Some(1)),
            Value::Container(_) => panic!("scalar expected"),
        }
        value.container()?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(err, Error::InvalidTraversal { .. }));
}

#[test]
fn test_sequence_append_boundary() {
    let input = "items:\n  - a\n  - b\n";
    // writing at len extends
    let output = edit_str(input, |root| {
        let mut items = root.get("items")?.unwrap().container()?;
        items.set_index(2, "c")
    })
    .unwrap();
    assert_eq!(output, "items:\n  - a\n  - b\n  - c\n");

    // writing past len fails and produces no output
    let err = edit_str(input, |root| {
        let mut items = root.get("items")?.unwrap().container()?;
        items.set_index(4, "nope")
    })
    .unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfRange { index: 4, len: 2 }
    ));
}

#[test]
fn test_mutation_confined_to_subtree() {
    let input = "\
first:
  keep: this   # note
second:
  - entry one  # item note
  - entry two
";
    let output = edit_str(input, |root| {
        let mut second = root.get("second")?.unwrap().container()?;
        second.set_index(1, "entry replaced")
    })
    .unwrap();
    assert_eq!(
        output,
        "first:\n  keep: this   # note\nsecond:\n  - entry one  # item note\n  - entry replaced\n"
    );
}
