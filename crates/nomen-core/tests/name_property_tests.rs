//! Property tests driving both representations against a reference model
//!
//! Random operation sequences are applied in lockstep to an `ArrayName`,
//! a `StringName`, and a plain `Vec<String>` model. After every step all
//! three must agree on every observable, and the string representation's
//! rendered data string must split back into exactly the model's
//! components.

use nomen_core::{ArrayName, Name, StringName, escape};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Set(usize, String),
    Remove(usize),
    Append(String),
}

/// A raw component, possibly containing the default delimiter; masked
/// before use so it always arrives in valid masked form.
fn masked_component() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,4}(\\.[a-z0-9]{1,3})?".prop_map(|raw| escape::mask(&raw, '.'))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<prop::sample::Index>(), masked_component())
            .prop_map(|(i, c)| Op::Insert(i.index(usize::MAX), c)),
        (any::<prop::sample::Index>(), masked_component())
            .prop_map(|(i, c)| Op::Set(i.index(usize::MAX), c)),
        any::<prop::sample::Index>().prop_map(|i| Op::Remove(i.index(usize::MAX))),
        masked_component().prop_map(Op::Append),
    ]
}

/// Split a data string on unescaped default delimiters, independently of
/// any boundary cache.
fn independent_split(data: &str) -> Vec<String> {
    if data.is_empty() {
        return Vec::new();
    }
    let boundaries = escape::scan_boundaries(data, '.').unwrap();
    let mut parts = Vec::new();
    let mut start = 0usize;
    for b in boundaries {
        parts.push(data[start..b as usize].to_owned());
        start = b as usize + 1;
    }
    parts.push(data[start..].to_owned());
    parts
}

fn assert_agreement(model: &[String], array_name: &ArrayName, string_name: &StringName) {
    assert_eq!(array_name.component_count(), model.len());
    assert_eq!(string_name.component_count(), model.len());
    for (i, expected) in model.iter().enumerate() {
        assert_eq!(array_name.component(i).unwrap(), expected);
        assert_eq!(string_name.component(i).unwrap(), expected);
    }
    assert_eq!(array_name.as_string(), string_name.as_string());
    assert!(array_name.is_equal(string_name));
    assert!(string_name.is_equal(array_name));
    assert_eq!(array_name.hash_code(), string_name.hash_code());

    // Boundary integrity: the rendered string must split back into
    // exactly the stored components. A single empty component renders
    // as the empty string, indistinguishable from the empty name.
    let resplit = independent_split(&string_name.as_data_string());
    if model == [String::new()] {
        assert!(resplit.is_empty());
    } else {
        assert_eq!(resplit, model);
    }
}

proptest! {
    #[test]
    fn representations_agree_under_mutation(
        initial in prop::collection::vec(masked_component(), 0..5),
        ops in prop::collection::vec(op(), 0..12),
    ) {
        let mut model = initial.clone();
        let mut array_name = ArrayName::new(initial.clone()).unwrap();
        let mut string_name = StringName::new("").unwrap();
        for component in &initial {
            string_name = string_name.append(component).unwrap();
        }
        assert_agreement(&model, &array_name, &string_name);

        for op in ops {
            match op {
                Op::Insert(i, c) => {
                    let i = i % (model.len() + 1);
                    model.insert(i, c.clone());
                    array_name = array_name.insert(i, &c).unwrap();
                    string_name = string_name.insert(i, &c).unwrap();
                }
                Op::Set(i, c) => {
                    if model.is_empty() {
                        continue;
                    }
                    let i = i % model.len();
                    model[i] = c.clone();
                    array_name = array_name.with_component(i, &c).unwrap();
                    string_name = string_name.with_component(i, &c).unwrap();
                }
                Op::Remove(i) => {
                    if model.is_empty() {
                        continue;
                    }
                    let i = i % model.len();
                    model.remove(i);
                    array_name = array_name.remove(i).unwrap();
                    string_name = string_name.remove(i).unwrap();
                }
                Op::Append(c) => {
                    model.push(c.clone());
                    array_name = array_name.append(&c).unwrap();
                    string_name = string_name.append(&c).unwrap();
                }
            }
            assert_agreement(&model, &array_name, &string_name);
        }
    }

    #[test]
    fn mutation_arithmetic(
        components in prop::collection::vec(masked_component(), 1..6),
        extra in masked_component(),
    ) {
        let name = ArrayName::new(components.clone()).unwrap();
        let n = name.component_count();

        prop_assert_eq!(name.insert(0, &extra).unwrap().component_count(), n + 1);
        prop_assert_eq!(name.remove(n - 1).unwrap().component_count(), n - 1);
        prop_assert_eq!(name.with_component(0, &extra).unwrap().component_count(), n);

        let appended = name.append(&extra).unwrap();
        prop_assert_eq!(appended.component_count(), n + 1);
        prop_assert_eq!(appended.component(n).unwrap(), extra.as_str());
    }

    #[test]
    fn data_string_round_trips(
        components in prop::collection::vec(masked_component(), 0..6),
    ) {
        let mut name = StringName::new("").unwrap();
        for component in &components {
            name = name.append(component).unwrap();
        }
        let reparsed = StringName::new(name.as_data_string()).unwrap();
        // The empty-component rendering ambiguity aside, parsing the
        // data string reproduces an equal name.
        if components != [String::new()] {
            prop_assert!(name.is_equal(&reparsed));
            prop_assert_eq!(name.hash_code(), reparsed.hash_code());
        }
    }

    #[test]
    fn equality_is_delimiter_independent(
        components in prop::collection::vec(masked_component(), 0..6),
    ) {
        let dotted = ArrayName::new(components.clone()).unwrap();
        let hashed = ArrayName::with_delimiter(components.clone(), '#').unwrap();
        let string_form = {
            let mut n = StringName::with_delimiter("", '#').unwrap();
            for component in &components {
                n = n.append(component).unwrap();
            }
            n
        };

        prop_assert!(dotted.is_equal(&hashed));
        prop_assert!(dotted.is_equal(&string_form));
        prop_assert_eq!(dotted.hash_code(), hashed.hash_code());
        prop_assert_eq!(dotted.hash_code(), string_form.hash_code());
    }

    #[test]
    fn concat_component_arithmetic(
        left in prop::collection::vec(masked_component(), 0..4),
        right in prop::collection::vec(masked_component(), 0..4),
    ) {
        let left_name = ArrayName::new(left.clone()).unwrap();
        let right_name = ArrayName::new(right.clone()).unwrap();
        let joined = left_name.concat(&right_name).unwrap();

        prop_assert_eq!(joined.component_count(), left.len() + right.len());
        for (i, expected) in left.iter().chain(right.iter()).enumerate() {
            prop_assert_eq!(joined.component(i).unwrap(), expected.as_str());
        }
    }
}
