//! Breaking self-referential data structures.
//!
//! A named type that holds itself by value cannot be laid out. Optional
//! members that close a cycle are rewritten to [`MemberValue::Indirect`],
//! which generators render as a boxed, nullable reference. Required members
//! and base types that close a cycle cannot be boxed without changing the
//! meaning of the type and are rejected.

use std::collections::{HashMap, HashSet};

use crate::error::ConversionError;
use crate::parse::data_structure::DataStructure;
use crate::parse::member::{Member, MemberValue};

/// Rewrite the members of one named type given the names of the types
/// currently being emitted around it (the type itself included).
///
/// Anything that is not [`DataStructure::Named`] is returned unchanged.
pub fn resolve(
    ds: &DataStructure,
    ancestors: &HashSet<String>,
) -> Result<DataStructure, ConversionError> {
    let DataStructure::Named {
        id,
        description,
        members,
        base_kind,
    } = ds
    else {
        return Ok(ds.clone());
    };

    if ancestors.contains(base_kind) {
        return Err(ConversionError::NotSupported(
            "recursive data structure with compound member".to_string(),
        ));
    }

    let members = members
        .iter()
        .map(|m| resolve_member(m, ancestors))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DataStructure::Named {
        id: id.clone(),
        description: description.clone(),
        members,
        base_kind: base_kind.clone(),
    })
}

fn resolve_member(member: &Member, ancestors: &HashSet<String>) -> Result<Member, ConversionError> {
    match &member.value {
        MemberValue::Reference(id) if ancestors.contains(id) => {
            if member.required {
                return Err(ConversionError::NotSupported(
                    "recursive data structure with required member".to_string(),
                ));
            }
            log::debug!("boxing recursive member `{}` of type `{id}`", member.name);
            Ok(Member {
                value: MemberValue::Indirect(id.clone()),
                ..member.clone()
            })
        }
        _ => Ok(member.clone()),
    }
}

/// Resolve every named type in a set of declarations.
///
/// The ancestors of a type are the type itself plus every type that sits on
/// the same by-value reference cycle, so mutual recursion is broken as well
/// as direct self-reference. Array and already boxed members are not
/// by-value edges.
pub fn resolve_all(structures: &[DataStructure]) -> Result<Vec<DataStructure>, ConversionError> {
    let graph = by_value_graph(structures);
    let reach: HashMap<&str, HashSet<&str>> = graph
        .keys()
        .map(|&id| (id, reachable(&graph, id)))
        .collect();

    structures
        .iter()
        .map(|ds| {
            let DataStructure::Named { id, .. } = ds else {
                return Ok(ds.clone());
            };
            let mut ancestors: HashSet<String> = HashSet::from([id.clone()]);
            if let Some(from_here) = reach.get(id.as_str()) {
                for other in from_here {
                    let back = reach.get(other).is_some_and(|r| r.contains(id.as_str()));
                    if back {
                        ancestors.insert(other.to_string());
                    }
                }
            }
            resolve(ds, &ancestors)
        })
        .collect()
}

/// Edges from each named type to the named types it holds by value.
fn by_value_graph(structures: &[DataStructure]) -> HashMap<&str, Vec<&str>> {
    let declared: HashSet<&str> = structures.iter().filter_map(|ds| ds.declared_id()).collect();
    let mut graph = HashMap::new();
    for ds in structures {
        if let DataStructure::Named {
            id,
            members,
            base_kind,
            ..
        } = ds
        {
            let mut edges: Vec<&str> = members
                .iter()
                .filter_map(|m| match &m.value {
                    MemberValue::Reference(target) => Some(target.as_str()),
                    _ => None,
                })
                .collect();
            edges.push(base_kind.as_str());
            edges.retain(|target| declared.contains(target));
            graph.insert(id.as_str(), edges);
        }
    }
    graph
}

/// Every node reachable from `start` through at least one edge.
fn reachable<'a>(graph: &HashMap<&'a str, Vec<&'a str>>, start: &'a str) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    let mut stack: Vec<&str> = graph.get(start).cloned().unwrap_or_default();
    while let Some(node) = stack.pop() {
        if seen.insert(node) {
            if let Some(next) = graph.get(node) {
                stack.extend(next.iter().copied());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, value: MemberValue, required: bool) -> Member {
        Member {
            name: name.to_string(),
            required,
            description: None,
            value,
            example: None,
            samples: Vec::new(),
        }
    }

    fn named(id: &str, base_kind: &str, members: Vec<Member>) -> DataStructure {
        DataStructure::Named {
            id: id.to_string(),
            description: None,
            members,
            base_kind: base_kind.to_string(),
        }
    }

    fn members_of(ds: &DataStructure) -> &[Member] {
        match ds {
            DataStructure::Named { members, .. } => members,
            _ => panic!("expected named data structure"),
        }
    }

    #[test]
    fn test_optional_self_reference_is_boxed() {
        let note = named(
            "Note",
            "object",
            vec![
                member("title", MemberValue::String(None), true),
                member("parent", MemberValue::Reference("Note".into()), false),
            ],
        );
        let ancestors = HashSet::from(["Note".to_string()]);
        let resolved = resolve(&note, &ancestors).unwrap();
        let members = members_of(&resolved);
        assert_eq!(members[0].value, MemberValue::String(None));
        assert_eq!(members[1].value, MemberValue::Indirect("Note".into()));
        assert_eq!(members[1].name, "parent");
    }

    #[test]
    fn test_required_self_reference_rejected() {
        let note = named(
            "Note",
            "object",
            vec![member("parent", MemberValue::Reference("Note".into()), true)],
        );
        let err = resolve(&note, &HashSet::from(["Note".to_string()])).unwrap_err();
        assert_eq!(
            err,
            ConversionError::NotSupported("recursive data structure with required member".into())
        );
    }

    #[test]
    fn test_arrays_pass_through() {
        let note = named(
            "Note",
            "object",
            vec![member("children", MemberValue::ArrayOf(Some("Note".into())), true)],
        );
        let resolved = resolve(&note, &HashSet::from(["Note".to_string()])).unwrap();
        assert_eq!(resolved, note);
    }

    #[test]
    fn test_recursive_base_rejected() {
        let ds = named("Loop", "Loop", vec![]);
        let err = resolve(&ds, &HashSet::from(["Loop".to_string()])).unwrap_err();
        assert_eq!(
            err,
            ConversionError::NotSupported("recursive data structure with compound member".into())
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let note = named(
            "Note",
            "object",
            vec![
                member("parent", MemberValue::Reference("Note".into()), false),
                member("author", MemberValue::Reference("User".into()), true),
            ],
        );
        let ancestors = HashSet::from(["Note".to_string()]);
        let once = resolve(&note, &ancestors).unwrap();
        let twice = resolve(&once, &ancestors).unwrap();
        assert_eq!(once, twice);

        let all_once = resolve_all(&[note.clone()]).unwrap();
        let all_twice = resolve_all(&all_once).unwrap();
        assert_eq!(all_once, all_twice);
    }

    #[test]
    fn test_mutual_recursion() {
        let structures = vec![
            named(
                "Folder",
                "object",
                vec![member("owner", MemberValue::Reference("User".into()), false)],
            ),
            named(
                "User",
                "object",
                vec![
                    member("home", MemberValue::Reference("Folder".into()), false),
                    member("name", MemberValue::String(None), true),
                ],
            ),
            named(
                "Team",
                "object",
                vec![member("lead", MemberValue::Reference("User".into()), true)],
            ),
        ];
        let resolved = resolve_all(&structures).unwrap();
        assert_eq!(
            members_of(&resolved[0])[0].value,
            MemberValue::Indirect("User".into())
        );
        assert_eq!(
            members_of(&resolved[1])[0].value,
            MemberValue::Indirect("Folder".into())
        );
        // Team is outside the cycle and keeps its by-value member.
        assert_eq!(
            members_of(&resolved[2])[0].value,
            MemberValue::Reference("User".into())
        );
    }

    #[test]
    fn test_non_named_untouched() {
        let list = DataStructure::Array {
            id: "Notes".into(),
            element_kind: "Note".into(),
        };
        assert_eq!(resolve_all(&[list.clone()]).unwrap(), vec![list]);
    }
}
