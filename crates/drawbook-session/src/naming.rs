//! Canvas names and ids
//!
//! New canvases are called `Untitled`, `Untitled 2`, `Untitled 3`, ... and
//! their id is the name lower-cased with whitespace runs turned into hyphens.
//! The id is computed once; renaming a canvas never touches it.

use std::collections::HashSet;
use std::sync::OnceLock;

use drawbook_store::CanvasDocument;
use regex::Regex;

/// Base display name for new canvases
pub const UNTITLED: &str = "Untitled";

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex"))
}

fn untitled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Untitled\s*(\d+)?").expect("Invalid regex"))
}

/// Derive a canvas id from a display name.
///
/// `"My Canvas"` becomes `"my-canvas"`.
#[must_use]
pub fn derive_id(name: &str) -> String {
    whitespace_re().replace_all(&name.to_lowercase(), "-").into_owned()
}

/// Next number in the `Untitled N` sequence, or `None` for plain `Untitled`.
///
/// A bare `Untitled` counts as 1. Names whose number does not fit are skipped.
#[must_use]
pub fn next_untitled_number<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    names
        .into_iter()
        .filter_map(|name| {
            let caps = untitled_re().captures(name)?;
            match caps.get(1) {
                Some(digits) => digits.as_str().parse::<u64>().ok(),
                None => Some(1),
            }
        })
        .max()
        .map(|max| max.saturating_add(1))
}

/// Display name for a position in the sequence
#[must_use]
pub fn untitled_label(number: Option<u64>) -> String {
    match number {
        Some(n) => format!("{UNTITLED} {n}"),
        None => UNTITLED.to_string(),
    }
}

/// Name the next created canvas should get, given existing names.
///
/// `{"Untitled", "Untitled 2", "Untitled 5"}` gives `"Untitled 6"`; no
/// `Untitled*` names at all gives `"Untitled"`.
#[must_use]
pub fn next_untitled_name<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    untitled_label(next_untitled_number(names))
}

/// Pick a name and id for a new canvas among `existing` documents.
///
/// Starts from [`next_untitled_name`] and moves further along the sequence
/// while the derived id is taken, since a renamed canvas keeps its old id.
/// When the sequence runs out of numbers, the lowest free one is used.
#[must_use]
pub fn new_canvas_identity(existing: &[CanvasDocument]) -> (String, String) {
    let taken: HashSet<&str> = existing.iter().map(|d| d.id.as_str()).collect();
    let free = |number: Option<u64>| {
        let name = untitled_label(number);
        let id = derive_id(&name);
        (!taken.contains(id.as_str())).then_some((name, id))
    };

    let mut number = next_untitled_number(existing.iter().map(|d| d.name.as_str()));
    loop {
        if let Some(identity) = free(number) {
            return identity;
        }
        match number.map_or(Some(2), |n| n.checked_add(1)) {
            Some(next) => number = Some(next),
            None => break,
        }
    }

    // Terminates within taken.len() + 1 steps: every candidate id is distinct
    let mut number = None;
    loop {
        if let Some(identity) = free(number) {
            return identity;
        }
        number = Some(number.map_or(2, |n: u64| n.saturating_add(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, name: &str) -> CanvasDocument {
        CanvasDocument::new(id, name)
    }

    #[test]
    fn test_derive_id() {
        assert_eq!(derive_id("My Canvas"), "my-canvas");
        assert_eq!(derive_id("Untitled 2"), "untitled-2");
        assert_eq!(derive_id("A  \t B"), "a-b");
        assert_eq!(derive_id("single"), "single");
    }

    #[test]
    fn test_derive_id_is_idempotent() {
        let once = derive_id("My Big   Canvas");
        assert_eq!(derive_id(&once), once);
    }

    #[test]
    fn test_next_name_without_untitled() {
        assert_eq!(next_untitled_name(Vec::<&str>::new()), "Untitled");
        assert_eq!(next_untitled_name(["Sketch", "Plan"]), "Untitled");
    }

    #[test]
    fn test_next_name_with_gaps() {
        assert_eq!(
            next_untitled_name(["Untitled", "Untitled 2", "Untitled 5"]),
            "Untitled 6"
        );
    }

    #[test]
    fn test_bare_untitled_counts_as_one() {
        assert_eq!(next_untitled_name(["Untitled"]), "Untitled 2");
        assert_eq!(next_untitled_name(["Untitled draft"]), "Untitled 2");
    }

    #[test]
    fn test_untitled_must_lead() {
        assert_eq!(next_untitled_name(["My Untitled 9"]), "Untitled");
        assert_eq!(next_untitled_name(["untitled 4"]), "Untitled");
    }

    #[test]
    fn test_number_without_space() {
        assert_eq!(next_untitled_name(["Untitled3"]), "Untitled 4");
    }

    #[test]
    fn test_oversized_number_is_skipped() {
        assert_eq!(
            next_untitled_name(["Untitled 99999999999999999999999", "Untitled 3"]),
            "Untitled 4"
        );
    }

    #[test]
    fn test_identity_for_empty_store() {
        assert_eq!(
            new_canvas_identity(&[]),
            ("Untitled".to_string(), "untitled".to_string())
        );
    }

    #[test]
    fn test_identity_skips_taken_ids() {
        // "untitled" was renamed to "Roadmap" but kept its id
        let existing = vec![doc("untitled", "Roadmap"), doc("untitled-2", "Ideas")];
        assert_eq!(
            new_canvas_identity(&existing),
            ("Untitled 3".to_string(), "untitled-3".to_string())
        );
    }

    #[test]
    fn test_identity_wraps_to_lowest_free_number() {
        let existing = vec![
            doc("untitled", "Untitled 18446744073709551614"),
            doc("untitled-18446744073709551615", "Untitled 18446744073709551615"),
        ];
        assert_eq!(
            new_canvas_identity(&existing),
            ("Untitled 2".to_string(), "untitled-2".to_string())
        );
    }

    #[test]
    fn test_identity_uses_last_number_when_free() {
        let existing = vec![doc("plan", "Untitled 18446744073709551614")];
        assert_eq!(
            new_canvas_identity(&existing),
            (
                "Untitled 18446744073709551615".to_string(),
                "untitled-18446744073709551615".to_string()
            )
        );
    }

    #[test]
    fn test_identity_follows_names() {
        let existing = vec![doc("untitled", "Untitled"), doc("untitled-4", "Untitled 4")];
        assert_eq!(
            new_canvas_identity(&existing),
            ("Untitled 5".to_string(), "untitled-5".to_string())
        );
    }
}
