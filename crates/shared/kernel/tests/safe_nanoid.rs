use handy_kernel::{SAFE_ALPHABET, safe_nanoid};
use std::collections::HashSet;

#[test]
fn ids_avoid_ambiguous_characters() {
    let id = safe_nanoid!(64);
    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|ch| SAFE_ALPHABET.contains(&ch)), "unexpected character in {id}");
    assert!(!id.contains(['0', '1', 'I', 'O', 'l']));
}

#[test]
fn default_ids_do_not_repeat() {
    let ids: HashSet<String> = (0..1_000).map(|_| safe_nanoid!()).collect();
    assert_eq!(ids.len(), 1_000);
}
