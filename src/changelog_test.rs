use super::*;

#[test]
fn checksum_is_sha256_hex() {
    assert_eq!(
        checksum(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        checksum("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn checksum_changes_with_content() {
    assert_ne!(checksum("## 1.0.0"), checksum("## 1.0.1"));
}

#[test]
fn opens_only_when_saved_checksum_differs() {
    let current = checksum("notes");
    assert!(!should_open(None, &current));
    assert!(!should_open(Some(&current), &current));
    assert!(should_open(Some("stale"), &current));
}

#[test]
fn state_tracks_open_and_close() {
    let mut state = ChangelogState::new("new notes", Some("old"));
    assert!(state.open);
    assert_eq!(state.checksum, checksum("new notes"));
    state.close();
    assert!(!state.open);
}

#[test]
fn shipped_changelog_is_not_empty() {
    assert!(!CHANGELOG.trim().is_empty());
}
