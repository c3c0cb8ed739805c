//! Dirty-set extraction from `git status --porcelain -z`.
//!
//! Each record is `XY <path>` terminated by NUL. Rename and copy records
//! carry a second NUL-terminated field with the original path. Paths are
//! kept as raw bytes end to end; git does not promise UTF-8 file names.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::util::path_from_bytes;

/// Parse porcelain v1 `-z` output into repository-relative paths.
///
/// Renamed and copied entries yield the new path followed by the original
/// one, so a rename shows up remotely as a create plus a delete. Duplicates
/// are dropped; first occurrence wins.
pub fn parse_porcelain_z(output: &[u8]) -> Vec<PathBuf> {
    let mut seen: HashSet<&[u8]> = HashSet::new();
    let mut paths = Vec::new();
    let mut records = output.split(|b| *b == 0).filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        // "XY " prefix; anything shorter is not a status record.
        if record.len() < 4 {
            continue;
        }
        let (code, path) = record.split_at(3);
        push_unique(&mut seen, &mut paths, path);

        if code[..2].iter().any(|c| *c == b'R' || *c == b'C')
            && let Some(original) = records.next()
        {
            push_unique(&mut seen, &mut paths, original);
        }
    }

    paths
}

fn push_unique<'a>(seen: &mut HashSet<&'a [u8]>, paths: &mut Vec<PathBuf>, raw: &'a [u8]) {
    if seen.insert(raw) {
        paths.push(path_from_bytes(raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paths(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_modified_untracked_and_deleted() {
        let out = b" M src/lib.rs\0?? notes.txt\0 D old.rs\0A  new.rs\0";
        assert_eq!(
            parse_porcelain_z(out),
            paths(&["src/lib.rs", "notes.txt", "old.rs", "new.rs"])
        );
    }

    #[test]
    fn test_rename_yields_both_paths() {
        let out = b"R  src/new_name.rs\0src/old_name.rs\0 M Cargo.toml\0";
        assert_eq!(
            parse_porcelain_z(out),
            paths(&["src/new_name.rs", "src/old_name.rs", "Cargo.toml"])
        );
    }

    #[test]
    fn test_paths_with_spaces_and_arrows_are_literal() {
        let out = b"?? my file -> copy.txt\0";
        assert_eq!(parse_porcelain_z(out), paths(&["my file -> copy.txt"]));
    }

    #[test]
    fn test_clean_tree_is_empty() {
        assert!(parse_porcelain_z(b"").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let out = b"R  b.rs\0a.rs\0 D a.rs\0";
        assert_eq!(parse_porcelain_z(out), paths(&["b.rs", "a.rs"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_kept_verbatim() {
        use std::os::unix::ffi::OsStrExt;

        let out = b"?? caf\xe9.txt\0 M plain.rs\0";
        let parsed = parse_porcelain_z(out);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].as_os_str().as_bytes(), b"caf\xe9.txt");
        assert_eq!(parsed[1], PathBuf::from("plain.rs"));
    }

    #[test]
    fn test_large_untracked_tree_keeps_order() {
        let mut out = Vec::new();
        for i in 0..60_000 {
            out.extend_from_slice(format!("?? build/gen/file_{i}.o\0").as_bytes());
        }
        out.extend_from_slice(b" D build/gen/file_0.o\0");

        let parsed = parse_porcelain_z(&out);
        assert_eq!(parsed.len(), 60_000);
        assert_eq!(parsed[0], PathBuf::from("build/gen/file_0.o"));
        assert_eq!(parsed[59_999], PathBuf::from("build/gen/file_59999.o"));
    }

    proptest! {
        #[test]
        fn test_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = parse_porcelain_z(&bytes);
        }

        #[test]
        fn test_prefix_is_always_stripped(path in "[a-zA-Z0-9_./ -]{1,40}") {
            let out = format!(" M {path}\0");
            prop_assert_eq!(parse_porcelain_z(out.as_bytes()), vec![PathBuf::from(path)]);
        }
    }
}
