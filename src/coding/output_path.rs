use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub const REVIEW_SUFFIX: &str = "_review";

/// Sibling path that receives the review of `source`:
/// `<dir>/<stem>_review<ext>`.
///
/// The extension is everything from the last `.` of the file name, with
/// no special case for dotfiles: `.gitignore` becomes `_review.gitignore`.
pub fn review_output_path(source: &Path) -> PathBuf {
    let review_name = review_file_name(source.file_name().unwrap_or_default());

    match source.parent() {
        Some(dir) if source.file_name().is_some() => dir.join(review_name),
        _ => source.join(review_name),
    }
}

/// Splits on raw bytes so non-UTF-8 names survive unchanged.
#[cfg(unix)]
fn review_file_name(file_name: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = file_name.as_bytes();
    let (stem, ext) = match bytes.iter().rposition(|&b| b == b'.') {
        Some(idx) => bytes.split_at(idx),
        None => (bytes, &[][..]),
    };

    let mut name = Vec::with_capacity(bytes.len() + REVIEW_SUFFIX.len());
    name.extend_from_slice(stem);
    name.extend_from_slice(REVIEW_SUFFIX.as_bytes());
    name.extend_from_slice(ext);
    OsString::from_vec(name)
}

#[cfg(not(unix))]
fn review_file_name(file_name: &OsStr) -> OsString {
    let file_name = file_name.to_string_lossy();
    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) => file_name.split_at(idx),
        None => (&*file_name, ""),
    };
    format!("{stem}{REVIEW_SUFFIX}{ext}").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(path: &str) -> PathBuf {
        review_output_path(Path::new(path))
    }

    #[test]
    fn keeps_extension_after_suffix() {
        assert_eq!(derive("report.txt"), PathBuf::from("report_review.txt"));
        assert_eq!(derive("/data/sample.go"), PathBuf::from("/data/sample_review.go"));
    }

    #[test]
    fn no_extension() {
        assert_eq!(derive("README"), PathBuf::from("README_review"));
        assert_eq!(derive("/src/Makefile"), PathBuf::from("/src/Makefile_review"));
    }

    #[test]
    fn dotfile_is_all_extension() {
        assert_eq!(derive(".gitignore"), PathBuf::from("_review.gitignore"));
        assert_eq!(derive("/repo/.env"), PathBuf::from("/repo/_review.env"));
    }

    #[test]
    fn only_last_extension_is_split() {
        assert_eq!(derive("/tmp/a.tar.gz"), PathBuf::from("/tmp/a.tar_review.gz"));
    }

    #[test]
    fn trailing_dot_is_an_empty_extension() {
        assert_eq!(derive("notes."), PathBuf::from("notes_review."));
    }

    #[test]
    fn dots_in_directories_are_ignored() {
        assert_eq!(
            derive("/home/me/v1.2/main"),
            PathBuf::from("/home/me/v1.2/main_review")
        );
    }

    #[test]
    fn path_without_file_name_gets_bare_suffix() {
        assert_eq!(derive("/"), PathBuf::from("/_review"));
        assert_eq!(derive(""), PathBuf::from("_review"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_keeps_its_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"/data/r\xe9port.txt"));
        let expected = Path::new(OsStr::from_bytes(b"/data/r\xe9port_review.txt"));
        assert_eq!(review_output_path(source), expected);
    }
}
