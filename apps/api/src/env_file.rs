use std::path::Path;

/// Loads a dotenv-style file into the process environment.
///
/// Variables already present in the environment always win; the file only
/// fills in what is missing. A missing file is not an error, and malformed
/// lines (no `=`, or an empty key after trimming) are skipped without
/// comment. Returns the number of variables actually applied.
pub fn load(path: &Path) -> usize {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return 0;
    };

    let mut applied = 0;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            continue;
        }
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sets_missing_variable() {
        let key = "JOBTRACK_TEST_SETS_MISSING";
        std::env::remove_var(key);
        let file = env_file(&format!("{key}=bar\n"));

        let applied = load(file.path());

        assert_eq!(applied, 1);
        assert_eq!(std::env::var(key).unwrap(), "bar");
        std::env::remove_var(key);
    }

    #[test]
    fn test_existing_variable_is_preserved() {
        let key = "JOBTRACK_TEST_EXISTING_WINS";
        std::env::set_var(key, "original");
        let file = env_file(&format!("{key}=overwritten\n"));

        let applied = load(file.path());

        assert_eq!(applied, 0);
        assert_eq!(std::env::var(key).unwrap(), "original");
        std::env::remove_var(key);
    }

    #[test]
    fn test_splits_on_first_equals_and_trims() {
        let key = "JOBTRACK_TEST_FIRST_EQUALS";
        std::env::remove_var(key);
        let file = env_file(&format!("  {key} = a=b=c \n"));

        load(file.path());

        assert_eq!(std::env::var(key).unwrap(), "a=b=c");
        std::env::remove_var(key);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let key = "JOBTRACK_TEST_MALFORMED";
        std::env::remove_var(key);
        let file = env_file(&format!(
            "# a comment\n\nno-equals-here\n   =valueless\n{key}=ok\n"
        ));

        let applied = load(file.path());

        assert_eq!(applied, 1);
        assert_eq!(std::env::var(key).unwrap(), "ok");
        std::env::remove_var(key);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let applied = load(Path::new("/nonexistent/definitely/not/here/.env"));
        assert_eq!(applied, 0);
    }
}
