use plugwiz::ignore::Excludes;
use std::path::Path;

#[test]
fn test_default_excludes() {
    let excludes = Excludes::with_defaults().unwrap();

    assert!(excludes.is_excluded(Path::new("blueprint/.DS_Store")));
    assert!(excludes.is_excluded(Path::new("blueprint/sub/Thumbs.db")));
    assert!(excludes.is_excluded(Path::new(".git")));
    assert!(excludes.is_excluded(Path::new("a/CVS")));
    assert!(!excludes.is_excluded(Path::new("a/%!PluginName!%.c")));
    assert!(!excludes.is_excluded(Path::new("a/.gitignore")));
}

#[test]
fn test_extra_patterns() {
    let excludes = Excludes::new(&["*.bak", "build"]).unwrap();

    assert!(excludes.is_excluded(Path::new("src/main.c.bak")));
    assert!(excludes.is_excluded(Path::new("build")));
    assert!(!excludes.is_excluded(Path::new("builder")));
    assert!(excludes.is_excluded(Path::new(".DS_Store")));
}

#[test]
fn test_invalid_pattern() {
    assert!(Excludes::new(&["[unclosed"]).is_err());
}
