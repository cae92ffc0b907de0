use clap::Parser;
use plugwiz::cli::Args;
use plugwiz::config::Settings;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("plugwiz")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["1000005", "Super Awesome Plugin"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.id.as_deref(), Some("1000005"));
    assert_eq!(parsed.name.as_deref(), Some("Super Awesome Plugin"));
    assert_eq!(parsed.destinations, vec![PathBuf::from(".")]);
    assert!(!parsed.list_tokens);
    assert_eq!(parsed.verbose, 0);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--destination",
        "./one",
        "--destination",
        "./two",
        "--source-data",
        "./blueprints",
        "--type",
        "jsplugin",
        "--rules-file",
        "./rules.txt",
        "--author",
        "Jane Doe",
        "--org",
        "ACME",
        "--exclude",
        r"\.png$",
        "--list-tokens",
        "1000005",
        "Foo",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.destinations, vec![PathBuf::from("./one"), PathBuf::from("./two")]);
    assert_eq!(parsed.source_data, Some(PathBuf::from("./blueprints")));
    assert_eq!(parsed.plugin_type.as_deref(), Some("jsplugin"));
    assert_eq!(parsed.rules_file, Some(PathBuf::from("./rules.txt")));
    assert_eq!(parsed.author.as_deref(), Some("Jane Doe"));
    assert_eq!(parsed.org.as_deref(), Some("ACME"));
    assert_eq!(parsed.exclude.as_deref(), Some(r"\.png$"));
    assert!(parsed.list_tokens);
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-f", "-c", "-vv", "-t", "cmdplugin", "-d", "out", "1000005", "Foo"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.create_dirs);
    assert_eq!(parsed.verbose, 2);
    assert_eq!(parsed.destinations, vec![PathBuf::from("out")]);
}

#[test]
fn test_list_tokens_without_positionals() {
    let parsed = Args::try_parse_from(make_args(&["-l"])).unwrap();
    assert!(parsed.list_tokens);
    assert!(parsed.id.is_none());
    assert!(parsed.name.is_none());
}

#[test]
fn test_unknown_flag() {
    assert!(Args::try_parse_from(make_args(&["--bogus", "1", "Foo"])).is_err());
}

#[test]
fn test_into_config_precedence() {
    let settings = Settings {
        author: Some("Settings Author".to_string()),
        org: Some("Settings Org".to_string()),
        plugin_type: Some("jsplugin".to_string()),
        rules_file: None,
        excludes: vec!["*.bak".to_string()],
    };

    let parsed = Args::try_parse_from(make_args(&[
        "-s",
        "/data",
        "-o",
        "Flag Org",
        "1000005",
        "Foo",
    ]))
    .unwrap();
    let config = parsed.into_config(&settings);

    assert_eq!(config.collection, PathBuf::from("/data"));
    assert_eq!(config.plugin_type, "jsplugin");
    assert_eq!(config.org.as_deref(), Some("Flag Org"));
    assert_eq!(config.author.as_deref(), Some("Settings Author"));
    assert_eq!(config.excludes, vec!["*.bak".to_string()]);
}

#[test]
fn test_into_config_defaults() {
    let parsed = Args::try_parse_from(make_args(&["-s", "/data", "-a", "A", "1000005", "Foo"]))
        .unwrap();
    let config = parsed.into_config(&Settings::default());

    assert_eq!(config.plugin_type, "cmdplugin");
    assert_eq!(config.destinations, vec![PathBuf::from(".")]);
    assert!(config.rules_file.is_none());
    assert!(!config.overwrite);
}
