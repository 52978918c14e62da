use super::*;

#[test]
fn test_parse_full_settings() {
    let settings = Settings::parse(
        r#"
datfile = "/dats/snes.dat"
method = "md5"
workers = 4
exclude = ["txt", "nfo"]
sort_sets = true
"#,
    )
    .unwrap();
    assert_eq!(settings.datfile, Some(PathBuf::from("/dats/snes.dat")));
    assert_eq!(settings.method_or_default(), HashAlgorithm::Md5);
    assert_eq!(settings.workers_or_default(), 4);
    assert_eq!(settings.exclude, vec!["txt", "nfo"]);
    assert!(settings.sort_sets_or_default());
}

#[test]
fn test_empty_settings_use_defaults() {
    let settings = Settings::parse("").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.method_or_default(), HashAlgorithm::Sha1);
    assert_eq!(settings.workers_or_default(), 10);
    assert!(!settings.sort_sets_or_default());
}

#[test]
fn test_crc32_alias() {
    let settings = Settings::parse(r#"method = "crc32""#).unwrap();
    assert_eq!(settings.method, Some(HashAlgorithm::Crc));
}

#[test]
fn test_unknown_method_is_error() {
    assert!(Settings::parse(r#"method = "sha256""#).is_err());
}

#[test]
fn test_load_from_missing_and_malformed() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        Settings::load_from(&dir.path().join("missing.toml")),
        Settings::default()
    );

    let bad = dir.path().join("settings.toml");
    std::fs::write(&bad, "workers = \"many\"").unwrap();
    assert_eq!(Settings::load_from(&bad), Settings::default());
}

#[test]
fn test_toml_string_roundtrip_omits_unset() {
    let settings = Settings {
        workers: Some(3),
        ..Default::default()
    };
    let text = settings.to_toml_string().unwrap();
    assert!(text.contains("workers = 3"));
    assert!(!text.contains("datfile"));
    assert_eq!(Settings::parse(&text).unwrap(), settings);
}

#[test]
fn test_settings_path_location() {
    let path = settings_path();
    assert!(path.ends_with("romaudit/settings.toml"));
}
