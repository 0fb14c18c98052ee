use docuspark::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../docuspark.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.paths.input_dir, "data");
    assert_eq!(cfg.paths.output_dir, "clean_md");
    assert!(cfg.ocr.enabled);
    assert_eq!(cfg.ocr.placeholder_alt, "image");
}

#[test]
fn empty_config_falls_back_to_defaults() {
    let cfg: Config = toml::from_str("").expect("parse empty TOML");
    assert_eq!(cfg.paths.input_dir, "data");
    assert_eq!(cfg.pandoc.exe, "pandoc");
    assert_eq!(cfg.ocr.lang, "eng");
}

#[test]
fn partial_config_overrides_only_named_keys() {
    let cfg: Config = toml::from_str("[paths]\ninput_dir = \"docs\"\noutput_dir = \"out\"\n")
        .expect("parse TOML");
    assert_eq!(cfg.paths.input_dir, "docs");
    assert_eq!(cfg.paths.output_dir, "out");
    assert_eq!(cfg.pandoc.to_format, "gfm");
}
