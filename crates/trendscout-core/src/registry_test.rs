use super::*;

#[test]
fn default_registry_is_valid() {
    validate_registry(&Registry::default()).expect("built-in registry should validate");
}

#[test]
fn category_for_matches_known_tools() {
    let registry = Registry::default();
    assert_eq!(registry.category_for("ChatGPT"), Category::ContentCreation);
    assert_eq!(registry.category_for("Midjourney v7"), Category::ImageGeneration);
    assert_eq!(registry.category_for("GitHub Copilot"), Category::CodeAssistance);
    assert_eq!(registry.category_for("Notion AI"), Category::Productivity);
    assert_eq!(registry.category_for("Tableau AI"), Category::DataAnalysis);
}

#[test]
fn category_for_unknown_keyword_uses_default() {
    let registry = Registry::default();
    assert_eq!(registry.category_for("Quantum"), Category::ContentCreation);
}

#[test]
fn find_tool_is_case_insensitive_and_ordered() {
    let registry = Registry::default();
    assert_eq!(
        registry.find_tool("Why is CLAUDE AI so slow today?"),
        Some("Claude AI")
    );
    assert_eq!(registry.find_tool("claude downgrade rumors"), Some("Claude"));
    assert_eq!(registry.find_tool("a post about rust compilers"), None);
}

#[test]
fn trend_seeds_take_first_n_per_category() {
    let registry = Registry::default();
    let seeds = registry.trend_seeds(2);
    assert_eq!(seeds.len(), 10);
    assert_eq!(&seeds[..2], &["ChatGPT", "Claude AI"]);
    assert!(registry.trend_seeds(0).is_empty());
}

#[test]
fn category_parses_from_loose_strings() {
    assert_eq!(
        "Image Generation".parse::<Category>().unwrap(),
        Category::ImageGeneration
    );
    assert_eq!(
        "code-assistance".parse::<Category>().unwrap(),
        Category::CodeAssistance
    );
    assert!("gaming".parse::<Category>().is_err());
}

#[test]
fn category_label_replaces_underscores() {
    assert_eq!(Category::DataAnalysis.label(), "data analysis");
    assert_eq!(Category::DataAnalysis.to_string(), "data_analysis");
}

#[test]
fn partial_yaml_overrides_keep_defaults() {
    let yaml = r"
tools:
  - Cursor
controversy:
  terms: [outage, regression]
  weight: 5
";
    let registry = parse_registry(yaml).expect("partial registry should parse");
    assert_eq!(registry.tools, vec!["Cursor".to_string()]);
    assert_eq!(registry.controversy.weight, 5);
    assert_eq!(registry.controversy.terms.len(), 2);
    // Untouched fields come from the built-in registry.
    assert_eq!(registry.categories.len(), 5);
    assert_eq!(registry.thresholds.trending_score, 80);
}

#[test]
fn lexicon_override_without_weight_keeps_default_weight() {
    let yaml = r"
controversy:
  terms: [outage]
";
    let registry = parse_registry(yaml).expect("lexicon without weight should parse");
    assert_eq!(registry.controversy.terms, vec!["outage".to_string()]);
    assert_eq!(registry.controversy.weight, 10);
}

#[test]
fn default_lexicon_markers_are_single_words() {
    let lexicon = ControversyLexicon::default();
    assert!(lexicon.terms.iter().all(|t| !t.contains(' ')));
    assert!(lexicon.terms.iter().any(|t| t == "ripoff"));
}

#[test]
fn yaml_category_rules_deserialize_snake_case() {
    let yaml = r"
categories:
  - category: code_assistance
    matchers: [cursor]
    seeds: [Cursor AI]
default_category: code_assistance
";
    let registry = parse_registry(yaml).unwrap();
    assert_eq!(registry.category_for("Cursor"), Category::CodeAssistance);
    assert_eq!(registry.category_for("anything else"), Category::CodeAssistance);
}

#[test]
fn validate_rejects_zero_weight() {
    let yaml = r"
controversy:
  terms: [bug]
  weight: 0
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("weight must be greater than zero"));
}

#[test]
fn validate_rejects_empty_lexicon() {
    let yaml = r"
controversy:
  terms: []
  weight: 10
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("at least one term"));
}

#[test]
fn validate_rejects_blank_tools() {
    let yaml = r#"
tools: ["  "]
"#;
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("at least one tool"));
}

#[test]
fn validate_rejects_duplicate_categories() {
    let yaml = r"
categories:
  - category: productivity
    matchers: [notion]
  - category: productivity
    matchers: [zapier]
";
    let err = parse_registry(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate category rule"));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_registry("tools: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::RegistryFileParse(_)));
}

#[test]
fn load_registry_missing_file_is_io_error() {
    let err = load_registry(Path::new("/definitely/not/here/registry.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::RegistryFileIo { .. }));
}
