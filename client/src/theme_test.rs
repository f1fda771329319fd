use super::*;

#[test]
fn default_is_light() {
    assert_eq!(Theme::default(), Theme::Light);
}

#[test]
fn toggled_flips_and_double_toggle_is_identity() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    for theme in [Theme::Light, Theme::Dark] {
        assert_eq!(theme.toggled().toggled(), theme);
    }
}

#[test]
fn storage_literals_match_display() {
    assert_eq!(Theme::Light.as_str(), "light");
    assert_eq!(Theme::Dark.as_str(), "dark");
    assert_eq!(Theme::Dark.to_string(), "dark");
}

#[test]
fn parse_stored_accepts_only_exact_literals() {
    assert_eq!(Theme::parse_stored("light"), Some(Theme::Light));
    assert_eq!(Theme::parse_stored("dark"), Some(Theme::Dark));
    for raw in ["", "Dark", " dark", "blue", "true", "system"] {
        assert_eq!(Theme::parse_stored(raw), None, "{raw:?} should be rejected");
    }
}

#[test]
fn from_str_reports_offending_value() {
    assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
    let err = "auto".parse::<Theme>().unwrap_err();
    assert_eq!(err, ThemeParseError("auto".to_owned()));
    assert!(err.to_string().contains("auto"));
}

#[test]
fn from_prefers_dark_maps_boolean() {
    assert_eq!(Theme::from_prefers_dark(true), Theme::Dark);
    assert_eq!(Theme::from_prefers_dark(false), Theme::Light);
}

#[test]
fn serde_uses_lowercase_literal() {
    assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
    let parsed: Theme = serde_json::from_str("\"light\"").unwrap();
    assert_eq!(parsed, Theme::Light);
    assert!(serde_json::from_str::<Theme>("\"sepia\"").is_err());
}
