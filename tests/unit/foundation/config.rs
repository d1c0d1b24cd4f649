use super::*;

#[test]
fn missing_fields_take_defaults() {
    let cfg = GeneratorConfig::from_reader(r#"{ "system_name": "Kitsune" }"#.as_bytes()).unwrap();
    assert_eq!(cfg.system_name, "Kitsune");
    assert_eq!(cfg.param_prefix, "MG");
    assert_eq!(cfg.max_menu_controls, 8);
    assert_eq!(cfg.shared_layer_name(), "MG-Kitsune");
}

#[test]
fn derived_names_share_the_token() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.parameter_name("Hat-1"), "MGHat-1");
    assert_eq!(cfg.contact_tag("Hat-1"), "MG-Contact-Hat-1");
    assert_eq!(cfg.receiver_parameter("Hat-1"), "RemoteMG-RCV-Hat-1");
    assert_eq!(
        cfg.sender_object("MG-Contact-Hat-1"),
        "MG-Remoting-Root/Sender-MG-Contact-Hat-1"
    );
    assert!(cfg.owns_parameter("MGHat-1"));
    assert!(cfg.owns_parameter("RemoteMG-RCV-Hat-1"));
    assert!(!cfg.owns_parameter("VRCEmote"));
    assert!(cfg.owns_layer(&cfg.receiver_layer_name()));
}

#[test]
fn validate_rejects_bad_settings() {
    let cfg = GeneratorConfig {
        max_menu_controls: 0,
        ..GeneratorConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = GeneratorConfig {
        param_prefix: " ".to_string(),
        ..GeneratorConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = GeneratorConfig {
        remote_prefix: "MG".to_string(),
        ..GeneratorConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = GeneratorConfig::from_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(err, MenuGraphError::Serde(_)));
}
