use super::*;

#[test]
fn identities_are_never_reused() {
    let a = NodeIdentity::new("Hat");
    let b = NodeIdentity::new("Hat");
    assert_ne!(a.id, b.id);
    assert_ne!(a.token, b.token);
    assert!(a.token.starts_with("Hat-"));
    assert_eq!(a.token.len(), "Hat-".len() + 32);
}

#[test]
fn slug_keeps_names_embeddable() {
    assert_eq!(slug("Hat"), "Hat");
    assert_eq!(slug("  Cat ears / big!! "), "Cat_ears_big");
    assert_eq!(slug("///"), "item");
    assert_eq!(slug("Ärmel"), "rmel");
}

#[test]
fn validate_rejects_empty_and_path_tokens() {
    let mut ident = NodeIdentity::new("x");
    assert!(ident.validate().is_ok());
    ident.token = "  ".to_string();
    assert!(ident.validate().is_err());
    ident.token = "a/b".to_string();
    assert!(ident.validate().is_err());
}

#[test]
fn token_survives_serde() {
    let ident = NodeIdentity::new("Glasses");
    let json = serde_json::to_string(&ident).unwrap();
    let back: NodeIdentity = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ident);
}
