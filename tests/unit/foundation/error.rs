use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PowerError::malformed("x")
            .to_string()
            .contains("malformed record:")
    );
    assert!(
        PowerError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(
        PowerError::unparsable_id("abc").to_string(),
        "unparsable tag id 'abc'"
    );
}

#[test]
fn recursive_names_power_and_tag() {
    let err = PowerError::recursive("Barbarian_Whirlwind", "Damage Scalar");
    assert_eq!(
        err.to_string(),
        "recursive formula in PowerTag.Barbarian_Whirlwind.\"Damage Scalar\""
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PowerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
