use super::*;

fn defs() -> TagDefinitions {
    let mut d = TagDefinitions::default();
    d.insert("329472", "Damage Scalar", "DamageScalar");
    d.insert("329473", "Cooldown", "Cooldown");
    d
}

fn row(family: &str, first: f32) -> BalanceRecord {
    let mut params = [0.0; FORMULA_PARAM_COUNT];
    params[0] = first;
    params[FORMULA_PARAM_COUNT - 1] = first * 2.0;
    BalanceRecord {
        family: family.to_string(),
        params,
    }
}

#[test]
fn lookups_are_bijective() {
    let cat = TagCatalog::load(&defs(), &[], CatalogLoadOpts::default()).unwrap();
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.id_for("Damage Scalar"), Some(329472));
    assert_eq!(cat.name_for(329472), Some("Damage Scalar"));
    assert_eq!(cat.rawname_for(329473), Some("Cooldown"));
    assert_eq!(cat.id_for("Missing"), None);
    assert_eq!(cat.name_for(1), None);
    assert_eq!(cat.rawname_for(1), None);
}

#[test]
fn json_definitions_parse() {
    let json = r#"{
        "329472": {"name": "Damage Scalar", "tag": "DamageScalar"},
        "329473": {"name": "Cooldown", "tag": "Cooldown"}
    }"#;
    let cat = TagCatalog::from_json_str(json, &[], CatalogLoadOpts::default()).unwrap();
    assert_eq!(cat.id_for("Cooldown"), Some(329473));

    let err = TagCatalog::from_json_str("[1, 2]", &[], CatalogLoadOpts::default()).unwrap_err();
    assert!(matches!(err, PowerError::Serde(_)));
}

#[test]
fn bad_id_aborts_by_default() {
    let mut d = defs();
    d.insert("12x", "Broken", "Broken");
    let err = TagCatalog::load(&d, &[], CatalogLoadOpts::default()).unwrap_err();
    match err {
        PowerError::UnparsableTagId(raw) => assert_eq!(raw, "12x"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_id_is_skipped_when_configured() {
    let mut d = defs();
    d.insert("", "Empty", "Empty");
    d.insert("-4", "Negative", "Negative");
    let opts = CatalogLoadOpts {
        on_bad_id: BadIdPolicy::Skip,
    };
    let cat = TagCatalog::load(&d, &[], opts).unwrap();
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.id_for("Empty"), None);
    assert_eq!(cat.id_for("Negative"), None);
}

#[test]
fn duplicate_name_is_rejected() {
    let mut d = defs();
    d.insert("5", "Cooldown", "Cooldown2");
    let err = TagCatalog::load(&d, &[], CatalogLoadOpts::default()).unwrap_err();
    assert!(matches!(err, PowerError::DuplicateTagName { .. }));
}

#[test]
fn same_id_spelled_twice_keeps_last_name() {
    let mut d = TagDefinitions::default();
    d.insert("007", "Old", "OLD");
    d.insert("7", "New", "NEW");
    let cat = TagCatalog::load(&d, &[], CatalogLoadOpts::default()).unwrap();
    assert_eq!(cat.name_for(7), Some("New"));
    assert_eq!(cat.id_for("New"), Some(7));
    assert_eq!(cat.id_for("Old"), None);
}

#[test]
fn later_balance_family_wins() {
    let rows = [row("Fire", 1.0), row("Cold", 3.0), row("Fire", 5.0)];
    let cat = TagCatalog::load(&defs(), &rows, CatalogLoadOpts::default()).unwrap();
    assert_eq!(cat.formula_default("Fire", 0), Some(5.0));
    assert_eq!(cat.formula_default("Fire", FORMULA_PARAM_COUNT - 1), Some(10.0));
    assert_eq!(cat.formula_default("Cold", 0), Some(3.0));
    assert_eq!(cat.formula_default("Cold", FORMULA_PARAM_COUNT), None);
    assert!(cat.formula_defaults("Lightning").is_none());
}
