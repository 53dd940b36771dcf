use super::*;

#[test]
fn lang_code_round_trip() {
    let en = lc_from_str("en");
    assert_eq!(en, 0x656E);
    assert_eq!(lc_to_string(en), "en");

    let hans = lc_from_str("hans");
    assert_eq!(lc_to_string(hans), "hans");
}

#[test]
fn fields_start_on_tab_zero() {
    let mut fields = RomFields::new();
    fields.add_string("Title", "GAME");
    assert_eq!(fields.get(0).unwrap().tab_idx, 0);
    assert_eq!(fields.tab_count(), 1);
}

#[test]
fn tab_indices_are_consecutive() {
    let mut fields = RomFields::new();
    fields.add_tab("General");
    fields.add_string("Title", "GAME");
    fields.add_tab("Extra");
    fields.add_string("Region", "USA");

    assert_eq!(fields.get(0).unwrap().tab_idx, 0);
    assert_eq!(fields.get(1).unwrap().tab_idx, 1);
    assert_eq!(fields.tab_count(), 2);
    assert_eq!(fields.tab_name(0), Some("General"));
    assert_eq!(fields.tab_name(1), Some("Extra"));
}

#[test]
fn count_tracks_appends() {
    let mut fields = RomFields::new();
    assert_eq!(fields.count(), 0);
    fields.add_string("A", "1");
    fields.add_dimensions("Size", [384, 247, 0]);
    assert_eq!(fields.count(), 2);
}

#[test]
fn string_multi_with_default_is_valid() {
    let mut fields = RomFields::new();
    fields.set_default_language(lc_from_str("en"));
    let mut variants = std::collections::BTreeMap::new();
    variants.insert(lc_from_str("en"), "Hello".to_string());
    variants.insert(lc_from_str("ja"), "こんにちは".to_string());
    fields.add_string_multi("Name", variants);
    assert!(fields.get(0).unwrap().is_valid);
}

#[test]
#[should_panic(expected = "missing the default language variant")]
fn string_multi_without_default_asserts() {
    let mut fields = RomFields::new();
    fields.set_default_language(lc_from_str("en"));
    let mut variants = std::collections::BTreeMap::new();
    variants.insert(lc_from_str("ja"), "こんにちは".to_string());
    fields.add_string_multi("Name", variants);
}

#[test]
fn select_variant_prefers_user_language() {
    let mut map = std::collections::BTreeMap::new();
    map.insert(lc_from_str("en"), "en-text".to_string());
    map.insert(lc_from_str("de"), "de-text".to_string());

    let en = lc_from_str("en");
    let de = lc_from_str("de");
    let fr = lc_from_str("fr");

    assert_eq!(select_variant(&map, en, de).unwrap(), "de-text");
    // Unknown user language falls back to the default.
    assert_eq!(select_variant(&map, en, fr).unwrap(), "en-text");
    // Unknown default falls back to the first available variant.
    assert_eq!(select_variant(&map, fr, fr).unwrap(), "de-text");
}
