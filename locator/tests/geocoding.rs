use venuekit_geocode::Address;
use venuekit_locator::{UNKNOWN_CITY, resolve_city};

fn named(field: &str, value: &str) -> Address {
    let mut address = Address::default();
    let slot = match field {
        "city" => &mut address.city,
        "district" => &mut address.district,
        "subregion" => &mut address.subregion,
        "name" => &mut address.name,
        "postal_code" => &mut address.postal_code,
        _ => unreachable!(),
    };
    *slot = Some(value.to_owned());
    address
}

#[test]
fn city_wins_over_everything() {
    let address = Address {
        city: Some("Mumbai".into()),
        district: Some("Andheri".into()),
        subregion: Some("Mumbai Suburban".into()),
        name: Some("Lokhandwala".into()),
        postal_code: Some("400053".into()),
        ..Address::default()
    };
    assert_eq!(resolve_city(&address), "Mumbai");
}

#[test]
fn each_field_is_a_fallback() {
    for (field, value) in [
        ("district", "Andheri"),
        ("subregion", "Mumbai Suburban"),
        ("name", "Lokhandwala"),
        ("postal_code", "400053"),
    ] {
        assert_eq!(resolve_city(&named(field, value)), value, "{field}");
    }
}

#[test]
fn blank_fields_are_skipped() {
    let address = Address {
        city: Some(String::new()),
        district: Some("  ".into()),
        subregion: Some("Thane".into()),
        ..Address::default()
    };
    assert_eq!(resolve_city(&address), "Thane");
}

#[test]
fn empty_address_is_unknown() {
    assert_eq!(resolve_city(&Address::default()), UNKNOWN_CITY);
    assert_eq!(UNKNOWN_CITY, "Unknown");
}
