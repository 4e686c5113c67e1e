use super::*;

#[test]
fn seeded_catalog_has_four_products() {
    let c = Catalog::seeded();
    assert_eq!(c.len(), 4);
    let shirt = c.get(3).unwrap();
    assert_eq!(shirt.name, "Casual Shirt");
    assert_eq!(shirt.image_name, "shirt1.png.jfif");
    assert_eq!(shirt.price_minor, 129_900);
    assert!(c.get(9999).is_none());
}

#[test]
fn list_filters_by_gender_and_keeps_unisex() {
    let c = Catalog::seeded();
    let ids = |g| c.list(g).iter().map(|p| p.id).collect::<Vec<_>>();
    assert_eq!(ids(None), vec![1, 2, 3, 4]);
    assert_eq!(ids(Some(Gender::Female)), vec![1, 2, 4]);
    assert_eq!(ids(Some(Gender::Male)), vec![3, 4]);
    assert_eq!(ids(Some(Gender::Unisex)), vec![4]);
}

#[test]
fn gender_parses_case_insensitively() {
    assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
    assert_eq!(" male ".parse::<Gender>().unwrap(), Gender::Male);
    assert!("other".parse::<Gender>().is_err());
}

#[test]
fn from_reader_parses_json_and_rejects_duplicates() {
    let json = r#"[
        {"id": 10, "name": "Scarf", "image_name": "scarf.png", "price_minor": 50000, "gender": "unisex"}
    ]"#;
    let c = Catalog::from_reader(json.as_bytes()).unwrap();
    assert_eq!(c.get(10).unwrap().gender, Gender::Unisex);

    let dup = r#"[
        {"id": 1, "name": "A", "image_name": "a.png", "price_minor": 1, "gender": "male"},
        {"id": 1, "name": "B", "image_name": "b.png", "price_minor": 2, "gender": "female"}
    ]"#;
    assert!(matches!(
        Catalog::from_reader(dup.as_bytes()),
        Err(TryOnError::Validation(_))
    ));
    assert!(Catalog::from_reader("{".as_bytes()).is_err());
}

#[test]
fn product_serializes_gender_lowercase() {
    let c = Catalog::seeded();
    let v = serde_json::to_value(c.get(4).unwrap()).unwrap();
    assert_eq!(v["gender"], "unisex");
    assert_eq!(v["image_name"], "tshirt1.png");
}
