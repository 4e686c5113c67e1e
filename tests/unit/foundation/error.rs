use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TryOnError::ProductNotFound { product_id: 7 }
            .to_string()
            .contains("product not found: id 7")
    );
    assert!(
        TryOnError::invalid_person("x")
            .to_string()
            .contains("invalid person image:")
    );
    assert!(
        TryOnError::invalid_product("x")
            .to_string()
            .contains("invalid product image:")
    );
    assert!(
        TryOnError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn public_messages_match_wire_contract() {
    assert_eq!(
        TryOnError::ProductNotFound { product_id: 9999 }
            .public_message()
            .as_deref(),
        Some("Product not found")
    );
    assert_eq!(
        TryOnError::ProductImageMissing {
            reference: "dress1.png".to_string()
        }
        .public_message()
        .as_deref(),
        Some("Product image file not found on server")
    );
    assert_eq!(
        TryOnError::invalid_person("bad magic").public_message().as_deref(),
        Some("Invalid person image")
    );
    assert_eq!(
        TryOnError::invalid_product("truncated").public_message().as_deref(),
        Some("Invalid product image")
    );
}

#[test]
fn storage_errors_are_not_request_errors() {
    let base = std::io::Error::other("disk full");
    let err = TryOnError::Storage(anyhow::Error::new(base));
    assert!(!err.is_request_error());
    assert!(err.public_message().is_none());
    assert!(err.to_string().contains("disk full"));

    assert!(TryOnError::invalid_person("x").is_request_error());
}
