use grill_storefront::{error::AppError, middleware::admin_gate::check_pin};

#[test]
fn open_when_no_pin_is_configured() {
    assert!(check_pin(None, None).is_ok());
    assert!(check_pin(None, Some("anything")).is_ok());
}

#[test]
fn configured_pin_must_match() {
    assert!(check_pin(Some("4321"), Some("4321")).is_ok());
    assert!(check_pin(Some("4321"), Some(" 4321 ")).is_ok());
    assert!(matches!(
        check_pin(Some("4321"), Some("1234")),
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        check_pin(Some("4321"), None),
        Err(AppError::BadRequest(_))
    ));
}
