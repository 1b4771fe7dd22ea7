use chrono::{Duration, Utc};
use grill_storefront::{
    cart::{CartLine, CartState, CouponRejection, CouponSnapshot, MAX_AMOUNT},
    db,
    dto::{catalog::ItemRequest, coupons::CouponRequest},
    error::AppError,
    models::{Category, Item, Settings},
    services::{
        cart_service::{self, CartSession},
        catalog_service, coupon_service, order_service,
    },
};
use sea_orm::DatabaseConnection;

async fn store() -> anyhow::Result<DatabaseConnection> {
    Ok(db::open("sqlite::memory:").await?)
}

async fn menu_item(orm: &DatabaseConnection, name: &str, price: i64) -> anyhow::Result<Item> {
    let item = catalog_service::add_item(
        orm,
        ItemRequest {
            category: Category::Menu,
            name: name.into(),
            price,
            description: String::new(),
            img_blob_id: None,
            tab_id: None,
            menu_section: Some("Hamburguesas".into()),
        },
    )
    .await?;
    Ok(item)
}

fn coupon(code: &str, percent: i32, amount: i64, min_subtotal: i64) -> CouponRequest {
    CouponRequest {
        code: code.into(),
        percent,
        amount,
        min_subtotal,
        expires_at: None,
    }
}

#[tokio::test]
async fn coupon_codes_are_normalized_and_unique() -> anyhow::Result<()> {
    let orm = store().await?;

    let created = coupon_service::add_coupon(&orm, coupon(" save10 ", 10, 0, 0)).await?;
    assert_eq!(created.code, "SAVE10");

    let duplicate = coupon_service::add_coupon(&orm, coupon("Save10", 5, 0, 0)).await;
    assert!(matches!(duplicate, Err(AppError::DuplicateCode(code)) if code == "SAVE10"));

    let found = coupon_service::find_coupon_by_code(&orm, "  save10").await?;
    assert_eq!(found.map(|c| c.id), Some(created.id));
    assert!(coupon_service::find_coupon_by_code(&orm, "OTHER").await?.is_none());
    assert!(coupon_service::find_coupon_by_code(&orm, "  ").await?.is_none());

    assert_eq!(coupon_service::list_coupons(&orm).await?.len(), 1);
    assert!(coupon_service::delete_coupon(&orm, created.id).await?);
    assert!(!coupon_service::delete_coupon(&orm, created.id).await?);
    Ok(())
}

#[tokio::test]
async fn invalid_coupons_are_rejected() -> anyhow::Result<()> {
    let orm = store().await?;
    for request in [
        coupon("", 10, 0, 0),
        coupon("BIG", 101, 0, 0),
        coupon("NEG", -1, 0, 0),
        coupon("FLAT", 0, -100, 0),
        coupon("MIN", 10, 0, -1),
        coupon("HUGE", 0, MAX_AMOUNT + 1, 0),
        coupon("HUGEMIN", 10, 0, MAX_AMOUNT + 1),
    ] {
        let result = coupon_service::add_coupon(&orm, request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert!(coupon_service::list_coupons(&orm).await?.is_empty());
    Ok(())
}

#[test]
fn discount_combines_percent_and_amount_and_is_capped() {
    let snapshot = CouponSnapshot {
        code: "MIX".into(),
        percent: 10,
        amount: 500,
        min_subtotal: 0,
        expires_at: None,
    };
    assert_eq!(snapshot.discount_for(10_000), 1_500);
    assert_eq!(snapshot.discount_for(400), 400);

    let rounding = CouponSnapshot {
        percent: 15,
        amount: 0,
        ..snapshot
    };
    // 15% of $3.33 is 49.95 cents.
    assert_eq!(rounding.discount_for(333), 50);
}

#[test]
fn oversized_carts_saturate_instead_of_overflowing() {
    let line = CartLine {
        item_id: 1,
        name: "Restored from an old backup".into(),
        price: i64::MAX / 2 + 1,
        qty: 2,
    };
    let mut cart = CartState {
        lines: vec![line.clone(), CartLine { item_id: 2, qty: i32::MAX, ..line }],
        coupon: Some(CouponSnapshot {
            code: "ALL".into(),
            percent: 100,
            amount: i64::MAX,
            min_subtotal: 0,
            expires_at: None,
        }),
    };
    assert!(cart.increment(2));
    assert_eq!(cart.item_count(), i32::MAX);
    assert_eq!(cart.subtotal(), i64::MAX);
    assert_eq!(cart.discount_amount(), i64::MAX);
    assert_eq!(cart.total(), 0);
}

#[tokio::test]
async fn applied_coupon_discounts_the_total() -> anyhow::Result<()> {
    let orm = store().await?;
    let burger = menu_item(&orm, "Burger", 10_000).await?;
    coupon_service::add_coupon(&orm, coupon("MIX", 10, 500, 0)).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(burger.id).await?;
    let snapshot = cart.apply_coupon("mix").await?;
    assert_eq!(snapshot.code, "MIX");

    let view = cart.view();
    assert_eq!(view.subtotal, 10_000);
    assert_eq!(view.discount, 1_500);
    assert_eq!(view.total, 8_500);
    Ok(())
}

#[tokio::test]
async fn flat_discount_never_goes_below_zero() -> anyhow::Result<()> {
    let orm = store().await?;
    let soda = menu_item(&orm, "Soda", 1_000).await?;
    coupon_service::add_coupon(&orm, coupon("BIGFLAT", 50, 5_000, 0)).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(soda.id).await?;
    cart.apply_coupon("BIGFLAT").await?;

    let view = cart.view();
    assert_eq!(view.discount, 1_000);
    assert_eq!(view.total, 0);
    Ok(())
}

#[tokio::test]
async fn rejected_coupons_leave_the_cart_unchanged() -> anyhow::Result<()> {
    let orm = store().await?;
    let soda = menu_item(&orm, "Soda", 2_000).await?;
    coupon_service::add_coupon(&orm, coupon("MIN50", 10, 0, 5_000)).await?;
    coupon_service::add_coupon(&orm, coupon("ZERO", 0, 0, 0)).await?;
    coupon_service::add_coupon(
        &orm,
        CouponRequest {
            expires_at: Some(Utc::now() - Duration::days(1)),
            ..coupon("OLD", 10, 0, 0)
        },
    )
    .await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(soda.id).await?;
    let before = cart.state().clone();

    let below = cart.apply_coupon("MIN50").await;
    assert!(matches!(
        below,
        Err(AppError::CouponRejected(CouponRejection::BelowMinimum { min_subtotal: 5_000 }))
    ));
    let zero = cart.apply_coupon("ZERO").await;
    assert!(matches!(
        zero,
        Err(AppError::CouponRejected(CouponRejection::NoDiscount))
    ));
    let expired = cart.apply_coupon("OLD").await;
    assert!(matches!(
        expired,
        Err(AppError::CouponRejected(CouponRejection::Expired))
    ));
    let unknown = cart.apply_coupon("NOPE").await;
    assert!(matches!(
        unknown,
        Err(AppError::CouponRejected(CouponRejection::NotFound))
    ));

    assert_eq!(cart.state(), &before);
    assert_eq!(cart_service::load_cart(&orm).await?, before);
    Ok(())
}

#[tokio::test]
async fn quantities_adjust_and_lines_drop_at_zero() -> anyhow::Result<()> {
    let orm = store().await?;
    let burger = menu_item(&orm, "Burger", 650).await?;
    let fries = menu_item(&orm, "Fries", 300).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(burger.id).await?;
    cart.add_item(burger.id).await?;
    cart.add_item(fries.id).await?;
    assert_eq!(cart.state().lines.len(), 2);
    assert_eq!(cart.view().item_count, 3);
    assert_eq!(cart.view().subtotal, 1_600);

    assert!(cart.increment(fries.id).await?);
    assert!(cart.decrement(burger.id).await?);
    assert!(cart.decrement(burger.id).await?);
    assert!(cart.state().line(burger.id).is_none());
    assert!(!cart.decrement(burger.id).await?);
    assert!(!cart.increment(burger.id).await?);
    assert_eq!(cart.state().line(fries.id).map(|l| l.qty), Some(2));

    assert!(cart.remove(fries.id).await?);
    assert!(!cart.remove(fries.id).await?);
    assert!(cart.state().is_empty());

    let missing = cart.add_item(9_999).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn cart_persists_and_keeps_snapshots() -> anyhow::Result<()> {
    let orm = store().await?;
    let burger = menu_item(&orm, "Burger", 10_000).await?;
    let save = coupon_service::add_coupon(&orm, coupon("SAVE10", 10, 0, 0)).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(burger.id).await?;
    cart.apply_coupon("SAVE10").await?;

    // Later edits to the catalog and coupons do not reach the cart.
    catalog_service::delete_item(&orm, burger.id).await?;
    coupon_service::delete_coupon(&orm, save.id).await?;

    let restored = CartSession::load(orm.clone()).await?;
    assert_eq!(restored.state(), cart.state());
    let view = restored.view();
    assert_eq!(view.lines[0].name, "Burger");
    assert_eq!(view.lines[0].price, 10_000);
    assert_eq!(view.discount, 1_000);
    assert_eq!(view.total, 9_000);

    cart.clear_coupon().await?;
    assert!(cart_service::load_cart(&orm).await?.coupon.is_none());
    cart.clear().await?;
    assert_eq!(cart_service::load_cart(&orm).await?, CartState::default());
    Ok(())
}

#[tokio::test]
async fn subscribers_see_every_change() -> anyhow::Result<()> {
    let orm = store().await?;
    let burger = menu_item(&orm, "Burger", 650).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    let mut changes = cart.subscribe();
    assert!(!changes.has_changed()?);

    cart.add_item(burger.id).await?;
    assert!(changes.has_changed()?);
    assert_eq!(changes.borrow_and_update().item_count, 1);

    cart.increment(burger.id).await?;
    assert_eq!(changes.borrow_and_update().subtotal, 1_300);

    cart.clear().await?;
    assert!(changes.borrow_and_update().lines.is_empty());
    Ok(())
}

#[tokio::test]
async fn checkout_builds_message_and_link() -> anyhow::Result<()> {
    let orm = store().await?;
    let burger = menu_item(&orm, "Burger", 650).await?;
    let soda = menu_item(&orm, "Soda", 150).await?;
    coupon_service::add_coupon(&orm, coupon("MIX", 10, 100, 0)).await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(burger.id).await?;
    cart.add_item(burger.id).await?;
    cart.add_item(soda.id).await?;
    cart.apply_coupon("MIX").await?;

    let settings = Settings {
        biz_name: "Grill".into(),
        wa_number: "+58 (412) 555-0101".into(),
    };
    let link = order_service::checkout_link(&settings, cart.state())?;
    assert_eq!(
        link.message,
        "Hello, I'd like to place this order:\n\n\
         • Burger x2 - $13.00\n\
         • Soda x1 - $1.50\n\
         Subtotal: $14.50\n\
         Coupon MIX (10% + $1.00): -$2.45\n\
         Total: $12.05"
    );
    assert!(
        link.url
            .starts_with("https://wa.me/584125550101?text=Hello%2C%20I'd%20like%20to%20place")
    );
    assert!(link.url.contains("%E2%80%A2%20Burger%20x2%20-%20%2413.00%0A"));
    Ok(())
}

#[tokio::test]
async fn checkout_needs_a_number_and_lines() -> anyhow::Result<()> {
    let orm = store().await?;
    let soda = menu_item(&orm, "Soda", 150).await?;
    let mut cart = CartSession::load(orm.clone()).await?;

    let with_number = Settings {
        wa_number: "0412-555".into(),
        ..Settings::default()
    };
    let empty = order_service::checkout_link(&with_number, cart.state());
    assert!(matches!(empty, Err(AppError::Validation(_))));

    cart.add_item(soda.id).await?;
    let no_number = order_service::checkout_link(&Settings::default(), cart.state());
    assert!(matches!(no_number, Err(AppError::Validation(_))));

    let link = order_service::checkout_link(&with_number, cart.state())?;
    assert!(link.url.starts_with("https://wa.me/0412555?text="));
    Ok(())
}

#[test]
fn uri_component_encoding_keeps_unreserved_marks() {
    assert_eq!(order_service::encode_uri_component("a b&c"), "a%20b%26c");
    assert_eq!(order_service::encode_uri_component("(it's)*~!._-"), "(it's)*~!._-");
    assert_eq!(order_service::encode_uri_component("•\n"), "%E2%80%A2%0A");
    assert_eq!(order_service::encode_uri_component("ñ"), "%C3%B1");
}
