use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::{CartLine, CartState, CartView, CouponSnapshot},
    dto::{
        backup::{BackupBlob, BackupDocument, BackupTabs, ImportSummary},
        cart::{AddToCartRequest, ApplyCouponRequest, CheckoutLink},
        catalog::{
            ItemList, ItemRequest, MenuSectionList, MoveDirection, MoveMenuSectionRequest,
            NewMenuSectionRequest, RenameTabRequest, SaveMenuSectionRequest, TabList,
        },
        coupons::{CouponList, CouponRequest},
        settings::{BlobCollection, IngestedImage, SettingsRequest, ThemeRequest},
    },
    middleware::admin_gate::ADMIN_PIN_HEADER,
    models::{Category, Coupon, Item, MenuSection, Settings, Tab, Theme},
    response::{ApiResponse, Meta},
    routes::{admin, cart, catalog, coupons, health::{self, HealthData}, media, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_pin",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_PIN_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_items,
        catalog::get_item,
        catalog::add_item,
        catalog::update_item,
        catalog::delete_item,
        catalog::list_tabs,
        catalog::rename_tab,
        catalog::reset_tabs,
        catalog::list_sections,
        catalog::add_section,
        catalog::save_section,
        catalog::delete_section,
        catalog::move_section,
        coupons::list_coupons,
        coupons::add_coupon,
        coupons::delete_coupon,
        cart::view_cart,
        cart::clear_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::increment_line,
        cart::decrement_line,
        cart::apply_coupon,
        cart::clear_coupon,
        orders::checkout,
        admin::get_theme,
        admin::save_theme,
        admin::get_settings,
        admin::save_settings,
        admin::export_backup,
        admin::import_backup,
        admin::collect_blobs,
        media::upload_image,
        media::get_blob
    ),
    components(
        schemas(
            Category,
            Item,
            Tab,
            MenuSection,
            Coupon,
            Theme,
            Settings,
            CartLine,
            CartState,
            CartView,
            CouponSnapshot,
            ItemRequest,
            ItemList,
            TabList,
            MenuSectionList,
            RenameTabRequest,
            NewMenuSectionRequest,
            SaveMenuSectionRequest,
            MoveDirection,
            MoveMenuSectionRequest,
            CouponRequest,
            CouponList,
            AddToCartRequest,
            ApplyCouponRequest,
            CheckoutLink,
            ThemeRequest,
            SettingsRequest,
            IngestedImage,
            BlobCollection,
            BackupDocument,
            BackupTabs,
            BackupBlob,
            ImportSummary,
            params::ItemQuery,
            params::TabQuery,
            params::ImageQuery,
            HealthData,
            Meta,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutLink>,
            ApiResponse<ImportSummary>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Items, tabs and menu sections"),
        (name = "Coupons", description = "Coupon administration"),
        (name = "Cart", description = "The customer's cart"),
        (name = "Orders", description = "Order handoff"),
        (name = "Admin", description = "Theme, settings, backup and blob maintenance"),
        (name = "Media", description = "Image upload and blob download"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
