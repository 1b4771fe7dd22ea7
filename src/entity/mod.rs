pub mod blobs;
pub mod cart;
pub mod coupons;
pub mod items;
pub mod menu_sections;
pub mod settings;
pub mod tabs;
pub mod theme;

pub use blobs::Entity as Blobs;
pub use cart::Entity as Cart;
pub use coupons::Entity as Coupons;
pub use items::Entity as Items;
pub use menu_sections::Entity as MenuSections;
pub use settings::Entity as Settings;
pub use tabs::Entity as Tabs;
pub use theme::Entity as Theme;
