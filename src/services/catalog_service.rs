use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    cart::{MAX_AMOUNT, format_money},
    dto::catalog::{ItemRequest, MoveDirection, SaveMenuSectionRequest},
    entity::{
        items::{ActiveModel as ItemActive, Column as ItemCol, Entity as Items, Model as ItemModel},
        menu_sections::{
            ActiveModel as SectionActive, Column as SectionCol, Entity as MenuSections,
            Model as SectionModel,
        },
        tabs::{ActiveModel as TabActive, Column as TabCol, Entity as Tabs, Model as TabModel},
    },
    error::{AppError, AppResult},
    models::{Category, Item, MenuSection, Tab},
};

/// Fixed tab count and synthetic name prefix per tabbed category.
pub const TAB_DEFAULTS: [(Category, usize, &str); 2] =
    [(Category::Promo, 10, "Promo"), (Category::Combo, 10, "Combo")];

pub const DEFAULT_MENU_SECTIONS: [&str; 5] =
    ["Extras", "Bebidas", "Hamburguesas", "Pepitos", "Al barril"];

/// Top every tabbed category up to its fixed count and renumber `order` to
/// 1..N, keeping the existing relative order and names. Returns how many
/// tabs were created; a second call creates and rewrites nothing.
pub async fn ensure_default_tabs<C>(db: &C) -> AppResult<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let mut created = 0;
    for (category, target, prefix) in TAB_DEFAULTS {
        created += top_up_tabs(&txn, category, target, prefix).await?;
        renumber_tabs(&txn, category).await?;
    }
    txn.commit().await?;

    if created > 0 {
        tracing::info!(created, "default tabs seeded");
    }
    Ok(created)
}

/// Drop every tab and seed the defaults again. Renames are lost.
pub async fn reset_tabs<C>(db: &C) -> AppResult<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let removed = Tabs::delete_many().exec(&txn).await?.rows_affected;
    ensure_default_tabs(&txn).await?;
    txn.commit().await?;

    tracing::warn!(removed, "tabs reset to defaults");
    Ok(())
}

pub async fn list_tabs_by_category<C>(db: &C, category: Category) -> AppResult<Vec<Tab>>
where
    C: ConnectionTrait + TransactionTrait,
{
    ensure_default_tabs(db).await?;
    stored_tabs(db, category).await
}

/// Tabs as stored, without seeding missing ones.
pub(crate) async fn stored_tabs<C: ConnectionTrait>(
    db: &C,
    category: Category,
) -> AppResult<Vec<Tab>> {
    let tabs = tabs_in_order(db, category)
        .await?
        .into_iter()
        .map(tab_from_entity)
        .collect();
    Ok(tabs)
}

pub async fn rename_tab<C: ConnectionTrait>(db: &C, id: i32, name: &str) -> AppResult<Tab> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("tab name is required".into()));
    }
    let existing = Tabs::find_by_id(id).one(db).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let mut active: TabActive = existing.into();
    active.name = Set(name.to_string());
    let tab = active.update(db).await?;

    tracing::info!(tab_id = tab.id, name = %tab.name, "tab renamed");
    Ok(tab_from_entity(tab))
}

pub(crate) async fn insert_tab<C: ConnectionTrait>(
    db: &C,
    category: Category,
    name: &str,
    order: i32,
) -> AppResult<Tab> {
    let tab = TabActive {
        id: NotSet,
        category: Set(category),
        name: Set(name.to_string()),
        order: Set(order),
    }
    .insert(db)
    .await?;
    Ok(tab_from_entity(tab))
}

async fn tabs_in_order<C: ConnectionTrait>(
    db: &C,
    category: Category,
) -> AppResult<Vec<TabModel>> {
    let tabs = Tabs::find()
        .filter(TabCol::Category.eq(category))
        .order_by_asc(TabCol::Order)
        .order_by_asc(TabCol::Id)
        .all(db)
        .await?;
    Ok(tabs)
}

async fn top_up_tabs<C: ConnectionTrait>(
    db: &C,
    category: Category,
    target: usize,
    prefix: &str,
) -> AppResult<usize> {
    let existing = tabs_in_order(db, category).await?;
    // New tabs go after every existing one, whatever its current number.
    let mut next_order = existing.iter().map(|t| t.order).max().unwrap_or(0);
    let mut created = 0;
    for n in existing.len() + 1..=target {
        next_order += 1;
        insert_tab(db, category, &format!("{prefix} {n}"), next_order).await?;
        created += 1;
    }
    Ok(created)
}

async fn renumber_tabs<C: ConnectionTrait>(db: &C, category: Category) -> AppResult<()> {
    for (idx, tab) in tabs_in_order(db, category).await?.into_iter().enumerate() {
        let order = idx as i32 + 1;
        if tab.order != order {
            let mut active: TabActive = tab.into();
            active.order = Set(order);
            active.update(db).await?;
        }
    }
    Ok(())
}

/// Seed the default sections, only when there are none at all.
pub async fn ensure_default_menu_sections<C>(db: &C) -> AppResult<usize>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    if MenuSections::find().count(&txn).await? > 0 {
        txn.commit().await?;
        return Ok(0);
    }
    for (idx, name) in DEFAULT_MENU_SECTIONS.iter().enumerate() {
        insert_menu_section(&txn, name, idx as i32 + 1, true).await?;
    }
    txn.commit().await?;

    tracing::info!(created = DEFAULT_MENU_SECTIONS.len(), "default menu sections seeded");
    Ok(DEFAULT_MENU_SECTIONS.len())
}

/// All sections by `order`, disabled ones included.
pub async fn list_menu_sections<C>(db: &C) -> AppResult<Vec<MenuSection>>
where
    C: ConnectionTrait + TransactionTrait,
{
    ensure_default_menu_sections(db).await?;
    stored_menu_sections(db).await
}

pub(crate) async fn stored_menu_sections<C: ConnectionTrait>(db: &C) -> AppResult<Vec<MenuSection>> {
    let sections = sections_in_order(db)
        .await?
        .into_iter()
        .map(section_from_entity)
        .collect();
    Ok(sections)
}

/// Append a new enabled section after the last one.
pub async fn add_menu_section<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<MenuSection> {
    let name = required_section_name(name)?;
    let last = MenuSections::find()
        .order_by_desc(SectionCol::Order)
        .one(db)
        .await?;
    let order = last.map(|s| s.order + 1).unwrap_or(1);
    let section = insert_menu_section(db, &name, order, true).await?;

    tracing::info!(section_id = section.id, name = %section.name, "menu section added");
    Ok(section)
}

/// Upsert by id. The caller owns `order` uniqueness.
pub async fn save_menu_section<C: ConnectionTrait>(
    db: &C,
    id: i32,
    payload: SaveMenuSectionRequest,
) -> AppResult<MenuSection> {
    let name = required_section_name(&payload.name)?;
    let existing = MenuSections::find_by_id(id).one(db).await?;
    let section = match existing {
        Some(section) => {
            let mut active: SectionActive = section.into();
            active.name = Set(name);
            active.order = Set(payload.order);
            active.enabled = Set(payload.enabled);
            active.update(db).await?
        }
        None => {
            SectionActive {
                id: Set(id),
                name: Set(name),
                order: Set(payload.order),
                enabled: Set(payload.enabled),
            }
            .insert(db)
            .await?
        }
    };
    Ok(section_from_entity(section))
}

/// Hard delete; items keep their section name.
pub async fn delete_menu_section<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = MenuSections::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Swap `order` with the neighbour in sort position. Moving past either
/// end changes nothing.
pub async fn move_menu_section<C>(
    db: &C,
    id: i32,
    direction: MoveDirection,
) -> AppResult<Vec<MenuSection>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let sections = sections_in_order(&txn).await?;
    let pos = sections
        .iter()
        .position(|s| s.id == id)
        .ok_or(AppError::NotFound)?;
    let neighbour = match direction {
        MoveDirection::Up => pos.checked_sub(1),
        MoveDirection::Down => Some(pos + 1).filter(|&next| next < sections.len()),
    };

    if let Some(other) = neighbour {
        let a = sections[pos].clone();
        let b = sections[other].clone();
        let (a_order, b_order) = (a.order, b.order);

        let mut a: SectionActive = a.into();
        a.order = Set(b_order);
        a.update(&txn).await?;

        let mut b: SectionActive = b.into();
        b.order = Set(a_order);
        b.update(&txn).await?;
    }

    let sections = sections_in_order(&txn)
        .await?
        .into_iter()
        .map(section_from_entity)
        .collect();
    txn.commit().await?;
    Ok(sections)
}

pub(crate) async fn insert_menu_section<C: ConnectionTrait>(
    db: &C,
    name: &str,
    order: i32,
    enabled: bool,
) -> AppResult<MenuSection> {
    let section = SectionActive {
        id: NotSet,
        name: Set(name.to_string()),
        order: Set(order),
        enabled: Set(enabled),
    }
    .insert(db)
    .await?;
    Ok(section_from_entity(section))
}

async fn sections_in_order<C: ConnectionTrait>(db: &C) -> AppResult<Vec<SectionModel>> {
    let sections = MenuSections::find()
        .order_by_asc(SectionCol::Order)
        .order_by_asc(SectionCol::Id)
        .all(db)
        .await?;
    Ok(sections)
}

fn required_section_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("section name is required".into()));
    }
    Ok(name.to_string())
}

pub async fn add_item<C>(db: &C, payload: ItemRequest) -> AppResult<Item>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    ensure_references_seeded(&txn, payload.category).await?;
    let payload = validate_item(&txn, payload).await?;

    let item = ItemActive {
        id: NotSet,
        category: Set(payload.category),
        name: Set(payload.name),
        price: Set(payload.price),
        description: Set(payload.description),
        img_blob_id: Set(payload.img_blob_id),
        created_at: Set(Utc::now().into()),
        tab_id: Set(payload.tab_id),
        menu_section: Set(payload.menu_section),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(item_id = item.id, category = item.category.as_str(), "item added");
    Ok(item_from_entity(item))
}

/// Replace every editable field of an item; `created_at` is kept.
pub async fn update_item<C>(db: &C, id: i32, payload: ItemRequest) -> AppResult<Item>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let existing = Items::find_by_id(id).one(&txn).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    ensure_references_seeded(&txn, payload.category).await?;
    let payload = validate_item(&txn, payload).await?;

    let mut active: ItemActive = existing.into();
    active.category = Set(payload.category);
    active.name = Set(payload.name);
    active.price = Set(payload.price);
    active.description = Set(payload.description);
    active.img_blob_id = Set(payload.img_blob_id);
    active.tab_id = Set(payload.tab_id);
    active.menu_section = Set(payload.menu_section);
    let item = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(item_id = item.id, "item updated");
    Ok(item_from_entity(item))
}

/// Hard delete. The image blob stays; see `collect_unreferenced_blobs`.
pub async fn delete_item<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = Items::delete_by_id(id).exec(db).await?;
    if result.rows_affected > 0 {
        tracing::info!(item_id = id, "item deleted");
    }
    Ok(result.rows_affected > 0)
}

pub async fn get_item<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Item> {
    let result = Items::find_by_id(id).one(db).await?.map(item_from_entity);
    match result {
        Some(item) => Ok(item),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_all_items<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Item>> {
    list_items_where(db, Condition::all()).await
}

pub async fn list_items_by_category<C: ConnectionTrait>(
    db: &C,
    category: Category,
) -> AppResult<Vec<Item>> {
    list_items_where(db, Condition::all().add(ItemCol::Category.eq(category))).await
}

pub async fn list_items_by_tab<C: ConnectionTrait>(db: &C, tab_id: i32) -> AppResult<Vec<Item>> {
    list_items_where(db, Condition::all().add(ItemCol::TabId.eq(tab_id))).await
}

pub async fn list_items_by_section<C: ConnectionTrait>(
    db: &C,
    section: &str,
) -> AppResult<Vec<Item>> {
    let condition = Condition::all()
        .add(ItemCol::Category.eq(Category::Menu))
        .add(ItemCol::MenuSection.eq(section));
    list_items_where(db, condition).await
}

/// Case-insensitive substring match on name or description. Folding
/// happens here rather than in SQL, where `LIKE` only folds ASCII and
/// reads `%` and `_` as wildcards.
pub async fn search_items<C: ConnectionTrait>(db: &C, term: &str) -> AppResult<Vec<Item>> {
    let term = term.trim().to_lowercase();
    let mut items = list_all_items(db).await?;
    if term.is_empty() {
        return Ok(items);
    }
    items.retain(|item| {
        item.name.to_lowercase().contains(&term) || item.description.to_lowercase().contains(&term)
    });
    Ok(items)
}

/// Raw insert used by backup restore: no reference checks, fresh id.
pub(crate) async fn insert_item_record<C: ConnectionTrait>(db: &C, item: Item) -> AppResult<Item> {
    let item = ItemActive {
        id: NotSet,
        category: Set(item.category),
        name: Set(item.name),
        price: Set(item.price),
        description: Set(item.description),
        img_blob_id: Set(item.img_blob_id),
        created_at: Set(item.created_at.into()),
        tab_id: Set(item.tab_id),
        menu_section: Set(item.menu_section),
    }
    .insert(db)
    .await?;
    Ok(item_from_entity(item))
}

async fn list_items_where<C: ConnectionTrait>(db: &C, condition: Condition) -> AppResult<Vec<Item>> {
    let items = Items::find()
        .filter(condition)
        .order_by_asc(ItemCol::Id)
        .all(db)
        .await?
        .into_iter()
        .map(item_from_entity)
        .collect();
    Ok(items)
}

async fn ensure_references_seeded<C>(db: &C, category: Category) -> AppResult<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    if category.uses_tabs() {
        ensure_default_tabs(db).await?;
    } else {
        ensure_default_menu_sections(db).await?;
    }
    Ok(())
}

/// Check the whole request before anything is written and return it
/// normalized (trimmed text, empty strings as `None`).
async fn validate_item<C: ConnectionTrait>(db: &C, payload: ItemRequest) -> AppResult<ItemRequest> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.price <= 0 {
        return Err(AppError::Validation("price must be greater than 0".into()));
    }
    if payload.price > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "price must not exceed {}",
            format_money(MAX_AMOUNT)
        )));
    }
    let menu_section = payload
        .menu_section
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let img_blob_id = payload
        .img_blob_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let category = payload.category;
    if category.uses_tabs() {
        if menu_section.is_some() {
            return Err(AppError::Validation(format!(
                "{} items take a tab, not a menu section",
                category.as_str()
            )));
        }
        let tab_id = payload.tab_id.ok_or_else(|| {
            AppError::Validation(format!("tab_id is required for {} items", category.as_str()))
        })?;
        let tab = Tabs::find_by_id(tab_id).one(db).await?;
        if tab.is_none_or(|t| t.category != category) {
            return Err(AppError::Validation(format!(
                "tab {tab_id} does not exist in {}",
                category.as_str()
            )));
        }
    } else {
        if payload.tab_id.is_some() {
            return Err(AppError::Validation(
                "menu items take a menu section, not a tab".into(),
            ));
        }
        let section = menu_section
            .as_deref()
            .ok_or_else(|| AppError::Validation("menu_section is required for menu items".into()))?;
        let found = MenuSections::find()
            .filter(SectionCol::Name.eq(section))
            .one(db)
            .await?;
        if found.is_none() {
            return Err(AppError::Validation(format!(
                "menu section {section} does not exist"
            )));
        }
    }

    Ok(ItemRequest {
        category,
        name,
        price: payload.price,
        description: payload.description.trim().to_string(),
        img_blob_id,
        tab_id: payload.tab_id,
        menu_section,
    })
}

fn item_from_entity(model: ItemModel) -> Item {
    Item {
        id: model.id,
        category: model.category,
        name: model.name,
        price: model.price,
        description: model.description,
        img_blob_id: model.img_blob_id,
        created_at: model.created_at.with_timezone(&Utc),
        tab_id: model.tab_id,
        menu_section: model.menu_section,
    }
}

fn tab_from_entity(model: TabModel) -> Tab {
    Tab {
        id: model.id,
        category: model.category,
        name: model.name,
        order: model.order,
    }
}

fn section_from_entity(model: SectionModel) -> MenuSection {
    MenuSection {
        id: model.id,
        name: model.name,
        order: model.order,
        enabled: model.enabled,
    }
}
