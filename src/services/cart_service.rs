use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use tokio::sync::watch;

use crate::{
    cart::{CartState, CartView, CouponRejection, CouponSnapshot, evaluate_coupon},
    entity::{Cart, cart},
    error::AppResult,
    models::Item,
    services::{catalog_service, coupon_service},
};

/// The stored cart, or `None` when nothing was ever saved.
pub async fn find_cart<C: ConnectionTrait>(db: &C) -> AppResult<Option<CartState>> {
    let Some(row) = Cart::find_by_id(cart::KEY).one(db).await? else {
        return Ok(None);
    };
    match serde_json::from_value::<CartState>(row.state) {
        Ok(state) => Ok(Some(state)),
        Err(err) => {
            tracing::warn!(error = %err, "stored cart unreadable, starting empty");
            Ok(None)
        }
    }
}

/// The stored cart, or an empty one.
pub async fn load_cart<C: ConnectionTrait>(db: &C) -> AppResult<CartState> {
    Ok(find_cart(db).await?.unwrap_or_default())
}

/// Replace the stored cart with `state`.
pub async fn save_cart<C: ConnectionTrait>(db: &C, state: &CartState) -> AppResult<()> {
    let value = serde_json::to_value(state).map_err(anyhow::Error::from)?;
    let active = cart::ActiveModel {
        id: Set(cart::KEY.to_string()),
        state: Set(value),
    };
    Cart::insert(active)
        .on_conflict(
            OnConflict::column(cart::Column::Id)
                .update_column(cart::Column::State)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// The customer's single cart: an in-memory copy that is written through
/// to the store on every change and broadcast to subscribers afterwards.
pub struct CartSession {
    db: DatabaseConnection,
    state: CartState,
    changes: watch::Sender<CartView>,
}

impl CartSession {
    /// Restore the persisted cart.
    pub async fn load(db: DatabaseConnection) -> AppResult<Self> {
        let state = load_cart(&db).await?;
        let (changes, _) = watch::channel(CartView::from(&state));
        tracing::debug!(lines = state.lines.len(), "cart restored");
        Ok(Self { db, state, changes })
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn view(&self) -> CartView {
        CartView::from(&self.state)
    }

    /// Receives the new view after every committed change.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.changes.subscribe()
    }

    /// Add one unit of a catalog item, snapshotting its current name and price.
    pub async fn add_item(&mut self, item_id: i32) -> AppResult<CartView> {
        let item = catalog_service::get_item(&self.db, item_id).await?;
        self.add(&item).await
    }

    pub async fn add(&mut self, item: &Item) -> AppResult<CartView> {
        let mut next = self.state.clone();
        next.add(item);
        self.commit(next).await?;
        Ok(self.view())
    }

    /// `false` when no line holds the item; nothing is written then.
    pub async fn increment(&mut self, item_id: i32) -> AppResult<bool> {
        let mut next = self.state.clone();
        if !next.increment(item_id) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    /// Removes the line when its quantity drops to zero.
    pub async fn decrement(&mut self, item_id: i32) -> AppResult<bool> {
        let mut next = self.state.clone();
        if !next.decrement(item_id) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    pub async fn remove(&mut self, item_id: i32) -> AppResult<bool> {
        let mut next = self.state.clone();
        if !next.remove(item_id) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    /// Validate the code against the current subtotal and attach a snapshot
    /// of its terms. A rejected code leaves the cart as it was.
    pub async fn apply_coupon(&mut self, code: &str) -> AppResult<CouponSnapshot> {
        let coupon = match coupon_service::find_coupon_by_code(&self.db, code).await? {
            Some(coupon) => coupon,
            None => return Err(CouponRejection::NotFound.into()),
        };
        let snapshot = evaluate_coupon(&coupon, self.state.subtotal(), Utc::now())?;

        let mut next = self.state.clone();
        next.attach_coupon(snapshot.clone());
        self.commit(next).await?;
        tracing::info!(code = %snapshot.code, "coupon applied");
        Ok(snapshot)
    }

    pub async fn clear_coupon(&mut self) -> AppResult<CartView> {
        let mut next = self.state.clone();
        if next.clear_coupon().is_some() {
            self.commit(next).await?;
        }
        Ok(self.view())
    }

    /// Empty the lines and drop the coupon.
    pub async fn clear(&mut self) -> AppResult<CartView> {
        let mut next = self.state.clone();
        next.clear();
        self.commit(next).await?;
        Ok(self.view())
    }

    /// Re-read the store, e.g. after a backup restore replaced the cart.
    pub async fn reload(&mut self) -> AppResult<CartView> {
        self.state = load_cart(&self.db).await?;
        self.changes.send_replace(self.view());
        Ok(self.view())
    }

    async fn commit(&mut self, next: CartState) -> AppResult<()> {
        save_cart(&self.db, &next).await?;
        self.state = next;
        self.changes.send_replace(self.view());
        Ok(())
    }
}
