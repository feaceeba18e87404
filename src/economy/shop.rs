use bevy::prelude::*;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Processes BuyRequestEvents: only seeds are for sale, paid from the wallet.
pub fn handle_buy(
    mut buy_events: EventReader<BuyRequestEvent>,
    catalog: Res<ShopCatalog>,
    mut wallet: Option<ResMut<Wallet>>,
    mut inventory: Option<ResMut<Inventory>>,
) {
    for ev in buy_events.read() {
        let name = ev.item_name.trim();
        let Some(item) = catalog.get(name).filter(|item| is_seed_name(&item.item_name)) else {
            warn!("[Shop] Buy failed, '{}' is not a seed on sale", name);
            continue;
        };
        let (Some(wallet), Some(inventory)) = (wallet.as_deref_mut(), inventory.as_deref_mut())
        else {
            warn!("[Shop] No wallet or inventory here, cannot buy {}", name);
            continue;
        };

        if !wallet.try_spend(item.buy_price) {
            info!("[Shop] Not enough money to buy {}", name);
            continue;
        }
        inventory.add_item(name);
        info!(
            "[Shop] Bought {} for {} ({} left)",
            name,
            item.buy_price,
            wallet.balance()
        );
    }
}

/// Processes SellRequestEvents: one harvest at a time, seeds never.
pub fn handle_sell(
    mut sell_events: EventReader<SellRequestEvent>,
    catalog: Res<ShopCatalog>,
    mut wallet: Option<ResMut<Wallet>>,
    mut inventory: Option<ResMut<Inventory>>,
) {
    for ev in sell_events.read() {
        let name = ev.item_name.trim();
        if is_seed_name(name) {
            info!("[Shop] Selling seeds is not allowed");
            continue;
        }
        let Some(item) = catalog.get(name) else {
            warn!("[Shop] Sell failed, no price for '{}'", name);
            continue;
        };
        let (Some(wallet), Some(inventory)) = (wallet.as_deref_mut(), inventory.as_deref_mut())
        else {
            warn!("[Shop] No wallet or inventory here, cannot sell {}", name);
            continue;
        };

        if inventory.try_remove_harvest(name) {
            wallet.add(item.sell_price);
            info!("[Shop] Sold {} for {}", name, item.sell_price);
        }
    }
}
