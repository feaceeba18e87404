use crate::shared::*;

/// Seeds for sale and what each harvest fetches.
pub fn populate_shop(catalog: &mut ShopCatalog) {
    let entries: [(&str, i32, i32); 10] = [
        ("Radish Seed", 5, 0),
        ("Carrot Seed", 8, 0),
        ("Tomato Seed", 10, 0),
        ("Pumpkin Seed", 20, 0),
        ("Radish", 0, 10),
        ("Carrot", 0, 12),
        ("Tomato", 0, 15),
        ("Pumpkin", 0, 40),
        ("Grape", 0, 30),
        ("Melon", 0, 50),
    ];
    catalog.items = entries
        .iter()
        .map(|&(name, buy_price, sell_price)| ShopItem {
            item_name: name.to_string(),
            buy_price,
            sell_price,
        })
        .collect();
}
