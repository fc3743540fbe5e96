use proptest::prelude::*;
use rocketshoes_cart::models::{Cart, CartItem, Product, StockRecord};
use rust_decimal::Decimal;
use std::collections::HashSet;

// Property-based test strategies
prop_compose! {
    fn arb_price()(cents in 1u32..100000) -> Decimal {
        Decimal::from_parts(cents, 0, 0, false, 2)
    }
}

prop_compose! {
    fn arb_amount()(amount in 1u32..100) -> u32 {
        amount
    }
}

prop_compose! {
    fn arb_product(id: u64)(
        title in "[a-zA-Z0-9 ]{3,40}",
        price in arb_price(),
    ) -> Product {
        Product::new(id, title, price, format!("https://cdn.test/{}.jpg", id))
    }
}

prop_compose! {
    fn arb_item(id: u64)(product in arb_product(id), amount in arb_amount()) -> CartItem {
        CartItem::new(product, amount)
    }
}

/// Carts with 1..8 distinct products, in random order
fn arb_cart() -> impl Strategy<Value = Cart> {
    prop::collection::hash_set(1u64..500, 1..8)
        .prop_flat_map(|ids| {
            let items: Vec<_> = ids.into_iter().map(arb_item).collect();
            items
        })
        .prop_map(Cart::from_items)
}

proptest! {
    #[test]
    fn test_removing_keeps_order_of_remaining_items(
        (cart, index) in arb_cart().prop_flat_map(|cart| {
            let len = cart.len();
            (Just(cart), 0..len)
        })
    ) {
        let target = cart.items()[index].id();
        let expected: Vec<_> = cart
            .items()
            .iter()
            .filter(|item| item.id() != target)
            .cloned()
            .collect();

        let mut updated = cart.clone();
        prop_assert!(updated.remove_item(target));
        prop_assert_eq!(updated.items(), expected.as_slice());
        prop_assert!(!updated.remove_item(target));
    }

    #[test]
    fn test_setting_amount_touches_only_that_item(
        (cart, index) in arb_cart().prop_flat_map(|cart| {
            let len = cart.len();
            (Just(cart), 0..len)
        }),
        amount in arb_amount(),
    ) {
        let target = cart.items()[index].id();

        let mut updated = cart.clone();
        prop_assert!(updated.set_amount(target, amount));

        prop_assert_eq!(updated.len(), cart.len());
        for (before, after) in cart.items().iter().zip(updated.items()) {
            prop_assert_eq!(before.id(), after.id());
            prop_assert_eq!(&before.product, &after.product);
            if before.id() == target {
                prop_assert_eq!(after.amount, amount);
            } else {
                prop_assert_eq!(after.amount, before.amount);
            }
        }
    }

    #[test]
    fn test_persisted_blob_restores_the_same_cart(cart in arb_cart()) {
        let blob = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&blob).unwrap();

        prop_assert_eq!(restored, cart);
    }

    #[test]
    fn test_from_items_keeps_first_of_each_product(
        ids in prop::collection::vec(1u64..20, 0..30),
        amounts in prop::collection::vec(0u32..5, 30),
    ) {
        let items: Vec<CartItem> = ids
            .iter()
            .zip(&amounts)
            .map(|(id, amount)| {
                CartItem::new(Product::new(*id, "Tênis", Decimal::ONE, ""), *amount)
            })
            .collect();

        let cart = Cart::from_items(items.clone());

        let mut seen = HashSet::new();
        let expected: Vec<u64> = items
            .iter()
            .filter(|item| item.amount > 0)
            .filter(|item| seen.insert(item.id()))
            .map(|item| item.id())
            .collect();
        let actual: Vec<u64> = cart.items().iter().map(|item| item.id()).collect();

        prop_assert_eq!(actual, expected);
        prop_assert!(cart.items().iter().all(|item| item.amount >= 1));
    }

    #[test]
    fn test_totals_match_items(cart in arb_cart()) {
        let units: u64 = cart.items().iter().map(|item| u64::from(item.amount)).sum();
        let price: Decimal = cart
            .items()
            .iter()
            .map(|item| item.product.price * Decimal::from(item.amount))
            .sum();

        prop_assert_eq!(cart.total_units(), units);
        prop_assert_eq!(cart.total_price(), price);

        let summary = cart.summary();
        prop_assert_eq!(summary.distinct_products, cart.len());
        prop_assert_eq!(summary.total_price, price);
    }

    #[test]
    fn test_stock_covers_exactly_up_to_amount(stock in 0u32..100, requested in 0u32..200) {
        let record = StockRecord::new(1, stock);

        prop_assert_eq!(record.covers(requested), requested <= stock);
        prop_assert_eq!(record.is_available(), stock > 0);
    }
}
