//! Outbound JSON shape of a finalized order.
//!
//! Pins the exact camelCase field names and the number/date formatting a
//! client sees.

use chrono::{NaiveDate, TimeZone, Utc};
use osp_orders::{Order, OrderType};
use osp_portfolio::{AllocationLine, Micros, Quantity};
use osp_schemas::OrderView;
use uuid::Uuid;

fn sample_order() -> Order {
    Order {
        id: Uuid::from_u128(0x1234),
        order_type: OrderType::Sell,
        total_amount: Micros::from_units(100),
        execution_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 6, 15, 0, 0).unwrap(),
        breakdown: vec![
            AllocationLine {
                symbol: "AAPL".into(),
                allocated: Micros::new(33_330_000),
                price: Micros::from_units(3),
                quantity: Quantity::new(11_110_000),
            },
            AllocationLine {
                symbol: "TSLA".into(),
                allocated: Micros::new(66_670_000),
                price: Micros::from_units(100),
                quantity: Quantity::new(667_000),
            },
        ],
    }
}

#[test]
fn order_view_serializes_camel_case() {
    let view = OrderView::from(&sample_order());
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["id"], "00000000-0000-0000-0000-000000001234");
    assert_eq!(json["orderType"], "SELL");
    assert_eq!(json["totalAmount"], 100.0);
    assert_eq!(json["executionDate"], "2024-01-08");
    assert_eq!(json["createdAt"], "2024-01-06T15:00:00.000Z");

    let line = &json["breakdown"][0];
    assert_eq!(line["symbol"], "AAPL");
    assert_eq!(line["allocatedAmount"], 33.33);
    assert_eq!(line["price"], 3.0);
    assert_eq!(line["quantity"], 11.11);

    assert_eq!(json["breakdown"][1]["quantity"], 0.667);
}

#[test]
fn order_view_round_trips_through_json() {
    let view = OrderView::from(&sample_order());
    let text = serde_json::to_string(&view).unwrap();
    let back: OrderView = serde_json::from_str(&text).unwrap();
    assert_eq!(back, view);
}

#[test]
fn breakdown_order_is_preserved() {
    let view = OrderView::from(&sample_order());
    let syms: Vec<&str> = view.breakdown.iter().map(|l| l.symbol.as_str()).collect();
    assert_eq!(syms, ["AAPL", "TSLA"]);
}
