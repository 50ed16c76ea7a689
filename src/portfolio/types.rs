//! Portfolio backend wire types
//!
//! Field names follow the backend's JSON responses verbatim; every
//! endpoint wraps its payload in a `data` envelope, list endpoints add a
//! `count`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Envelope every backend response arrives in
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Account summary row
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub user_name: String,
    pub email: String,
    pub balance: Decimal,
    #[serde(default)]
    pub investment: Option<Decimal>,
    #[serde(default)]
    pub profit_loss: Option<Decimal>,
}

/// One stock holding
#[derive(Debug, Clone, Deserialize)]
pub struct Holding {
    /// Ticker symbol the backend keys holdings by
    pub stock_id: String,
    /// Display name
    #[serde(default)]
    pub share_name: Option<String>,
    /// Shares held
    pub share_quantity: i64,
    /// Average cost per share
    pub share_value: Decimal,
}

/// Side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TradeSide {
    #[serde(rename = "BUY", alias = "buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell")]
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Buy/sell order submitted to the backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOrder {
    /// Holding row id, when trading out of an existing position
    pub stock_id: Option<i64>,
    pub symbol: String,
    pub quantity: i64,
    pub price: Decimal,
    pub user_id: u64,
}

/// Confirmation for a submitted buy/sell
#[derive(Debug, Clone, Deserialize)]
pub struct TradeReceipt {
    pub message: String,
    pub transaction: ExecutedTrade,
}

/// The executed side of a trade receipt
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedTrade {
    #[serde(rename = "type")]
    pub side: TradeSide,
    pub symbol: String,
    pub quantity: i64,
    pub price: Decimal,
    /// Present on buys
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    /// Present on sells
    #[serde(default)]
    pub total_value: Option<Decimal>,
    pub new_balance: Decimal,
}

/// Ledger row from the transactions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub stock_id: String,
    pub transaction_per_stock: Decimal,
    pub transaction_quantity: i64,
    pub transaction_type: TradeSide,
    #[serde(default)]
    pub transaction_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_user_envelope_deserialization() {
        let json = r#"{
            "data": {
                "user_name": "demo",
                "email": "demo@example.com",
                "balance": "10000.00",
                "investment": 2500.5,
                "profit_loss": null
            }
        }"#;

        let envelope: DataEnvelope<User> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.user_name, "demo");
        assert_eq!(envelope.data.balance, dec!(10000.00));
        assert_eq!(envelope.data.investment, Some(dec!(2500.5)));
        assert_eq!(envelope.data.profit_loss, None);
        assert!(envelope.count.is_none());
    }

    #[test]
    fn test_holdings_envelope_with_count() {
        let json = r#"{
            "data": [
                {"stock_id": "AAPL", "share_name": "AAPL", "share_quantity": 10, "share_value": "145.20"},
                {"stock_id": "TSLA", "share_quantity": 3, "share_value": 230}
            ],
            "count": 2
        }"#;

        let envelope: DataEnvelope<Vec<Holding>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.count, Some(2));
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].stock_id, "AAPL");
        assert_eq!(envelope.data[0].share_value, dec!(145.20));
        assert_eq!(envelope.data[1].share_name, None);
    }

    #[test]
    fn test_trade_order_serializes_camel_case() {
        let order = TradeOrder {
            stock_id: None,
            symbol: "AAPL".to_string(),
            quantity: 5,
            price: dec!(150.25),
            user_id: 2,
        };

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"stockId\":null"));
        assert!(json.contains("\"symbol\":\"AAPL\""));
        assert!(json.contains("\"userId\":2"));
    }

    #[test]
    fn test_trade_receipt_buy() {
        let json = r#"{
            "message": "Stock purchased successfully",
            "transaction": {
                "type": "buy",
                "symbol": "AAPL",
                "quantity": 5,
                "price": 150.25,
                "totalCost": 751.25,
                "newBalance": 9248.75
            }
        }"#;

        let receipt: TradeReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.transaction.side, TradeSide::Buy);
        assert_eq!(receipt.transaction.total_cost, Some(dec!(751.25)));
        assert_eq!(receipt.transaction.total_value, None);
        assert_eq!(receipt.transaction.new_balance, dec!(9248.75));
    }

    #[test]
    fn test_transaction_row_deserialization() {
        let json = r#"{
            "transaction_id": 7,
            "stock_id": "TSLA",
            "transaction_per_stock": "244.40",
            "transaction_quantity": 2,
            "transaction_type": "SELL",
            "transaction_date": "2025-08-01T14:30:00Z"
        }"#;

        let row: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(row.transaction_type, TradeSide::Sell);
        assert_eq!(row.transaction_per_stock, dec!(244.40));
        assert!(row.transaction_date.is_some());
    }

    #[test]
    fn test_trade_side_display() {
        assert_eq!(TradeSide::Buy.to_string(), "BUY");
        assert_eq!(TradeSide::Sell.to_string(), "SELL");
    }
}
