//! Profit/loss derivations over holdings and live prices

use super::types::Holding;
use crate::feed::FeedState;
use rust_decimal::Decimal;

/// One holding joined with its live quote
#[derive(Debug, Clone)]
pub struct PositionView {
    pub symbol: String,
    pub quantity: i64,
    /// Average cost per share
    pub avg_cost: Decimal,
    /// quantity * avg_cost
    pub cost_basis: Decimal,
    /// Latest feed price, when one has arrived
    pub last_price: Option<Decimal>,
    /// quantity * last_price; falls back to cost basis without a price
    pub market_value: Decimal,
    /// market_value - cost_basis; None until a live price arrives
    pub unrealized_pnl: Option<Decimal>,
    /// Absolute change vs previous close
    pub change: Option<Decimal>,
    /// Percent change vs previous close
    pub percent_change: Option<Decimal>,
}

/// Whole-portfolio totals
#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    pub positions: Vec<PositionView>,
    pub total_cost: Decimal,
    /// Positions without a live price are valued at cost
    pub total_value: Decimal,
    pub unrealized_pnl: Decimal,
}

/// A symbol ranked by how far it moved off its previous close
#[derive(Debug, Clone)]
pub struct Mover {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    pub percent_change: Decimal,
}

/// Percent change of `price` against `previous_close`.
///
/// None when the baseline is zero, since the ratio is undefined there.
pub fn percent_change(price: Decimal, previous_close: Decimal) -> Option<Decimal> {
    if previous_close.is_zero() {
        return None;
    }
    Some((price - previous_close) / previous_close * Decimal::ONE_HUNDRED)
}

/// Join holdings with the live feed snapshot into a P/L summary
pub fn summarize(holdings: &[Holding], feed: &FeedState) -> PortfolioSummary {
    let mut positions = Vec::with_capacity(holdings.len());
    let mut total_cost = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;
    let mut unrealized_pnl = Decimal::ZERO;

    for holding in holdings {
        let quantity = Decimal::from(holding.share_quantity);
        let cost_basis = quantity * holding.share_value;

        let quote = feed.quote(&holding.stock_id);
        let last_price = quote.and_then(|q| q.current_price);

        let market_value = match last_price {
            Some(price) => quantity * price,
            None => cost_basis,
        };
        let pnl = last_price.map(|_| market_value - cost_basis);

        let change = quote.and_then(|q| q.previous_close.map(|_| q.change));
        let pct = match (last_price, quote.and_then(|q| q.previous_close)) {
            (Some(price), Some(pc)) => percent_change(price, pc),
            _ => None,
        };

        total_cost += cost_basis;
        total_value += market_value;
        unrealized_pnl += pnl.unwrap_or(Decimal::ZERO);

        positions.push(PositionView {
            symbol: holding.stock_id.clone(),
            quantity: holding.share_quantity,
            avg_cost: holding.share_value,
            cost_basis,
            last_price,
            market_value,
            unrealized_pnl: pnl,
            change,
            percent_change: pct,
        });
    }

    PortfolioSummary {
        positions,
        total_cost,
        total_value,
        unrealized_pnl,
    }
}

/// Rank tracked symbols by the magnitude of their percent change.
///
/// Symbols without both a live price and a previous close are left out;
/// there is nothing to rank them by yet.
pub fn movers(feed: &FeedState) -> Vec<Mover> {
    let mut ranked: Vec<Mover> = feed
        .quotes()
        .iter()
        .filter_map(|(symbol, q)| {
            let price = q.current_price?;
            let pc = q.previous_close?;
            let pct = percent_change(price, pc)?;
            Some(Mover {
                symbol: symbol.clone(),
                price,
                change: q.change,
                percent_change: pct,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.percent_change
            .abs()
            .cmp(&a.percent_change.abs())
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Quote;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn holding(symbol: &str, quantity: i64, avg_cost: Decimal) -> Holding {
        Holding {
            stock_id: symbol.to_string(),
            share_name: Some(symbol.to_string()),
            share_quantity: quantity,
            share_value: avg_cost,
        }
    }

    fn feed_with(quotes: &[(&str, Decimal, Option<Decimal>)]) -> FeedState {
        let mut state = FeedState::new();
        for (symbol, price, pc) in quotes {
            state.apply_snapshot(
                symbol,
                &Quote {
                    current: Some(*price),
                    previous_close: *pc,
                    change: None,
                },
                Utc::now(),
            );
        }
        state
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(110), dec!(100)), Some(dec!(10)));
        assert_eq!(percent_change(dec!(90), dec!(100)), Some(dec!(-10)));
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        assert_eq!(percent_change(dec!(150), Decimal::ZERO), None);
    }

    #[test]
    fn test_summarize_with_live_prices() {
        let holdings = vec![holding("AAPL", 10, dec!(100)), holding("TSLA", 2, dec!(200))];
        let feed = feed_with(&[
            ("AAPL", dec!(110), Some(dec!(105))),
            ("TSLA", dec!(190), Some(dec!(195))),
        ]);

        let summary = summarize(&holdings, &feed);

        assert_eq!(summary.total_cost, dec!(1400));
        // 10*110 + 2*190
        assert_eq!(summary.total_value, dec!(1480));
        assert_eq!(summary.unrealized_pnl, dec!(80));

        let aapl = &summary.positions[0];
        assert_eq!(aapl.market_value, dec!(1100));
        assert_eq!(aapl.unrealized_pnl, Some(dec!(100)));
        assert_eq!(aapl.change, Some(dec!(5)));
    }

    #[test]
    fn test_summarize_falls_back_to_cost_without_price() {
        let holdings = vec![holding("AAPL", 10, dec!(100))];
        let feed = FeedState::new();

        let summary = summarize(&holdings, &feed);

        assert_eq!(summary.total_cost, dec!(1000));
        assert_eq!(summary.total_value, dec!(1000));
        assert_eq!(summary.unrealized_pnl, Decimal::ZERO);

        let aapl = &summary.positions[0];
        assert_eq!(aapl.last_price, None);
        assert_eq!(aapl.unrealized_pnl, None);
        assert_eq!(aapl.percent_change, None);
    }

    #[test]
    fn test_summarize_empty_portfolio() {
        let summary = summarize(&[], &FeedState::new());
        assert!(summary.positions.is_empty());
        assert_eq!(summary.total_value, Decimal::ZERO);
    }

    #[test]
    fn test_movers_ranked_by_magnitude() {
        let feed = feed_with(&[
            ("AAPL", dec!(101), Some(dec!(100))), // +1%
            ("TSLA", dec!(90), Some(dec!(100))),  // -10%
            ("NVDA", dec!(105), Some(dec!(100))), // +5%
        ]);

        let ranked = movers(&feed);
        let symbols: Vec<&str> = ranked.iter().map(|m| m.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "NVDA", "AAPL"]);
        assert_eq!(ranked[0].percent_change, dec!(-10));
    }

    #[test]
    fn test_movers_skip_symbols_without_baseline() {
        let feed = feed_with(&[
            ("AAPL", dec!(101), Some(dec!(100))),
            ("TSLA", dec!(90), None),
        ]);

        let ranked = movers(&feed);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].symbol, "AAPL");
    }
}
