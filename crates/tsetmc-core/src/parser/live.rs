//! Intraday payload of `tsev2/data/instinfodata.aspx`.
//!
//! The body is split on `;` into segments:
//!
//! | Segment | Content |
//! |---------|---------|
//! | 0 | Prices and trade summary, `,` separated |
//! | 1 | Market index |
//! | 2 | Order book, `,` separated groups of six `@` joined integers |
//! | 3 | Messages |
//! | 4 | Real/legal split, `,` separated integers |
//! | 5 | Related instruments |
//! | 6 | Always empty |
//! | 7 | Connection flag, and for funds `flag@market_value` |

use super::parse_int;
use crate::{BestLimit, ParseError, RealLegal, State, StaticInstrumentInfo, BOOK_DEPTH};

#[derive(Debug, Clone, Copy)]
struct Segment {
    name: &'static str,
    index: usize,
}

const PRICES: Segment = Segment { name: "prices", index: 0 };
const BEST_LIMITS: Segment = Segment { name: "best_limits", index: 2 };
const REAL_LEGAL: Segment = Segment { name: "real_legal", index: 4 };
const FUND: Segment = Segment { name: "fund", index: 7 };

/// Positions inside segment 0.
mod price {
    pub const LAST_TRADE_DATE: usize = 0;
    pub const STATE: usize = 1;

    pub const LAST: (&str, usize) = ("last", 2);
    pub const FINAL: (&str, usize) = ("final", 3);
    pub const YESTERDAY_FINAL: (&str, usize) = ("yesterday_final", 5);
    pub const HIGHEST: (&str, usize) = ("highest_price", 6);
    pub const LOWEST: (&str, usize) = ("lowest_price", 7);
    pub const TRADES_COUNT: (&str, usize) = ("trades_count", 8);
    pub const TRADES_VOL: (&str, usize) = ("trades_vol", 9);
    pub const TRADES_VALUE: (&str, usize) = ("trades_value", 10);
}

/// `buy_count@buy_vol@buy_price@sell_price@sell_vol@sell_count`
const BEST_LIMIT_PARTS: usize = 6;

/// Positions inside segment 4: volumes first, then counts, buy side before sell side.
mod real_legal {
    pub const REAL_BUY_VOL: usize = 0;
    pub const LEGAL_BUY_VOL: usize = 1;
    pub const REAL_SELL_VOL: usize = 3;
    pub const LEGAL_SELL_VOL: usize = 4;
    pub const REAL_BUY_COUNT: usize = 5;
    pub const LEGAL_BUY_COUNT: usize = 6;
    pub const REAL_SELL_COUNT: usize = 8;
    pub const LEGAL_SELL_COUNT: usize = 9;

    pub const REQUIRED: usize = LEGAL_SELL_COUNT + 1;
}

/// Market fields of one live poll, before they are joined with the static record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveFields {
    pub last_trade_date: String,
    pub state: State,
    pub last: i64,
    pub final_price: i64,
    pub yesterday_final: i64,
    pub highest_price: i64,
    pub lowest_price: i64,
    pub trades_count: i64,
    pub trades_vol: i64,
    pub trades_value: i64,
    pub market_value: i64,
    pub buy_best_limit: [BestLimit; BOOK_DEPTH],
    pub sell_best_limit: [BestLimit; BOOK_DEPTH],
    pub buy_reallegal: Option<RealLegal>,
    pub sell_reallegal: Option<RealLegal>,
}

/// Outcome of parsing a live payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LivePayload {
    Snapshot(Box<LiveFields>),
    /// No usable state code: the instrument has been delisted or suspended for good.
    Removed,
}

/// Parses a live payload for the instrument described by `info`.
///
/// `info` supplies the flow code and share count the market value is derived from.
pub fn parse_live_payload(
    body: &str,
    info: &StaticInstrumentInfo,
) -> Result<LivePayload, ParseError> {
    let segments = body.split(';').collect::<Vec<_>>();
    let fields = segment(&segments, PRICES)?.split(',').collect::<Vec<_>>();

    let last_trade_date = fields[price::LAST_TRADE_DATE].to_owned();
    let Some(state) = fields
        .get(price::STATE)
        .and_then(|code| State::from_code(code.trim()))
    else {
        return Ok(LivePayload::Removed);
    };

    let final_price = price_field(&fields, price::FINAL)?;
    let (buy_best_limit, sell_best_limit) = parse_best_limits(segment(&segments, BEST_LIMITS)?)?;
    let (buy_reallegal, sell_reallegal) = parse_real_legal(segment(&segments, REAL_LEGAL)?)?;

    let market_value = if info.is_fund_flow() {
        parse_fund_market_value(segments.get(FUND.index).copied())?
    } else {
        final_price
            .checked_mul(info.number_of_shares)
            .ok_or(ParseError::MarketValueOverflow {
                final_price,
                number_of_shares: info.number_of_shares,
            })?
    };

    Ok(LivePayload::Snapshot(Box::new(LiveFields {
        last_trade_date,
        state,
        last: price_field(&fields, price::LAST)?,
        final_price,
        yesterday_final: price_field(&fields, price::YESTERDAY_FINAL)?,
        highest_price: price_field(&fields, price::HIGHEST)?,
        lowest_price: price_field(&fields, price::LOWEST)?,
        trades_count: price_field(&fields, price::TRADES_COUNT)?,
        trades_vol: price_field(&fields, price::TRADES_VOL)?,
        trades_value: price_field(&fields, price::TRADES_VALUE)?,
        market_value,
        buy_best_limit,
        sell_best_limit,
        buy_reallegal,
        sell_reallegal,
    })))
}

fn segment<'a>(segments: &[&'a str], segment: Segment) -> Result<&'a str, ParseError> {
    segments
        .get(segment.index)
        .copied()
        .ok_or(ParseError::MissingSegment {
            segment: segment.name,
            index: segment.index,
        })
}

fn price_field(fields: &[&str], (field, index): (&'static str, usize)) -> Result<i64, ParseError> {
    let raw = fields
        .get(index)
        .ok_or(ParseError::MissingPriceField { field, index })?;
    parse_int(field, raw)
}

/// Buy and sell books, each exactly [`BOOK_DEPTH`] rungs deep.
///
/// Missing rungs are zero-filled; rungs beyond the depth are ignored.
pub fn parse_best_limits(
    segment: &str,
) -> Result<([BestLimit; BOOK_DEPTH], [BestLimit; BOOK_DEPTH]), ParseError> {
    let mut buy = [BestLimit::EMPTY; BOOK_DEPTH];
    let mut sell = [BestLimit::EMPTY; BOOK_DEPTH];

    let groups = segment.strip_suffix(',').unwrap_or(segment);
    if groups.is_empty() {
        return Ok((buy, sell));
    }

    for (rung, group) in groups.split(',').take(BOOK_DEPTH).enumerate() {
        let parts = group.split('@').collect::<Vec<_>>();
        if parts.len() != BEST_LIMIT_PARTS {
            return Err(ParseError::MalformedBestLimit {
                raw: group.to_owned(),
                found: parts.len(),
            });
        }
        let values = parts
            .iter()
            .map(|part| parse_int("best_limit", part))
            .collect::<Result<Vec<_>, _>>()?;

        buy[rung] = BestLimit::new(values[2], values[1], values[0]);
        sell[rung] = BestLimit::new(values[3], values[4], values[5]);
    }

    Ok((buy, sell))
}

/// Buy and sell real/legal splits; both `None` when the segment is empty.
pub fn parse_real_legal(
    segment: &str,
) -> Result<(Option<RealLegal>, Option<RealLegal>), ParseError> {
    let values = segment.strip_suffix(',').unwrap_or(segment);
    if values.is_empty() {
        return Ok((None, None));
    }

    let values = values
        .split(',')
        .map(|value| parse_int("real_legal", value))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() < real_legal::REQUIRED {
        return Err(ParseError::MalformedRealLegal {
            found: values.len(),
        });
    }

    let buy = RealLegal {
        real_vol: values[real_legal::REAL_BUY_VOL],
        real_count: values[real_legal::REAL_BUY_COUNT],
        legal_vol: values[real_legal::LEGAL_BUY_VOL],
        legal_count: values[real_legal::LEGAL_BUY_COUNT],
    };
    let sell = RealLegal {
        real_vol: values[real_legal::REAL_SELL_VOL],
        real_count: values[real_legal::REAL_SELL_COUNT],
        legal_vol: values[real_legal::LEGAL_SELL_VOL],
        legal_count: values[real_legal::LEGAL_SELL_COUNT],
    };
    Ok((Some(buy), Some(sell)))
}

/// Second `@` part of the fund segment; zero when the segment or the part is absent.
fn parse_fund_market_value(segment: Option<&str>) -> Result<i64, ParseError> {
    match segment.and_then(|segment| segment.split('@').nth(1)) {
        Some(raw) => parse_int("market_value", raw),
        None => Ok(0),
    }
}
