use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{InsCode, LocalDateTime};

/// Number of order-book rungs published per side.
pub const BOOK_DEPTH: usize = 5;

/// `yesterday_final` value of a static record that no live fetch has filled in yet.
pub const YESTERDAY_FINAL_UNSET: i64 = -1;

/// Market-segment flow code of fund-like instruments whose market value is published directly.
pub const FUND_FLOW: i64 = 3;

/// One order-book rung.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BestLimit {
    pub price: i64,
    pub vol: i64,
    pub count: i64,
}

impl BestLimit {
    pub const EMPTY: Self = Self::new(0, 0, 0);

    pub const fn new(price: i64, vol: i64, count: i64) -> Self {
        Self { price, vol, count }
    }

    pub const fn is_empty(&self) -> bool {
        self.price == 0 && self.vol == 0 && self.count == 0
    }
}

/// Volume and trade-count split between individual (real) and institutional (legal) traders
/// for one side of the market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealLegal {
    pub real_vol: i64,
    pub real_count: i64,
    pub legal_vol: i64,
    pub legal_count: i64,
}

impl Display for RealLegal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "real_vol: {}\treal_count: {}\tlegal_vol: {}\tlegal_count: {}",
            self.real_vol, self.real_count, self.legal_vol, self.legal_count
        )
    }
}

/// Market an instrument is listed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketType {
    #[serde(rename = "ExchangeStock")]
    Exchange,
    #[serde(rename = "FaraBourseStock")]
    FaraBourse,
    #[serde(rename = "FaraBourseBase")]
    FaraBourseBase,
    #[serde(rename = "FIXED_INCOME")]
    FixedIncome,
    #[serde(rename = "SandoghSahami")]
    EquityFund,
}

impl MarketType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange => "ExchangeStock",
            Self::FaraBourse => "FaraBourseStock",
            Self::FaraBourseBase => "FaraBourseBase",
            Self::FixedIncome => "FIXED_INCOME",
            Self::EquityFund => "SandoghSahami",
        }
    }
}

impl Display for MarketType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trading state of an instrument: allowed or forbidden, optionally blocked, stopped or held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    #[serde(rename = "A")]
    Allowed,
    #[serde(rename = "AG")]
    AllowedBlocked,
    #[serde(rename = "AS")]
    AllowedStopped,
    #[serde(rename = "AR")]
    AllowedHeld,
    #[serde(rename = "I")]
    Forbidden,
    #[serde(rename = "IG")]
    ForbiddenBlocked,
    #[serde(rename = "IS")]
    ForbiddenStopped,
    #[serde(rename = "IR")]
    ForbiddenHeld,
}

impl State {
    pub const ALL: [Self; 8] = [
        Self::Allowed,
        Self::AllowedBlocked,
        Self::AllowedStopped,
        Self::AllowedHeld,
        Self::Forbidden,
        Self::ForbiddenBlocked,
        Self::ForbiddenStopped,
        Self::ForbiddenHeld,
    ];

    /// Maps the wire code to a state. Unknown and empty codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_code() == code)
    }

    pub const fn as_code(self) -> &'static str {
        match self {
            Self::Allowed => "A",
            Self::AllowedBlocked => "AG",
            Self::AllowedStopped => "AS",
            Self::AllowedHeld => "AR",
            Self::Forbidden => "I",
            Self::ForbiddenBlocked => "IG",
            Self::ForbiddenStopped => "IS",
            Self::ForbiddenHeld => "IR",
        }
    }

    pub const fn persian(self) -> &'static str {
        match self {
            Self::Allowed => "مجاز",
            Self::AllowedBlocked => "مجاز مسدود",
            Self::AllowedStopped => "مجاز متوقف",
            Self::AllowedHeld => "مجاز محفوظ",
            Self::Forbidden => "ممنوع",
            Self::ForbiddenBlocked => "ممنوع مسدود",
            Self::ForbiddenStopped => "ممنوع متوقف",
            Self::ForbiddenHeld => "ممنوع محفوظ",
        }
    }

    pub const fn is_allowed(self) -> bool {
        matches!(
            self,
            Self::Allowed | Self::AllowedBlocked | Self::AllowedStopped | Self::AllowedHeld
        )
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Instrument metadata that does not change during a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticInstrumentInfo {
    /// Short trading symbol.
    pub name: String,
    /// Long company name.
    pub full_name: String,
    /// 12 character ISIN-like instrument id.
    pub instrument_id: String,
    pub ins_code: InsCode,
    pub market_type: Option<MarketType>,
    pub min_week: i64,
    pub max_week: i64,
    pub min_year: i64,
    pub max_year: i64,
    pub base_vol: i64,
    /// Lowest price the exchange accepts today.
    pub low_threshold: i64,
    /// Highest price the exchange accepts today.
    pub high_threshold: i64,
    pub nav: Option<f64>,
    pub sector_pe: f64,
    pub number_of_shares: i64,
    pub month_average_vol: i64,
    pub industry_sector_code: i64,
    pub industry_sector_name: String,
    pub industry_subsector_code: i64,
    pub industry_subsector_name: String,
    pub instrument_group_code: String,
    /// Filled in by live fetches; [`YESTERDAY_FINAL_UNSET`] until then.
    pub yesterday_final: i64,
    pub index_coefficient: i64,
    /// Market segment code (exchange, fara-bourse, funds, ...).
    pub flow: i64,
    /// Snapshot date as `YYYY/MM/DD`.
    pub date: String,
}

impl StaticInstrumentInfo {
    pub const fn is_fund_flow(&self) -> bool {
        self.flow == FUND_FLOW
    }

    pub const fn has_yesterday_final(&self) -> bool {
        self.yesterday_final != YESTERDAY_FINAL_UNSET
    }

    pub fn date_of(datetime: LocalDateTime) -> String {
        crate::domain::format_snapshot_date(datetime.date())
    }
}

/// Intraday snapshot of one instrument.
///
/// `static_data` is shared: snapshots of the same instrument and day point at one
/// static record. Mutating through `Arc::make_mut` on a clone copies the record first,
/// so clones never observe each other's edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub static_data: Arc<StaticInstrumentInfo>,
    pub state: State,
    pub last: i64,
    #[serde(rename = "final")]
    pub final_price: i64,
    pub trades_value: i64,
    pub trades_count: i64,
    pub trades_vol: i64,
    pub market_value: i64,
    pub lowest_price: i64,
    pub highest_price: i64,
    pub buy_best_limit: [BestLimit; BOOK_DEPTH],
    pub sell_best_limit: [BestLimit; BOOK_DEPTH],
    pub buy_reallegal: Option<RealLegal>,
    pub sell_reallegal: Option<RealLegal>,
    pub last_trade_date: String,
    pub create_date: LocalDateTime,
}

impl Instrument {
    /// Top buy rung when it sits at the upper price limit, otherwise an empty rung.
    pub fn buy_queue(&self) -> BestLimit {
        let top = self.buy_best_limit[0];
        if top.price == self.static_data.high_threshold {
            top
        } else {
            BestLimit::EMPTY
        }
    }

    /// Top sell rung when it sits at the lower price limit, otherwise an empty rung.
    pub fn sell_queue(&self) -> BestLimit {
        let top = self.sell_best_limit[0];
        if top.price == self.static_data.low_threshold {
            top
        } else {
            BestLimit::EMPTY
        }
    }

    /// Change of the last price against yesterday's final price, in percent with two decimals.
    ///
    /// With `sign_suffix` the magnitude is printed first and a trailing `-` marks a
    /// non-positive move (`"2.50"` / `"2.50-"`). Returns `None` while yesterday's final
    /// price is not known.
    pub fn percent_last(&self, sign_suffix: bool) -> Option<String> {
        let yesterday = self.static_data.yesterday_final;
        if yesterday <= 0 {
            return None;
        }

        let change = 100.0 * (self.last as f64 / yesterday as f64 - 1.0);
        if !sign_suffix {
            return Some(format!("{change:.2}"));
        }

        let sign = if self.last > yesterday { "" } else { "-" };
        Some(format!("{:.2}{sign}", change.abs()))
    }

    /// Average real buy volume per trade divided by the same figure on the sell side.
    ///
    /// `buy = false` returns the reciprocal. Zero when any count or volume is zero or
    /// the real/legal split is missing.
    pub fn power(&self, buy: bool) -> f64 {
        let (Some(buyers), Some(sellers)) = (self.buy_reallegal, self.sell_reallegal) else {
            return 0.0;
        };
        if buyers.real_count == 0
            || sellers.real_count == 0
            || buyers.real_vol == 0
            || sellers.real_vol == 0
        {
            return 0.0;
        }

        let buy_per_trade = buyers.real_vol as f64 / buyers.real_count as f64;
        let sell_per_trade = sellers.real_vol as f64 / sellers.real_count as f64;
        let ratio = buy_per_trade / sell_per_trade;
        if buy {
            ratio
        } else if ratio == 0.0 {
            0.0
        } else {
            1.0 / ratio
        }
    }

    /// Average value of one real trade on the chosen side: `final * real_vol / real_count`.
    /// Zero when the side has no real trades or the product does not fit in `i64`.
    pub fn density(&self, buy: bool) -> i64 {
        let side = if buy {
            self.buy_reallegal
        } else {
            self.sell_reallegal
        };
        match side {
            Some(split) if split.real_count != 0 => self
                .final_price
                .checked_mul(split.real_vol)
                .and_then(|value| value.checked_div(split.real_count))
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// Snapshot equality: market fields, books, splits and static snapshot date.
/// The local creation timestamp is ignored so that an unchanged poll compares equal.
impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.last == other.last
            && self.final_price == other.final_price
            && self.trades_value == other.trades_value
            && self.trades_count == other.trades_count
            && self.trades_vol == other.trades_vol
            && self.market_value == other.market_value
            && self.lowest_price == other.lowest_price
            && self.highest_price == other.highest_price
            && self.last_trade_date == other.last_trade_date
            && self.buy_best_limit == other.buy_best_limit
            && self.sell_best_limit == other.sell_best_limit
            && self.buy_reallegal == other.buy_reallegal
            && self.sell_reallegal == other.sell_reallegal
            && self.static_data.date == other.static_data.date
    }
}
