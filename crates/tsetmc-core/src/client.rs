//! Client facade: static/live fetches for one instrument and the per-instrument static cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ClientConfig;
use crate::fetcher::Fetcher;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::parser::live::LiveFields;
use crate::parser::{
    extract_script_block, parse_identity_page, parse_live_payload, parse_script_fields,
    parse_script_map, table_cells, LivePayload,
};
use crate::retry::RetryCause;
use crate::supervisor::supervise;
use crate::{
    InsCode, Instrument, LocalDateTime, StaticInstrumentInfo, TseError, YESTERDAY_FINAL_UNSET,
};

const STATIC_PAGE: (&str, &str) = ("ParTree", "151311");
const IDENTITY_PAGE: (&str, &str) = ("Partree", "15131M");

/// Result of a live fetch.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum LiveData {
    Snapshot(Instrument),
    /// The payload carried no state code; the instrument is no longer traded.
    Removed { ins_code: InsCode },
}

impl LiveData {
    pub fn into_snapshot(self) -> Option<Instrument> {
        match self {
            Self::Snapshot(instrument) => Some(instrument),
            Self::Removed { .. } => None,
        }
    }
}

/// Blocking client for the instrument pages.
///
/// Static records are cached per instrument for the life of the client and shared with
/// every snapshot built from them. The client is `Sync`; wrap it in an `Arc` to fetch
/// from several threads.
pub struct TseClient {
    config: ClientConfig,
    fetcher: Fetcher,
    statics: Mutex<HashMap<InsCode, Arc<StaticInstrumentInfo>>>,
}

impl TseClient {
    pub fn new(config: ClientConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let fetcher = Fetcher::new(http_client, config.retry, config.request_timeout);
        Self {
            config,
            fetcher,
            statics: Mutex::new(HashMap::new()),
        }
    }

    /// Client on the production `reqwest` transport.
    pub fn with_reqwest(config: ClientConfig) -> Result<Self, TseError> {
        let http_client = ReqwestHttpClient::new()?;
        Ok(Self::new(config, Arc::new(http_client)))
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cached static record, if one has been fetched.
    pub fn cached_static(&self, ins_code: &InsCode) -> Option<Arc<StaticInstrumentInfo>> {
        self.statics.lock().get(ins_code).cloned()
    }

    /// Fetches the static record and replaces the cached one.
    ///
    /// A page without the script block is re-fetched until one arrives. Layout mismatches
    /// in either page are returned as [`TseError::Parse`].
    pub fn get_static_data(
        &self,
        ins_code: &InsCode,
    ) -> Result<Arc<StaticInstrumentInfo>, TseError> {
        let loader_url = self.config.loader_url();
        tracing::debug!(%ins_code, "fetching static data 0/2");

        let script_map = loop {
            let page = self
                .fetcher
                .get(&loader_url, &[STATIC_PAGE, ("i", ins_code.as_str())])?;
            if let Some(block) = extract_script_block(&page) {
                break parse_script_map(block);
            }
            tracing::warn!(%ins_code, body = %page, "static page has no script block, retrying");
            self.fetcher.pause(RetryCause::MalformedPage);
        };
        let fields = parse_script_fields(&script_map).map_err(|error| {
            tracing::error!(%ins_code, %error, ?script_map, "unexpected static script layout");
            TseError::parse(ins_code.as_str(), error)
        })?;

        tracing::debug!(%ins_code, "fetching static data 1/2");
        let page = self
            .fetcher
            .get(&loader_url, &[IDENTITY_PAGE, ("i", ins_code.as_str())])?;
        let identity = parse_identity_page(&page).map_err(|error| {
            tracing::error!(
                %ins_code,
                %error,
                body = %page,
                cells = ?table_cells(&page),
                "unexpected identity table layout"
            );
            TseError::parse(ins_code.as_str(), error)
        })?;
        tracing::debug!(%ins_code, "fetching static data 2/2");

        let info = Arc::new(StaticInstrumentInfo {
            name: fields.name,
            full_name: fields.full_name,
            instrument_id: fields.instrument_id,
            ins_code: ins_code.clone(),
            market_type: None,
            min_week: fields.min_week,
            max_week: fields.max_week,
            min_year: fields.min_year,
            max_year: fields.max_year,
            base_vol: fields.base_vol,
            low_threshold: fields.low_threshold,
            high_threshold: fields.high_threshold,
            nav: fields.nav,
            sector_pe: fields.sector_pe,
            number_of_shares: fields.number_of_shares,
            month_average_vol: fields.month_average_vol,
            industry_sector_code: fields.industry_sector_code,
            industry_sector_name: identity.industry_sector_name,
            industry_subsector_code: identity.industry_subsector_code,
            industry_subsector_name: identity.industry_subsector_name,
            instrument_group_code: fields.instrument_group_code,
            yesterday_final: YESTERDAY_FINAL_UNSET,
            index_coefficient: fields.index_coefficient,
            flow: fields.flow,
            date: StaticInstrumentInfo::date_of(LocalDateTime::now()),
        });

        self.statics
            .lock()
            .insert(ins_code.clone(), Arc::clone(&info));
        Ok(info)
    }

    /// [`get_static_data`](Self::get_static_data) with up to `attempts` tries, sleeping
    /// the configured static retry delay between them. The last error is returned.
    pub fn get_static_data_retry(
        &self,
        ins_code: &InsCode,
        attempts: u32,
    ) -> Result<Arc<StaticInstrumentInfo>, TseError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.get_static_data(ins_code) {
                Ok(info) => return Ok(info),
                Err(error) => {
                    tracing::error!(%ins_code, attempt, attempts, %error, "static data fetch failed");
                    if attempt >= attempts {
                        return Err(error);
                    }
                }
            }
            attempt += 1;
            std::thread::sleep(self.config.static_retry_delay);
        }
    }

    /// Fetches one live snapshot.
    ///
    /// Fetches static data first when none is cached. The cached record's
    /// `yesterday_final` is updated from the payload; snapshots taken earlier keep the
    /// record they were built with.
    pub fn get_live_data(&self, ins_code: &InsCode) -> Result<LiveData, TseError> {
        let info = match self.cached_static(ins_code) {
            Some(info) => info,
            None => {
                tracing::warn!(%ins_code, "no static data cached, fetching it first");
                self.get_static_data(ins_code)?
            }
        };

        let sector_code = info.industry_sector_code.to_string();
        let body = self.fetcher.get(
            &self.config.live_url(),
            &[("i", ins_code.as_str()), ("c", sector_code.as_str())],
        )?;

        let fields = match parse_live_payload(&body, &info) {
            Ok(LivePayload::Snapshot(fields)) => *fields,
            Ok(LivePayload::Removed) => {
                tracing::error!(%ins_code, %body, "instrument removed");
                return Ok(LiveData::Removed {
                    ins_code: ins_code.clone(),
                });
            }
            Err(error) => {
                tracing::error!(%ins_code, %error, %body, "unexpected live payload layout");
                return Err(TseError::parse(ins_code.as_str(), error));
            }
        };

        let static_data = self.record_yesterday_final(ins_code, info, fields.yesterday_final);
        Ok(LiveData::Snapshot(snapshot(static_data, fields)))
    }

    /// [`get_live_data`](Self::get_live_data) under the fatal supervisor: any error aborts
    /// the process. `None` means the instrument was removed.
    pub fn get_live_data_supervised(&self, ins_code: &InsCode) -> Option<Instrument> {
        supervise("live data", || self.get_live_data(ins_code)).into_snapshot()
    }

    fn record_yesterday_final(
        &self,
        ins_code: &InsCode,
        fetched: Arc<StaticInstrumentInfo>,
        yesterday_final: i64,
    ) -> Arc<StaticInstrumentInfo> {
        let mut statics = self.statics.lock();
        let cached = statics.entry(ins_code.clone()).or_insert(fetched);
        if cached.yesterday_final != yesterday_final {
            Arc::make_mut(cached).yesterday_final = yesterday_final;
        }
        Arc::clone(cached)
    }
}

impl std::fmt::Debug for TseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TseClient")
            .field("config", &self.config)
            .field("cached_statics", &self.statics.lock().len())
            .finish()
    }
}

fn snapshot(static_data: Arc<StaticInstrumentInfo>, fields: LiveFields) -> Instrument {
    Instrument {
        static_data,
        state: fields.state,
        last: fields.last,
        final_price: fields.final_price,
        trades_value: fields.trades_value,
        trades_count: fields.trades_count,
        trades_vol: fields.trades_vol,
        market_value: fields.market_value,
        lowest_price: fields.lowest_price,
        highest_price: fields.highest_price,
        buy_best_limit: fields.buy_best_limit,
        sell_best_limit: fields.sell_best_limit,
        buy_reallegal: fields.buy_reallegal,
        sell_reallegal: fields.sell_reallegal,
        last_trade_date: fields.last_trade_date,
        create_date: LocalDateTime::now(),
    }
}
