use serde::Serialize;

use tsetmc_core::{BestLimit, InsCode, Instrument, LiveData, TseClient};

use crate::error::CliError;
use crate::output::print_json;

#[derive(Debug, Serialize)]
struct LiveReport<'a> {
    snapshot: &'a Instrument,
    buy_queue: BestLimit,
    sell_queue: BestLimit,
    percent_last: Option<String>,
    buy_power: f64,
    sell_power: f64,
    buy_density: i64,
    sell_density: i64,
}

impl<'a> LiveReport<'a> {
    fn new(snapshot: &'a Instrument) -> Self {
        Self {
            snapshot,
            buy_queue: snapshot.buy_queue(),
            sell_queue: snapshot.sell_queue(),
            percent_last: snapshot.percent_last(false),
            buy_power: snapshot.power(true),
            sell_power: snapshot.power(false),
            buy_density: snapshot.density(true),
            sell_density: snapshot.density(false),
        }
    }
}

#[derive(Debug, Serialize)]
struct RemovedNotice<'a> {
    ins_code: &'a InsCode,
    removed: bool,
}

pub fn run(client: &TseClient, ins_code: &InsCode, pretty: bool) -> Result<(), CliError> {
    match client.get_live_data(ins_code)? {
        LiveData::Snapshot(snapshot) => print_json(&LiveReport::new(&snapshot), pretty),
        LiveData::Removed { ins_code } => print_json(
            &RemovedNotice {
                ins_code: &ins_code,
                removed: true,
            },
            pretty,
        ),
    }
}
