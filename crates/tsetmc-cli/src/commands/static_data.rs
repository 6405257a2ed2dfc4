use tsetmc_core::{InsCode, TseClient};

use crate::error::CliError;
use crate::output::print_json;

pub fn run(client: &TseClient, ins_code: &InsCode, pretty: bool) -> Result<(), CliError> {
    let attempts = client.config().static_retry_attempts;
    let info = client.get_static_data_retry(ins_code, attempts)?;
    print_json(info.as_ref(), pretty)
}
