// Traffic status page: `var txTotal = '...';` and `var rxTotal = '...';`.

use std::sync::LazyLock;

use regex::Regex;

use super::{PageKind, TrafficCounters, embedded_var, var_pattern};
use crate::error::ParseError;

const PAGE: PageKind = PageKind::TrafficStatus;

static TX_TOTAL: LazyLock<Regex> = LazyLock::new(|| var_pattern("txTotal"));
static RX_TOTAL: LazyLock<Regex> = LazyLock::new(|| var_pattern("rxTotal"));

pub(super) fn parse(body: &str) -> Result<TrafficCounters, ParseError> {
    let tx = embedded_var(body, &TX_TOTAL, PAGE, "txTotal")?;
    let rx = embedded_var(body, &RX_TOTAL, PAGE, "rxTotal")?;

    Ok(TrafficCounters {
        received_total: counter(rx, "rxTotal")?,
        transmitted_total: counter(tx, "txTotal")?,
    })
}

fn counter(value: &str, marker: &'static str) -> Result<u64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber {
            page: PAGE,
            marker,
            value: value.to_owned(),
        })
}
