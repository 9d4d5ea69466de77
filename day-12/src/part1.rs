use miette::{Context, Result};
use tracing::{info, Level};

use crate::map::Map;
use crate::regions::RegionBuilder;

/// Total fencing price of the garden: the sum of perimeter × area over every region.
#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    let map = Map::parse(input).context("Failed to parse garden map")?;
    let partition = RegionBuilder::new(&map).build();

    if tracing::enabled!(Level::DEBUG) {
        for (label, prices) in partition.price_by_label() {
            tracing::debug!(%label, regions = prices.regions, price = prices.price, "Label price");
        }
    }

    let price = partition.total_price();
    info!(regions = partition.len(), price, "Priced garden");
    Ok(price.to_string())
}
