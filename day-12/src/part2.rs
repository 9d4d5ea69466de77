use miette::{Context, Result};
use tracing::{info, Level};

use crate::map::Map;
use crate::regions::RegionBuilder;

/// Bulk-discount price of the garden: the sum of sides × area over every region.
#[tracing::instrument(skip(input))]
pub fn process(input: &str) -> Result<String> {
    let map = Map::parse(input).context("Failed to parse garden map")?;
    let partition = RegionBuilder::new(&map).build();

    if tracing::enabled!(Level::DEBUG) {
        for (label, prices) in partition.price_by_label() {
            tracing::debug!(
                %label,
                regions = prices.regions,
                price = prices.discounted_price,
                "Label discounted price"
            );
        }
    }

    let price = partition.total_discounted_price();
    info!(regions = partition.len(), price, "Priced garden with discount");
    Ok(price.to_string())
}
