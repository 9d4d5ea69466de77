use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::map::Position;
use crate::regions::{Partition, Region};

/// Up-left, up-right, down-right, down-left.
const CORNERS: [(isize, isize); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

impl Region {
    pub fn area(&self) -> u64 {
        self.plots().count() as u64
    }

    pub fn perimeter(&self) -> u64 {
        self.plots().map(|plot| u64::from(plot.fences)).sum()
    }

    pub fn price(&self) -> u64 {
        self.perimeter() * self.area()
    }

    /// Number of straight fence runs, counted as the corners of every outline
    /// of the region (holes included).
    pub fn sides(&self) -> u64 {
        self.positions()
            .map(|position| {
                CORNERS
                    .iter()
                    .filter(|&&corner| self.is_corner(position, corner))
                    .count() as u64
            })
            .sum()
    }

    pub fn discounted_price(&self) -> u64 {
        self.area() * self.sides()
    }

    /// Convex when both orthogonal neighbours at the corner are outside the
    /// region, concave when both are inside but the diagonal is not.
    fn is_corner(&self, position: Position, (dx, dy): (isize, isize)) -> bool {
        let horizontal = self.contains_offset(position, (dx, 0));
        let vertical = self.contains_offset(position, (0, dy));
        let diagonal = self.contains_offset(position, (dx, dy));

        (!horizontal && !vertical) || (horizontal && vertical && !diagonal)
    }
}

/// Prices of every region sharing one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelPrice {
    pub regions: usize,
    pub price: u64,
    pub discounted_price: u64,
}

impl Partition {
    pub fn total_price(&self) -> u64 {
        self.regions().par_iter().map(Region::price).sum()
    }

    pub fn total_discounted_price(&self) -> u64 {
        self.regions().par_iter().map(Region::discounted_price).sum()
    }

    pub fn price_by_label(&self) -> BTreeMap<char, LabelPrice> {
        self.regions()
            .iter()
            .fold(BTreeMap::new(), |mut prices, region| {
                let entry: &mut LabelPrice = prices.entry(region.label()).or_default();
                entry.regions += 1;
                entry.price += region.price();
                entry.discounted_price += region.discounted_price();
                prices
            })
    }
}
