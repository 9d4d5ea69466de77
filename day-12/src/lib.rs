pub mod error;
pub mod map;
pub mod metrics;
pub mod part1;
pub mod part2;
pub mod regions;
