use std::collections::{BTreeMap, HashMap};

use itertools::iproduct;
use tracing::{debug, instrument};

use crate::map::{Map, Position};

/// A single garden plot and the number of its sides that need a fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Plot {
    pub position: Position,
    pub fences: u8,
}

/// A maximal 4-connected group of plots sharing one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    label: char,
    plots: BTreeMap<Position, u8>,
}

impl Region {
    fn new(label: char) -> Self {
        Self {
            label,
            plots: BTreeMap::new(),
        }
    }

    fn insert(&mut self, plot: Plot) {
        self.plots.insert(plot.position, plot.fences);
    }

    pub fn label(&self) -> char {
        self.label
    }

    pub fn plots(&self) -> impl Iterator<Item = Plot> + '_ {
        self.plots
            .iter()
            .map(|(&position, &fences)| Plot { position, fences })
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.plots.keys().copied()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.plots.contains_key(&position)
    }

    /// Membership test for a position offset from `position`; anything off
    /// the map (negative coordinates included) is outside the region.
    pub(crate) fn contains_offset(&self, position: Position, offset: (isize, isize)) -> bool {
        match (
            position.0.checked_add_signed(offset.0),
            position.1.checked_add_signed(offset.1),
        ) {
            (Some(x), Some(y)) => self.contains((x, y)),
            _ => false,
        }
    }
}

/// Every region of a map; each plot belongs to exactly one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    regions: Vec<Region>,
}

impl Partition {
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region_of(&self, position: Position) -> Option<&Region> {
        self.regions.iter().find(|region| region.contains(position))
    }
}

/// Order in which [`RegionBuilder`] visits the map. Only intermediate group
/// identities and the order of the resulting regions depend on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

/// Groups plots into regions with a single scan and a disjoint-set forest.
#[derive(Debug)]
pub struct RegionBuilder<'a> {
    map: &'a Map,
    order: ScanOrder,
}

impl<'a> RegionBuilder<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self {
            map,
            order: ScanOrder::default(),
        }
    }

    pub fn scan_order(mut self, order: ScanOrder) -> Self {
        self.order = order;
        self
    }

    #[instrument(skip(self), fields(order = ?self.order))]
    pub fn build(self) -> Partition {
        let map = self.map;
        let scan = self.scan();
        let mut groups = DisjointSet::new(map.len());
        let mut merges = 0;

        // Left and up are visited before the current plot in either order.
        for &position in &scan {
            let Some(label) = map.label(position) else {
                continue;
            };
            for offset in [(-1, 0), (0, -1)] {
                let Some(neighbour) = map.neighbour(position, offset) else {
                    continue;
                };
                if map.label(neighbour) == Some(label)
                    && groups.union(map.index(position), map.index(neighbour))
                {
                    merges += 1;
                }
            }
        }

        let mut region_ids: HashMap<usize, usize> = HashMap::new();
        let mut regions: Vec<Region> = Vec::new();

        for position in scan {
            let Some(label) = map.label(position) else {
                continue;
            };
            let root = groups.find(map.index(position));
            let id = *region_ids.entry(root).or_insert_with(|| {
                regions.push(Region::new(label));
                regions.len() - 1
            });
            regions[id].insert(Plot {
                position,
                fences: map.boundary_edge_count(position),
            });
        }

        debug!(merges, regions = regions.len(), "Partitioned garden map");
        Partition { regions }
    }

    fn scan(&self) -> Vec<Position> {
        let (width, height) = (self.map.width(), self.map.height());
        match self.order {
            ScanOrder::RowMajor => self.map.positions().collect(),
            ScanOrder::ColumnMajor => iproduct!(0..width, 0..height).collect(),
        }
    }
}

/// Union-find over cell indices with union by size and path halving.
#[derive(Debug, Clone)]
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Returns `true` when two distinct groups were merged.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::rstest;

    fn partition(input: &str) -> miette::Result<Partition> {
        let map = Map::parse(input)?;
        Ok(RegionBuilder::new(&map).build())
    }

    #[test]
    fn test_disjoint_set() {
        let mut set = DisjointSet::new(5);
        assert!(set.union(0, 1));
        assert!(set.union(3, 4));
        assert!(!set.union(1, 0));
        assert!(set.union(1, 4));
        assert_eq!(set.find(0), set.find(3));
        assert_ne!(set.find(0), set.find(2));
    }

    #[test_log::test]
    fn test_partition_example() -> miette::Result<()> {
        let partition = partition(
            "AAAA
BBCD
BBCC
EEEC",
        )?;

        assert_eq!(partition.len(), 5);
        let labels = partition.regions().iter().map(Region::label).collect::<String>();
        assert_eq!(labels, "ABCDE");

        let sizes = partition
            .regions()
            .iter()
            .map(|region| region.plots().count())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![4, 4, 4, 1, 3]);
        Ok(())
    }

    #[test_log::test]
    fn test_partition_disconnected_labels() -> miette::Result<()> {
        let partition = partition(
            "OOOOO
OXOXO
OOOOO
OXOXO
OOOOO",
        )?;

        assert_eq!(partition.len(), 5);
        let count_o = partition.regions().iter().filter(|r| r.label() == 'O').count();
        let count_x = partition.regions().iter().filter(|r| r.label() == 'X').count();
        assert_eq!(count_o, 1);
        assert_eq!(count_x, 4);
        Ok(())
    }

    #[test]
    fn test_diagonal_plots_are_separate_regions() -> miette::Result<()> {
        let partition = partition("AB\nBA")?;
        assert_eq!(partition.len(), 4);
        Ok(())
    }

    #[test]
    fn test_late_bridge_merges_groups() -> miette::Result<()> {
        // The two arms of the U only meet on the last row.
        let partition = partition(
            "ABA
ABA
AAA",
        )?;

        assert_eq!(partition.len(), 2);
        let region = partition.region_of((0, 0)).expect("plot has a region");
        assert!(region.contains((2, 0)));
        assert_eq!(region.plots().count(), 7);
        Ok(())
    }

    #[rstest]
    #[case::example("AAAA\nBBCD\nBBCC\nEEEC")]
    #[case::pockets("AAAAAA\nAAABBA\nAAABBA\nABBAAA\nABBAAA\nAAAAAA")]
    #[case::checkerboard("ABAB\nBABA\nABAB")]
    #[case::single("Q")]
    fn test_partition_covers_every_plot_once(#[case] input: &str) -> miette::Result<()> {
        let map = Map::parse(input)?;
        let partition = RegionBuilder::new(&map).build();

        let covered = partition
            .regions()
            .iter()
            .flat_map(|region| region.positions())
            .sorted()
            .collect::<Vec<_>>();
        let expected = map.positions().sorted().collect::<Vec<_>>();
        assert_eq!(covered, expected);

        for region in partition.regions() {
            assert!(region.plots().count() >= 1);
            assert!(region
                .positions()
                .all(|position| map.label(position) == Some(region.label())));
        }
        Ok(())
    }

    #[test]
    fn test_plot_fences() -> miette::Result<()> {
        let map = Map::parse("AAAA\nBBCD\nBBCC\nEEEC")?;
        let partition = RegionBuilder::new(&map).build();

        for plot in partition.regions().iter().flat_map(Region::plots) {
            assert_eq!(plot.fences, map.boundary_edge_count(plot.position));
        }
        Ok(())
    }

    #[test]
    fn test_column_major_scan() -> miette::Result<()> {
        let map = Map::parse("AAAA\nBBCD\nBBCC\nEEEC")?;
        let partition = RegionBuilder::new(&map)
            .scan_order(ScanOrder::ColumnMajor)
            .build();

        let labels = partition.regions().iter().map(Region::label).collect::<String>();
        assert_eq!(labels, "ABECD");
        Ok(())
    }

    #[test]
    fn test_contains_offset() -> miette::Result<()> {
        let partition = partition("AA\nAB")?;
        let region = partition.region_of((0, 0)).expect("plot has a region");
        assert!(region.contains_offset((0, 0), (1, 0)));
        assert!(!region.contains_offset((0, 0), (-1, 0)));
        assert!(!region.contains_offset((0, 0), (1, 1)));
        Ok(())
    }
}
