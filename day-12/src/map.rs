use std::fmt;
use std::str::FromStr;

use itertools::iproduct;
use miette::SourceSpan;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{line_ending, none_of},
    multi::{many0, separated_list1},
    IResult, Parser,
};
use nom_locate::{position, LocatedSpan};
use tracing::debug;

use crate::error::FormatError;

/// `(x, y)` where `x` is the column and `y` the row, both zero-based.
pub type Position = (usize, usize);

/// Up, right, down, left.
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Immutable rectangular garden map of plot labels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Map {
    width: usize,
    height: usize,
    labels: Vec<char>,
}

impl Map {
    /// Parses a block of equal-length rows. Surrounding whitespace is ignored;
    /// inside the block every character other than a line break is a label.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FormatError::Empty);
        }

        let (rest, rows) = parse_rows(Span::new(trimmed)).map_err(|e| {
            let offset = match &e {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input.location_offset(),
                nom::Err::Incomplete(_) => trimmed.len(),
            };
            FormatError::Parse {
                src: trimmed.to_string(),
                span: (offset, 1).into(),
            }
        })?;

        if !rest.fragment().is_empty() {
            return Err(FormatError::Parse {
                src: trimmed.to_string(),
                span: (rest.location_offset(), 1).into(),
            });
        }

        let width = rows.first().map_or(0, |row| row.labels.len());
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.labels.len() != width)
        {
            return Err(FormatError::RaggedRow {
                row: index + 1,
                expected: width,
                found: row.labels.len(),
                src: trimmed.to_string(),
                span: row.span(),
            });
        }

        let height = rows.len();
        let labels = rows
            .into_iter()
            .flat_map(|row| row.labels)
            .collect();
        debug!("Map dimensions: {}x{}", width, height);

        Ok(Self {
            width,
            height,
            labels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the signed coordinates fall on the map.
    pub fn is_inside(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn label(&self, position: Position) -> Option<char> {
        let (x, y) = position;
        if x < self.width && y < self.height {
            Some(self.labels[self.index(position)])
        } else {
            None
        }
    }

    /// The in-bounds position at `offset` from `position`, if any.
    pub fn neighbour(&self, position: Position, offset: (isize, isize)) -> Option<Position> {
        let x = position.0 as isize + offset.0;
        let y = position.1 as isize + offset.1;
        self.is_inside(x, y).then_some((x as usize, y as usize))
    }

    /// Counts the sides of the plot that face the map edge or a differently
    /// labelled plot. Positions outside the map have no fences.
    pub fn boundary_edge_count(&self, position: Position) -> u8 {
        let Some(label) = self.label(position) else {
            return 0;
        };

        ORTHOGONAL
            .iter()
            .filter(|&&offset| {
                self.neighbour(position, offset)
                    .and_then(|neighbour| self.label(neighbour))
                    != Some(label)
            })
            .count() as u8
    }

    /// Every position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        iproduct!(0..self.height, 0..self.width).map(|(y, x)| (x, y))
    }

    pub(crate) fn index(&self, position: Position) -> usize {
        position.1 * self.width + position.0
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }
}

impl FromStr for Map {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.labels.chunks(self.width) {
            for label in row {
                write!(f, "{}", label)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// region: nom parser
type Span<'a> = LocatedSpan<&'a str>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LocatedRow<'a> {
    start: Span<'a>,
    labels: Vec<char>,
}

impl LocatedRow<'_> {
    fn span(&self) -> SourceSpan {
        let len = self.labels.iter().map(|label| label.len_utf8()).sum::<usize>();
        (self.start.location_offset(), len).into()
    }
}

fn parse_label(input: Span) -> IResult<Span, char> {
    none_of("\r\n").parse(input)
}

fn parse_row(input: Span) -> IResult<Span, LocatedRow> {
    let (input, start) = position(input)?;
    let (input, labels) = many0(parse_label)(input)?;
    Ok((input, LocatedRow { start, labels }))
}

fn parse_rows(input: Span) -> IResult<Span, Vec<LocatedRow>> {
    separated_list1(alt((line_ending, tag("\r"))), parse_row)(input)
}
// endregion
