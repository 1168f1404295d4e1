//! Reading boards from text.
//!
//! The format is a list of whitespace-separated integers: the dimension `N`
//! followed by the `N * N` tiles in row-major order, `0` being the blank.
//!
//! ```text
//! 3
//!  0  1  3
//!  4  2  5
//!  7  8  6
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::board::Board;
use crate::error::ParseError;

pub fn parse_board(input: &str) -> Result<Board, ParseError> {
    let mut tokens = input.split_whitespace();

    let size: usize = tokens
        .next()
        .ok_or(ParseError::MissingDimension)?
        .parse()
        .map_err(|_| ParseError::MissingDimension)?;

    let tiles = tokens
        .map(|token| {
            token.parse::<u16>().map_err(|_| ParseError::InvalidToken {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<u16>, ParseError>>()?;

    let expected = size.saturating_mul(size);
    if tiles.len() != expected {
        return Err(ParseError::TileCount {
            expected,
            found: tiles.len(),
        });
    }

    Ok(Board::from_tiles(size, tiles)?)
}

pub fn read_board<P: AsRef<Path>>(path: P) -> Result<Board, ParseError> {
    let input = fs::read_to_string(path)?;
    parse_board(&input)
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board(s)
    }
}
