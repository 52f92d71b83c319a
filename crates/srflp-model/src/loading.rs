// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for the single row layout domain.
//!
//! Instances are whitespace-delimited integer streams: the facility count,
//! one width per facility, and the full row-major weight matrix. Lines may
//! carry comments introduced by `#`. Facility `i` is bound to row `i` of the
//! matrix and the result is checked by `Model::from_parts`, so a loaded
//! model satisfies the same invariants as a programmatically built one.
//!
//! Instance files in the wild frequently store only the upper triangle with
//! zeros below the diagonal. `ProblemLoader::symmetrize` mirrors the upper
//! triangle onto the lower one for those inputs.

use crate::{
    facility::Facility,
    index::FacilityIndex,
    model::{Model, ModelError},
};
use num_traits::{PrimInt, Signed};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

/// The error type for the problem loading process.
#[derive(Debug, Error)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input stream ended before the instance was complete.
    #[error("unexpected end of file while parsing instance")]
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    #[error("parse error: {0}")]
    Parse(#[from] ParseTokenError),
    /// The facility count is not a positive integer.
    #[error("the number of facilities must be a positive integer")]
    InvalidDimensions,
    /// The parsed data does not form a valid instance.
    #[error("invalid instance: {0}")]
    Model(#[from] ModelError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse token '{token}' as type {type_name}")]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

/// A configurable loader for SRFLP instances.
///
/// The expected format (whitespace-separated tokens):
///
/// ```raw
/// N
/// w_0 ... w_{N-1}           (facility widths)
/// c_0_0 ... c_0_{N-1}       (weight matrix, row-major)
/// ...
/// c_{N-1}_0 ... c_{N-1}_{N-1}
/// ```
///
/// # Configuration
/// * `symmetrize`: copy every entry above the diagonal onto its mirror
///   position below it, ignoring what the input stores there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader<T> {
    symmetrize: bool,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for ProblemLoader<T> {
    fn default() -> Self {
        Self {
            symmetrize: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> ProblemLoader<T>
where
    T: PrimInt + Signed + FromStr,
{
    /// Creates a new `ProblemLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether the upper triangle of the matrix is mirrored.
    #[inline]
    pub fn symmetrize(mut self, yes: bool) -> Self {
        self.symmetrize = yes;
        self
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Model<T>, ProblemLoaderError> {
        let mut sc = Scanner::new(rdr);

        let n_val: T = sc.next()?;
        let n = n_val
            .to_usize()
            .filter(|&n| n > 0)
            .ok_or(ProblemLoaderError::InvalidDimensions)?;

        // The declared count is untrusted until the tokens are read, so the
        // buffers grow with the input instead of being reserved up front.
        let mut facilities = Vec::new();
        for i in 0..n {
            let width: T = sc.next()?;
            facilities.push(Facility::new(width, FacilityIndex::new(i)));
        }

        let mut weights: Vec<Vec<T>> = Vec::new();
        for _ in 0..n {
            let mut row = Vec::new();
            for _ in 0..n {
                row.push(sc.next()?);
            }
            weights.push(row);
        }

        if self.symmetrize {
            for i in 0..n {
                for j in (i + 1)..n {
                    weights[j][i] = weights[i][j];
                }
            }
        }

        Ok(Model::from_parts(facilities, &weights)?)
    }

    /// Loads a problem from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Model<T>, ProblemLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Model<T>, ProblemLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a problem from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Model<T>, ProblemLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, ProblemLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Reads the next token and parses it into `U`.
    fn next<U>(&mut self) -> Result<U, ProblemLoaderError>
    where
        U: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(ProblemLoaderError::UnexpectedEof);
            }

            let line = &self.buf[self.pos..];
            let line = match line.find('#') {
                Some(cut) => &line[..cut],
                None => line,
            };

            let start = match line.find(|c: char| !c.is_whitespace()) {
                Some(start) => start,
                None => {
                    // Whitespace or comment only; move on to the next line.
                    self.pos = self.buf.len();
                    continue;
                }
            };
            let rest = &line[start..];
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let token = &rest[..len];
            self.pos += start + len;

            return token.parse::<U>().map_err(|_| {
                ProblemLoaderError::Parse(ParseTokenError {
                    token: token.to_owned(),
                    type_name: std::any::type_name::<U>(),
                })
            });
        }
    }
}
