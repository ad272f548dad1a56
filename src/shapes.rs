//! Shape masks and the piece catalog.

use crate::keyfile;
use rand::Rng;
use std::path::Path;
use thiserror::Error;

/// Standard catalog: name and pattern (rows split by `/`, `#` filled, `.` empty).
const STANDARD_SHAPES: &[(&str, &str)] = &[
    ("single", "#"),
    ("i2", "##"),
    ("i2_v", "#/#"),
    ("i3", "###"),
    ("i3_v", "#/#/#"),
    ("i4", "####"),
    ("i4_v", "#/#/#/#"),
    ("i5", "#####"),
    ("i5_v", "#/#/#/#/#"),
    ("o", "##/##"),
    ("o3", "###/###/###"),
    // Small L in its 2x2 box.
    ("l2", "#./##"),
    ("l2_90", "##/#."),
    ("l2_180", "##/.#"),
    ("l2_270", ".#/##"),
    ("l3", "#./#./##"),
    ("l3_90", "###/#.."),
    ("l3_180", "##/.#/.#"),
    ("l3_270", "..#/###"),
    ("j3", ".#/.#/##"),
    ("j3_90", "#../###"),
    ("j3_180", "##/#./#."),
    ("j3_270", "###/..#"),
    ("t", "###/.#."),
    ("t_90", ".#/##/.#"),
    ("t_180", ".#./###"),
    ("t_270", "#./##/#."),
];

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("shape {name:?}: {reason}")]
    Invalid { name: String, reason: &'static str },
    #[error("shape catalog is empty")]
    EmptyCatalog,
}

/// Immutable boolean mask, `height` rows of `width` cells, at least one filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    name: String,
    width: usize,
    height: usize,
    mask: Vec<bool>,
}

impl Shape {
    /// Build a shape from a pattern like `"###/.#."`.
    /// `#`/`X` are filled, `.`/`0` empty; every row must have the same width.
    pub fn parse(name: &str, pattern: &str) -> Result<Self, ShapeError> {
        let invalid = |reason| ShapeError::Invalid {
            name: name.to_string(),
            reason,
        };
        let mut width = 0;
        let mut height = 0;
        let mut mask = Vec::new();
        for row in pattern.trim().split('/') {
            let row = row.trim();
            if row.is_empty() {
                return Err(invalid("empty row"));
            }
            let before = mask.len();
            for c in row.chars() {
                match c {
                    '#' | 'X' | 'x' => mask.push(true),
                    '.' | '0' => mask.push(false),
                    _ => return Err(invalid("unexpected character (use '#' and '.')")),
                }
            }
            let row_width = mask.len() - before;
            if height == 0 {
                width = row_width;
            } else if row_width != width {
                return Err(invalid("rows have different widths"));
            }
            height += 1;
        }
        if !mask.iter().any(|&filled| filled) {
            return Err(invalid("no filled cell"));
        }
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            mask,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Filled cells as (dx, dy) relative to the top-left of the mask.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Number of filled cells.
    pub fn cell_count(&self) -> usize {
        self.mask.iter().filter(|&&filled| filled).count()
    }
}

/// Fixed table of shapes that hand pieces are drawn from.
#[derive(Debug, Clone)]
pub struct Catalog {
    shapes: Vec<Shape>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// The built-in shapes: bars, squares, L/J/T in all four rotations.
    pub fn standard() -> Self {
        let shapes = STANDARD_SHAPES
            .iter()
            .filter_map(|(name, pattern)| Shape::parse(name, pattern).ok())
            .collect();
        Self { shapes }
    }

    /// Catalog made only of the given (name, pattern) definitions.
    pub fn from_defs<I, N, P>(defs: I) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: AsRef<str>,
        P: AsRef<str>,
    {
        let mut catalog = Self { shapes: Vec::new() };
        for (name, pattern) in defs {
            catalog.insert(Shape::parse(name.as_ref(), pattern.as_ref())?);
        }
        if catalog.shapes.is_empty() {
            return Err(ShapeError::EmptyCatalog);
        }
        Ok(catalog)
    }

    /// Standard catalog merged with the `shape[name]="pattern"` entries of a file.
    /// A file entry with a built-in name replaces that shape; new names are appended.
    pub fn load(path: Option<&Path>) -> Result<Self, ShapeError> {
        let mut catalog = Self::standard();
        let Some(path) = path else {
            return Ok(catalog);
        };
        let s = std::fs::read_to_string(path)?;
        for (name, pattern) in keyfile::parse_entries("shape", &s) {
            catalog.insert(Shape::parse(&name, &pattern)?);
        }
        Ok(catalog)
    }

    fn insert(&mut self, shape: Shape) {
        match self.shapes.iter_mut().find(|s| s.name == shape.name) {
            Some(existing) => *existing = shape,
            None => self.shapes.push(shape),
        }
    }

    /// Uniform draw over the whole catalog.
    pub fn random_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> &Shape {
        &self.shapes[rng.random_range(0..self.shapes.len())]
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
