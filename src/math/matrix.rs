use rand::Rng;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Add, Sub, Mul};

use crate::error::{NnError, Result};

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![1.0; cols]; rows]
        }
    }

    /// Uniform samples in `[-epsilon, epsilon)`.
    ///
    /// Each entry is drawn from `[0, 1)` and mapped through `v * 2ε - ε`.
    pub fn random_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, epsilon: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>() * 2.0 * epsilon - epsilon;
            }
        }

        res
    }

    /// Builds a matrix from rows that are already known to be rectangular.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// Like `from_data`, but rejects empty and ragged input.
    pub fn try_from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(NnError::shape("matrix rows", "at least one non-empty row", "empty input")),
        };
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(NnError::shape(
                "matrix rows",
                format!("{cols} columns"),
                format!("{} columns in row {i}", row.len()),
            ));
        }
        Ok(Matrix::from_data(data))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Checks that `data` really holds `rows` rows of `cols` entries each.
    ///
    /// The fields are public, so a matrix built with `from_data` or edited in
    /// place can disagree with its own `rows`/`cols`.
    pub fn check_rectangular(&self, context: &'static str) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(NnError::shape(context, format!("{} rows", self.rows), format!("{} rows", self.data.len())));
        }
        if let Some((i, row)) = self.data.iter().enumerate().find(|(_, row)| row.len() != self.cols) {
            return Err(NnError::shape(
                context,
                format!("{} columns", self.cols),
                format!("{} columns in row {i}", row.len()),
            ));
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        let data = self.data.iter().zip(other.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// Sub-matrix of `rows x cols` entries starting at (`row`, `col`), zero-indexed.
    pub fn minor(&self, row: usize, col: usize, rows: usize, cols: usize) -> Matrix {
        assert!(row + rows <= self.rows && col + cols <= self.cols, "Minor out of bounds");
        let data = self.data[row..row + rows]
            .iter()
            .map(|r| r[col..col + cols].to_vec())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Horizontal concatenation: `[self | other]`.
    pub fn augment(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows, other.rows, "Matrices are of incorrect sizes");
        let data = self.data.iter().zip(other.data.iter())
            .map(|(left, right)| left.iter().chain(right.iter()).copied().collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols + other.cols, data }
    }

    /// Prepends a column of ones (bias augmentation).
    pub fn with_bias_column(&self) -> Matrix {
        Matrix::ones(self.rows, 1).augment(self)
    }

    pub fn drop_first_column(&self) -> Matrix {
        self.minor(0, 1, self.rows, self.cols.saturating_sub(1))
    }

    /// `count` consecutive rows starting at `start`, wrapping past the last row.
    pub fn rows_wrapping(&self, start: usize, count: usize) -> Matrix {
        assert!(self.rows > 0, "Cannot slice rows of an empty matrix");
        let data = (0..count)
            .map(|k| self.data[(start + k) % self.rows].clone())
            .collect();
        Matrix { rows: count, cols: self.cols, data }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            let cells: Vec<String> = row.iter().map(|x| format!("{x:.4}")).collect();
            writeln!(f, "[{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

impl<'a> Add<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn add(self, rhs: &'a Matrix) -> Matrix {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }

        res
    }
}

impl<'a> Sub<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn sub(self, rhs: &'a Matrix) -> Matrix {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl<'a> Mul<&'a Matrix> for &'a Matrix {
    type Output = Matrix;

    fn mul(self, rhs: &'a Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res =  Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Sub for Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}
