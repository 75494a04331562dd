//! Small integer linear algebra on lattice data.
//!
//! Matrices here are tiny (side ≤ ~10), so determinants use Bareiss
//! elimination in `i128` and solves go through f64 LU with an integrality
//! check on the way back.

use nalgebra::DMatrix;

use crate::cfg::{INTEGRALITY_EPS, RANK_EPS};

pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Divide by the gcd of the entries; zero vectors are returned unchanged.
pub fn primitive(v: &[i64]) -> Vec<i64> {
    let g = v.iter().fold(0, |g, &x| gcd(g, x));
    if g <= 1 {
        return v.to_vec();
    }
    v.iter().map(|x| x / g).collect()
}

/// Exact determinant of a square integer matrix given by rows.
pub fn int_det(rows: &[Vec<i64>]) -> i64 {
    let n = rows.len();
    if n == 0 {
        return 1;
    }
    let mut m: Vec<Vec<i128>> = rows
        .iter()
        .map(|r| r.iter().map(|&x| x as i128).collect())
        .collect();
    let mut sign = 1i128;
    let mut prev = 1i128;
    for k in 0..n - 1 {
        if m[k][k] == 0 {
            let Some(swap) = (k + 1..n).find(|&i| m[i][k] != 0) else {
                return 0;
            };
            m.swap(k, swap);
            sign = -sign;
        }
        for i in k + 1..n {
            for j in k + 1..n {
                m[i][j] = (m[i][j] * m[k][k] - m[i][k] * m[k][j]) / prev;
            }
        }
        prev = m[k][k];
    }
    (sign * m[n - 1][n - 1]) as i64
}

/// Integer normal to `n-1` vectors in Z^n (generalized cross product).
///
/// Zero iff the vectors are linearly dependent.
pub fn normal_of(rows: &[Vec<i64>], n: usize) -> Vec<i64> {
    debug_assert_eq!(rows.len() + 1, n);
    (0..n)
        .map(|j| {
            let minor: Vec<Vec<i64>> = rows
                .iter()
                .map(|r| {
                    r.iter()
                        .enumerate()
                        .filter(|&(c, _)| c != j)
                        .map(|(_, &x)| x)
                        .collect()
                })
                .collect();
            let d = int_det(&minor);
            if j % 2 == 0 {
                d
            } else {
                -d
            }
        })
        .collect()
}

#[inline]
pub fn dot(a: &[i64], b: &[i64]) -> i64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn to_f64(m: &DMatrix<i64>) -> DMatrix<f64> {
    m.map(|x| x as f64)
}

pub fn rank(m: &DMatrix<i64>) -> usize {
    if m.is_empty() {
        return 0;
    }
    to_f64(m).rank(RANK_EPS)
}

/// Rank of a list of integer rows.
pub fn rank_rows(rows: &[Vec<i64>]) -> usize {
    if rows.is_empty() || rows[0].is_empty() {
        return 0;
    }
    let m = DMatrix::from_fn(rows.len(), rows[0].len(), |r, c| rows[r][c] as f64);
    m.rank(RANK_EPS)
}

/// Round an f64 matrix to integers if every entry is within tolerance.
pub fn round_integral(m: &DMatrix<f64>) -> Option<DMatrix<i64>> {
    if m.iter().any(|x| (x - x.round()).abs() > INTEGRALITY_EPS) {
        return None;
    }
    Some(m.map(|x| x.round() as i64))
}

/// `a^{-1} b` for square invertible `a`, if the result is integral.
pub fn solve_integral(a: &DMatrix<i64>, b: &DMatrix<i64>) -> Option<DMatrix<i64>> {
    if int_det(&rows_of(a)) == 0 {
        return None;
    }
    let x = to_f64(a).lu().solve(&to_f64(b))?;
    round_integral(&x)
}

pub fn rows_of(m: &DMatrix<i64>) -> Vec<Vec<i64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

pub fn from_rows(rows: &[Vec<i64>], ncols: usize) -> DMatrix<i64> {
    DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c])
}

/// Columns `cols` of `m`, in that order.
pub fn select_columns(m: &DMatrix<i64>, cols: &[usize]) -> DMatrix<i64> {
    DMatrix::from_fn(m.nrows(), cols.len(), |r, c| m[(r, cols[c])])
}

/// Place column `j` of `m` at column `cols[j]` of a zero matrix with `ncols` columns.
pub fn scatter_columns(m: &DMatrix<i64>, cols: &[usize], ncols: usize) -> DMatrix<i64> {
    let mut out = DMatrix::zeros(m.nrows(), ncols);
    for (j, &c) in cols.iter().enumerate() {
        out.set_column(c, &m.column(j));
    }
    out
}

/// Lexicographic `k`-subsets of `0..n`.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.clone());
        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            break;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    out
}
