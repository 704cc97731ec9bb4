//! Encoded state vectors and their materialization.
//!
//! Encoders accumulate into an [`Accumulator`] (index -> value) without caring about the output
//! format. [`Accumulator::materialize`] then picks the element type and builds either a dense
//! `ndarray` vector or a one-row CSR matrix from the same values.

use std::collections::BTreeMap;

use dsf_core::OutputKind;
use ndarray::Array1;

/// Element type of an encoded vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dtype {
    Int32,
    Float64,
}

impl Dtype {
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::Int32 => "int32",
            Dtype::Float64 => "float64",
        }
    }
}

/// How an encoder's element type is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypePolicy {
    /// Int32 when every accumulated value is a whole number, Float64 otherwise.
    Infer,
    /// Always Int32.
    Integer,
}

fn is_whole(v: f64) -> bool {
    v.is_finite() && v.floor() == v
}

/// Representation-agnostic index -> value accumulation of width `width`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    width: usize,
    values: BTreeMap<usize, f64>,
}

impl Accumulator {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            values: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Overwrite the value at `index`.
    pub fn set(&mut self, index: usize, value: f64) {
        assert!(
            index < self.width,
            "feature index {index} out of range for width {}",
            self.width
        );
        self.values.insert(index, value);
    }

    /// Add `value` to whatever is already stored at `index`.
    pub fn add(&mut self, index: usize, value: f64) {
        assert!(
            index < self.width,
            "feature index {index} out of range for width {}",
            self.width
        );
        *self.values.entry(index).or_insert(0.0) += value;
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values.get(&index).copied().unwrap_or(0.0)
    }

    /// True when every stored value is a whole number (vacuously true when nothing was stored).
    pub fn is_integral(&self) -> bool {
        self.values.values().all(|&v| is_whole(v))
    }

    pub fn resolve_dtype(&self, policy: DtypePolicy) -> Dtype {
        match policy {
            DtypePolicy::Integer => Dtype::Int32,
            DtypePolicy::Infer if self.is_integral() => Dtype::Int32,
            DtypePolicy::Infer => Dtype::Float64,
        }
    }

    pub fn materialize(&self, output: OutputKind, policy: DtypePolicy) -> Encoded {
        let dtype = self.resolve_dtype(policy);
        match output {
            OutputKind::Dense => Encoded::Dense(self.to_dense(dtype)),
            OutputKind::Sparse => Encoded::Sparse(self.to_sparse(dtype)),
        }
    }

    fn to_dense(&self, dtype: Dtype) -> DenseVector {
        match dtype {
            Dtype::Int32 => {
                let mut out = Array1::<i32>::zeros(self.width);
                for (&i, &v) in &self.values {
                    out[i] = v as i32;
                }
                DenseVector::Int(out)
            }
            Dtype::Float64 => {
                let mut out = Array1::<f64>::zeros(self.width);
                for (&i, &v) in &self.values {
                    out[i] = v;
                }
                DenseVector::Float(out)
            }
        }
    }

    fn to_sparse(&self, dtype: Dtype) -> SparseRow {
        // BTreeMap iteration gives ascending column indices, as CSR requires.
        let nonzero = self.values.iter().filter(|(_, &v)| v != 0.0);
        match dtype {
            Dtype::Int32 => SparseRow::Int(CsrRow::from_sorted(
                self.width,
                nonzero.map(|(&i, &v)| (i, v as i32)),
            )),
            Dtype::Float64 => SparseRow::Float(CsrRow::from_sorted(
                self.width,
                nonzero.map(|(&i, &v)| (i, v)),
            )),
        }
    }
}

/// Fixed-width dense vector, one element per feature.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseVector {
    Int(Array1<i32>),
    Float(Array1<f64>),
}

impl DenseVector {
    pub fn len(&self) -> usize {
        match self {
            DenseVector::Int(a) => a.len(),
            DenseVector::Float(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            DenseVector::Int(_) => Dtype::Int32,
            DenseVector::Float(_) => Dtype::Float64,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            DenseVector::Int(a) => a.get(index).map(|&v| f64::from(v)),
            DenseVector::Float(a) => a.get(index).copied(),
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            DenseVector::Int(a) => a.iter().map(|&v| f64::from(v)).collect(),
            DenseVector::Float(a) => a.to_vec(),
        }
    }

    pub fn as_int(&self) -> Option<&Array1<i32>> {
        match self {
            DenseVector::Int(a) => Some(a),
            DenseVector::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<&Array1<f64>> {
        match self {
            DenseVector::Float(a) => Some(a),
            DenseVector::Int(_) => None,
        }
    }
}

/// A 1 x `width` compressed sparse row matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrRow<T> {
    width: usize,
    indptr: [usize; 2],
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: Copy> CsrRow<T> {
    /// `entries` must be in strictly ascending column order.
    fn from_sorted<I: IntoIterator<Item = (usize, T)>>(width: usize, entries: I) -> Self {
        let (indices, data): (Vec<usize>, Vec<T>) = entries.into_iter().unzip();
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(indices.last().map_or(true, |&i| i < width));
        Self {
            width,
            indptr: [0, indices.len()],
            indices,
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (1, self.width)
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Stored value at column `col`; `None` for implicit zeros and out-of-range columns.
    pub fn get(&self, col: usize) -> Option<T> {
        self.indices
            .binary_search(&col)
            .ok()
            .map(|pos| self.data[pos])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SparseRow {
    Int(CsrRow<i32>),
    Float(CsrRow<f64>),
}

impl SparseRow {
    pub fn width(&self) -> usize {
        match self {
            SparseRow::Int(m) => m.width,
            SparseRow::Float(m) => m.width,
        }
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            SparseRow::Int(_) => Dtype::Int32,
            SparseRow::Float(_) => Dtype::Float64,
        }
    }

    pub fn nnz(&self) -> usize {
        match self {
            SparseRow::Int(m) => m.nnz(),
            SparseRow::Float(m) => m.nnz(),
        }
    }

    /// `(column, value)` pairs in ascending column order.
    pub fn entries(&self) -> Vec<(usize, f64)> {
        match self {
            SparseRow::Int(m) => m
                .indices
                .iter()
                .zip(&m.data)
                .map(|(&i, &v)| (i, f64::from(v)))
                .collect(),
            SparseRow::Float(m) => m.indices.iter().copied().zip(m.data.iter().copied()).collect(),
        }
    }

    pub fn get(&self, col: usize) -> Option<f64> {
        if col >= self.width() {
            return None;
        }
        let v = match self {
            SparseRow::Int(m) => m.get(col).map(f64::from),
            SparseRow::Float(m) => m.get(col),
        };
        Some(v.unwrap_or(0.0))
    }
}

/// Output of one encode call.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Dense(DenseVector),
    Sparse(SparseRow),
}

impl Encoded {
    pub fn kind(&self) -> OutputKind {
        match self {
            Encoded::Dense(_) => OutputKind::Dense,
            Encoded::Sparse(_) => OutputKind::Sparse,
        }
    }

    /// Number of features (row width for the sparse form).
    pub fn width(&self) -> usize {
        match self {
            Encoded::Dense(d) => d.len(),
            Encoded::Sparse(s) => s.width(),
        }
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            Encoded::Dense(d) => d.dtype(),
            Encoded::Sparse(s) => s.dtype(),
        }
    }

    /// Scalar value at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Encoded::Dense(d) => d.get(index),
            Encoded::Sparse(s) => s.get(index),
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Encoded::Dense(d) => d.to_f64_vec(),
            Encoded::Sparse(s) => {
                let mut out = vec![0.0; s.width()];
                for (i, v) in s.entries() {
                    out[i] = v;
                }
                out
            }
        }
    }

    /// Nonzero `(index, value)` pairs in ascending index order.
    pub fn nonzeros(&self) -> Vec<(usize, f64)> {
        match self {
            Encoded::Dense(d) => d
                .to_f64_vec()
                .into_iter()
                .enumerate()
                .filter(|&(_, v)| v != 0.0)
                .collect(),
            Encoded::Sparse(s) => s.entries().into_iter().filter(|&(_, v)| v != 0.0).collect(),
        }
    }

    /// Scalar equality at every index, regardless of representation and element type.
    pub fn value_eq(&self, other: &Encoded) -> bool {
        self.width() == other.width() && self.nonzeros() == other.nonzeros()
    }

    pub fn as_dense(&self) -> Option<&DenseVector> {
        match self {
            Encoded::Dense(d) => Some(d),
            Encoded::Sparse(_) => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseRow> {
        match self {
            Encoded::Sparse(s) => Some(s),
            Encoded::Dense(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(width: usize, values: &[(usize, f64)]) -> Accumulator {
        let mut a = Accumulator::new(width);
        for &(i, v) in values {
            a.add(i, v);
        }
        a
    }

    #[test]
    fn whole_values_materialize_as_int() {
        let a = acc(4, &[(0, 1.0), (3, 1.0), (2, 0.0)]);
        let dense = a.materialize(OutputKind::Dense, DtypePolicy::Infer);
        assert_eq!(dense.dtype(), Dtype::Int32);
        assert_eq!(
            dense.as_dense().and_then(DenseVector::as_int).unwrap().to_vec(),
            vec![1, 0, 0, 1]
        );
    }

    #[test]
    fn one_fractional_value_promotes_to_float() {
        let a = acc(3, &[(0, 1.0), (1, 0.2), (2, 1.0)]);
        let dense = a.materialize(OutputKind::Dense, DtypePolicy::Infer);
        assert_eq!(dense.dtype(), Dtype::Float64);
        assert_eq!(dense.to_f64_vec(), vec![1.0, 0.2, 1.0]);

        // Summing fractions back to a whole number is integral again.
        let b = acc(1, &[(0, 0.5), (0, 0.5)]);
        assert_eq!(b.resolve_dtype(DtypePolicy::Infer), Dtype::Int32);
    }

    #[test]
    fn integer_policy_ignores_values() {
        let a = acc(2, &[(1, 0.5)]);
        assert_eq!(a.resolve_dtype(DtypePolicy::Integer), Dtype::Int32);
    }

    #[test]
    fn set_overwrites_and_add_sums() {
        let mut a = Accumulator::new(2);
        a.set(0, 0.3);
        a.set(0, 1.0);
        a.add(1, 0.5);
        a.add(1, 1.0);
        assert_eq!(a.get(0), 1.0);
        assert_eq!(a.get(1), 1.5);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_index_panics() {
        Accumulator::new(2).add(2, 1.0);
    }

    #[test]
    fn sparse_row_omits_zeros_and_matches_dense() {
        let a = acc(5, &[(4, 1.0), (0, 2.0), (1, 0.0)]);
        let sparse = a.materialize(OutputKind::Sparse, DtypePolicy::Integer);
        let dense = a.materialize(OutputKind::Dense, DtypePolicy::Integer);

        let SparseRow::Int(m) = sparse.as_sparse().unwrap() else {
            panic!("expected int sparse row");
        };
        assert_eq!(m.shape(), (1, 5));
        assert_eq!(m.indptr(), &[0, 2]);
        assert_eq!(m.indices(), &[0, 4]);
        assert_eq!(m.data(), &[2, 1]);
        assert_eq!(m.get(1), None);

        assert_eq!(sparse.get(1), Some(0.0));
        assert_eq!(sparse.get(5), None);
        assert!(sparse.value_eq(&dense));
        assert_eq!(sparse.to_f64_vec(), dense.to_f64_vec());
    }

    #[test]
    fn empty_accumulator_is_all_zero_int() {
        let a = Accumulator::new(3);
        let dense = a.materialize(OutputKind::Dense, DtypePolicy::Infer);
        let sparse = a.materialize(OutputKind::Sparse, DtypePolicy::Infer);
        assert_eq!(dense.dtype(), Dtype::Int32);
        assert_eq!(dense.to_f64_vec(), vec![0.0; 3]);
        assert_eq!(sparse.width(), 3);
        assert_eq!(sparse.as_sparse().unwrap().nnz(), 0);
        assert!(dense.value_eq(&sparse));
    }

    #[test]
    fn value_eq_detects_width_and_value_differences() {
        let a = acc(3, &[(0, 1.0)]).materialize(OutputKind::Dense, DtypePolicy::Infer);
        let b = acc(4, &[(0, 1.0)]).materialize(OutputKind::Dense, DtypePolicy::Infer);
        let c = acc(3, &[(0, 0.5)]).materialize(OutputKind::Sparse, DtypePolicy::Infer);
        assert!(!a.value_eq(&b));
        assert!(!a.value_eq(&c));
        assert_eq!(Dtype::Float64.as_str(), "float64");
    }
}
