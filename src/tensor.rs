//! Dense tensors of rank three and four.
//!
//! These are plain row-major containers used for mesh sensitivities, where the indices
//! typically range over equations, spatial directions and nodes.
use num::Zero;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankThreeTensor<T> {
    dims: [usize; 3],
    data: Vec<T>,
}

impl<T: Clone + Zero> RankThreeTensor<T> {
    pub fn zeros(d0: usize, d1: usize, d2: usize) -> Self {
        Self {
            dims: [d0, d1, d2],
            data: vec![T::zero(); d0 * d1 * d2],
        }
    }
}

impl<T> RankThreeTensor<T> {
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, (i, j, k): (usize, usize, usize)) -> usize {
        let [d0, d1, d2] = self.dims;
        assert!(i < d0 && j < d1 && k < d2, "Index {:?} out of bounds for dims {:?}", (i, j, k), self.dims);
        (i * d1 + j) * d2 + k
    }
}

impl<T> Index<(usize, usize, usize)> for RankThreeTensor<T> {
    type Output = T;

    fn index(&self, index: (usize, usize, usize)) -> &T {
        &self.data[self.offset(index)]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for RankThreeTensor<T> {
    fn index_mut(&mut self, index: (usize, usize, usize)) -> &mut T {
        let offset = self.offset(index);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankFourTensor<T> {
    dims: [usize; 4],
    data: Vec<T>,
}

impl<T: Clone + Zero> RankFourTensor<T> {
    pub fn zeros(d0: usize, d1: usize, d2: usize, d3: usize) -> Self {
        Self {
            dims: [d0, d1, d2, d3],
            data: vec![T::zero(); d0 * d1 * d2 * d3],
        }
    }
}

impl<T> RankFourTensor<T> {
    pub fn dims(&self) -> [usize; 4] {
        self.dims
    }

    fn offset(&self, (i, j, k, l): (usize, usize, usize, usize)) -> usize {
        let [d0, d1, d2, d3] = self.dims;
        assert!(
            i < d0 && j < d1 && k < d2 && l < d3,
            "Index {:?} out of bounds for dims {:?}",
            (i, j, k, l),
            self.dims
        );
        ((i * d1 + j) * d2 + k) * d3 + l
    }
}

impl<T> Index<(usize, usize, usize, usize)> for RankFourTensor<T> {
    type Output = T;

    fn index(&self, index: (usize, usize, usize, usize)) -> &T {
        &self.data[self.offset(index)]
    }
}

impl<T> IndexMut<(usize, usize, usize, usize)> for RankFourTensor<T> {
    fn index_mut(&mut self, index: (usize, usize, usize, usize)) -> &mut T {
        let offset = self.offset(index);
        &mut self.data[offset]
    }
}
