use std::ops::{Index, IndexMut};

use super::Tensor;

// 引用式索引：`tensor[[i, c, h, w]]`，索引维数须与张量阶数一致
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        assert!(index.len() == self.dimension(), "索引维数与张量阶数不一致");
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        assert!(index.len() == self.dimension(), "索引维数与张量阶数不一致");
        &mut self.data[&index[..]]
    }
}
