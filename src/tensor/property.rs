/*
 * @Author       : 老董
 * @Date         : 2026-10-17
 * @Description  : 本类仅包含一些属性方法及扁平切片，不包含任何运算方法
 */

use super::Tensor;

impl Tensor {
    /// 以行优先的扁平切片读取全部元素
    pub fn as_slice(&self) -> &[f32] {
        self.data
            .as_slice()
            .expect("张量数据始终为行优先的连续内存布局")
    }

    /// 以行优先的扁平切片改写全部元素
    pub fn as_slice_mut(&mut self) -> &mut [f32] {
        self.data
            .as_slice_mut()
            .expect("张量数据始终为行优先的连续内存布局")
    }

    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为批次数据，`shape`可以是[num, channels, height, width]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    /// 即`shape()`的元素个数--如：形状为`[]`的标量阶数为0，向量阶数为1，矩阵阶数为2，以此类推
    /// NOTE: 注意和损失层中的`dim`（每个样本的元素数）区分，后者见`BatchShape::dim`
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量（即count）
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 将所有元素置为`value`
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}
