//! Convert to Python object wrapper
//! 依赖:
//! - python: torch, numpy

use std::marker::PhantomData;

use candle_core::{Device, Tensor, WithDType};
use numpy::{Element, PyArray, PyArrayDyn, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::{
    exceptions::PyRuntimeError, types::PyAnyMethods, Bound, IntoPyObject, PyAny, PyErr, PyResult,
    Python,
};

use crate::error::Error;

pub struct TensorWrapper<T>
where
    T: Element + WithDType,
{
    tensor: Tensor,
    _marker: PhantomData<T>,
}

impl<T> TensorWrapper<T>
where
    T: Element + WithDType,
{
    /// 从 numpy.ndarray 构建
    ///
    /// cv2 返回的帧即为 numpy 数组, 无需经过 torch
    pub fn from_ndarray(py_any: &Bound<'_, PyAny>, device: &Device) -> Result<Self, Error> {
        let arr = py_any
            .downcast::<PyArrayDyn<T>>()
            .map_err(|e| Error::PyDowncastError(e.to_string()))?;

        let shape = arr.shape().to_vec();
        let data = arr.to_vec()?;

        let tensor = Tensor::from_vec(data, shape, device)?;
        Ok(Self::from_tensor(tensor))
    }

    /// The dimension size for this tensor on each axis.
    pub fn dims(&self) -> &[usize] {
        self.tensor.dims()
    }

    pub fn from_tensor(tensor: Tensor) -> Self {
        Self {
            tensor,
            _marker: PhantomData,
        }
    }

    pub fn into_tensor(self) -> Tensor {
        self.tensor
    }
}

impl<T> TensorWrapper<T>
where
    T: Element + WithDType,
{
    /// 转换为python对象
    ///
    /// 将数组转换为 python 的 tensor
    /// ```python,ignore
    /// import torch
    /// tensor = torch.tensor(data)
    /// ```
    pub fn to_py_tensor<'py>(self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let data = self.into_pyobject(py)?;

        let torch = py.import("torch")?;
        torch.getattr("tensor")?.call1((data,))
    }
}

impl<T> From<Tensor> for TensorWrapper<T>
where
    T: Element + WithDType,
{
    fn from(value: Tensor) -> Self {
        TensorWrapper::from_tensor(value)
    }
}

impl<'py, T> IntoPyObject<'py> for TensorWrapper<T>
where
    T: Element + WithDType,
{
    type Target = PyArrayDyn<T>; // the Python type
    type Output = Bound<'py, Self::Target>; // in most cases this will be `Bound`
    type Error = PyErr; // the conversion error type, has to be convertable to `PyErr`

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        let tensor = self.into_tensor();
        let shape = tensor.dims().to_vec();

        let data = tensor
            .flatten_all()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?
            .to_vec1::<T>()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        // 创建数组并重新排列维度
        let array = PyArray::from_iter(py, data)
            .reshape(shape)
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?;

        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use candle_core::DType;
    use pyo3::types::PyList;

    use super::*;

    #[test]
    fn test_from_tensor_keeps_dims() -> anyhow::Result<()> {
        let tensor = Tensor::zeros((1, 4, 6, 3), DType::F32, &Device::Cpu)?;
        let wrapper: TensorWrapper<f32> = tensor.into();

        assert_eq!(wrapper.dims(), &[1, 4, 6, 3]);
        Ok(())
    }

    #[test]
    #[ignore]
    fn test_from_ndarray_rejects_list() -> anyhow::Result<()> {
        Python::with_gil(|py| {
            let binding = PyList::empty(py);
            let result = TensorWrapper::<u8>::from_ndarray(binding.as_any(), &Device::Cpu);
            assert!(matches!(result, Err(Error::PyDowncastError(_))));
        });

        Ok(())
    }

    #[test]
    #[ignore]
    fn test_to_py_tensor() -> anyhow::Result<()> {
        Python::with_gil(|py| -> anyhow::Result<()> {
            let tensor = Tensor::ones((1, 2, 2, 3), DType::F32, &Device::Cpu)?;
            let py_tensor = TensorWrapper::<f32>::from_tensor(tensor).to_py_tensor(py)?;
            let shape: Vec<usize> = py_tensor.getattr("shape")?.extract()?;
            assert_eq!(shape, vec![1, 2, 2, 3]);
            Ok(())
        })
    }
}
