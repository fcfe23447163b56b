//! ComfyUI 内置节点 (nodes.py) 包装
//!
//! 直接调用宿主的节点实现, 对象在 python 侧流转, 不做张量转换

use pyo3::{
    types::{PyAnyMethods, PyDict, PyDictMethods, PyModule, PyTuple},
    Bound, IntoPyObject, PyAny, Python,
};

use crate::error::Error;

/// KSampler 参数
#[derive(Debug, Clone)]
pub struct KSamplerArgs<'a> {
    pub seed: u64,
    pub steps: u32,
    pub cfg: f64,
    pub sampler_name: &'a str,
    pub scheduler: &'a str,
    pub denoise: f64,
}

/// nodes 模块
pub struct ComfyNodes<'py> {
    nodes: Bound<'py, PyModule>,
}

impl<'py> ComfyNodes<'py> {
    pub fn new(py: Python<'py>) -> Result<Self, Error> {
        let nodes = py.import("nodes")?;
        Ok(Self { nodes })
    }

    /// 实例化节点并调用其执行函数, 取第一个输出
    fn call_node(
        &self,
        class_name: &str,
        function: &str,
        args: Bound<'py, PyTuple>,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let node = self.nodes.getattr(class_name)?.call0()?;
        let output = node.call_method1(function, args)?;
        Ok(output.get_item(0)?)
    }

    /// CLIPTextEncode
    pub fn clip_text_encode(
        &self,
        clip: &Bound<'py, PyAny>,
        text: &str,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let args = (clip, text).into_pyobject(self.nodes.py())?;
        self.call_node("CLIPTextEncode", "encode", args)
    }

    /// VAEEncode
    pub fn vae_encode(
        &self,
        vae: &Bound<'py, PyAny>,
        pixels: &Bound<'py, PyAny>,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let args = (vae, pixels).into_pyobject(self.nodes.py())?;
        self.call_node("VAEEncode", "encode", args)
    }

    /// VAEDecode
    pub fn vae_decode(
        &self,
        vae: &Bound<'py, PyAny>,
        samples: &Bound<'py, PyAny>,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let args = (vae, samples).into_pyobject(self.nodes.py())?;
        self.call_node("VAEDecode", "decode", args)
    }

    /// KSampler
    pub fn ksampler(
        &self,
        model: &Bound<'py, PyAny>,
        positive: &Bound<'py, PyAny>,
        negative: &Bound<'py, PyAny>,
        latent: &Bound<'py, PyAny>,
        args: &KSamplerArgs<'_>,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let py = self.nodes.py();
        let sampler = self.nodes.getattr("KSampler")?.call0()?;

        let kwargs = PyDict::new(py);
        kwargs.set_item("denoise", args.denoise)?;

        let output = sampler.call_method(
            "sample",
            (
                model,
                args.seed,
                args.steps,
                args.cfg,
                args.sampler_name,
                args.scheduler,
                positive,
                negative,
                latent,
            ),
            Some(&kwargs),
        )?;
        Ok(output.get_item(0)?)
    }
}
