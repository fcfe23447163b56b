//! 绘制 (The Painter)
//!
//! 按固定顺序调用宿主节点:
//! CLIPTextEncode -> VAEEncode -> KSampler -> VAEDecode

use std::str::FromStr;

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};
use strum::VariantNames;
use strum_macros::{Display, EnumString, VariantNames};

use crate::{
    core::category::CATEGORY_MAGIC_MIRROR,
    error::Error,
    wrapper::{
        comfy::nodes::{ComfyNodes, KSamplerArgs},
        comfyui::{
            types::{
                NODE_CLIP, NODE_FLOAT, NODE_IMAGE, NODE_INT, NODE_INT_MAX, NODE_MODEL, NODE_STRING,
                NODE_VAE,
            },
            PromptServer,
        },
    },
};

pub const STEPS_MIN: u32 = 1;
pub const STEPS_MAX: u32 = 50;
pub const GUIDANCE_MAX: f64 = 10.0;

/// 采样器
#[derive(Debug, Clone, Copy, PartialEq, EnumString, Display, VariantNames)]
pub enum SamplerName {
    #[strum(to_string = "euler")]
    Euler,
    #[strum(to_string = "heun")]
    Heun,
    #[strum(to_string = "dpmpp_2m")]
    Dpmpp2m,
    #[strum(to_string = "dpmpp_sde")]
    DpmppSde,
}

/// 调度器
#[derive(Debug, Clone, Copy, PartialEq, EnumString, Display, VariantNames)]
pub enum Scheduler {
    #[strum(to_string = "simple")]
    Simple,
    #[strum(to_string = "normal")]
    Normal,
    #[strum(to_string = "beta")]
    Beta,
    #[strum(to_string = "karras")]
    Karras,
}

/// 采样参数
#[derive(Debug, Clone, PartialEq)]
pub struct PainterParams {
    pub steps: u32,
    pub guidance: f64,
    pub denoise: f64,
    pub seed: u64,
    pub sampler_name: SamplerName,
    pub scheduler: Scheduler,
}

impl PainterParams {
    /// 校验参数, 在调用宿主之前拒绝非法值
    pub fn new(
        steps: u32,
        guidance: f64,
        denoise: f64,
        seed: u64,
        sampler_name: &str,
        scheduler: &str,
    ) -> Result<Self, Error> {
        if !(STEPS_MIN..=STEPS_MAX).contains(&steps) {
            return Err(Error::InvalidParameter(format!(
                "steps must be in {STEPS_MIN}..={STEPS_MAX}, got {steps}"
            )));
        }
        if !guidance.is_finite() || !(0.0..=GUIDANCE_MAX).contains(&guidance) {
            return Err(Error::InvalidParameter(format!(
                "guidance must be in 0..={GUIDANCE_MAX}, got {guidance}"
            )));
        }
        if !denoise.is_finite() || !(0.0..=1.0).contains(&denoise) {
            return Err(Error::InvalidParameter(format!(
                "denoise must be in 0..=1, got {denoise}"
            )));
        }

        let sampler_name = SamplerName::from_str(sampler_name)
            .map_err(|e| Error::ParseEnumString(format!("sampler_name {sampler_name}: {e}")))?;
        let scheduler = Scheduler::from_str(scheduler)
            .map_err(|e| Error::ParseEnumString(format!("scheduler {scheduler}: {e}")))?;

        Ok(Self {
            steps,
            guidance,
            denoise,
            seed,
            sampler_name,
            scheduler,
        })
    }
}

/// 绘制
#[pyclass(subclass)]
pub struct MagicPainterWrapper {}

impl PromptServer for MagicPainterWrapper {}

#[pymethods]
impl MagicPainterWrapper {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_IMAGE,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("image",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (false,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_MAGIC_MIRROR;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Repaint the photo with the prompt: text encode, image encode, sample, decode."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("model", (NODE_MODEL, PyDict::new(py)))?;
                required.set_item("vae", (NODE_VAE, PyDict::new(py)))?;
                required.set_item("clip", (NODE_CLIP, PyDict::new(py)))?;
                required.set_item("image", (NODE_IMAGE, PyDict::new(py)))?;
                required.set_item(
                    "prompt",
                    (NODE_STRING, {
                        let prompt = PyDict::new(py);
                        prompt.set_item("forceInput", true)?;
                        prompt
                    }),
                )?;
                required.set_item(
                    "negative_prompt",
                    (NODE_STRING, {
                        let negative_prompt = PyDict::new(py);
                        negative_prompt.set_item("forceInput", true)?;
                        negative_prompt
                    }),
                )?;
                required.set_item(
                    "steps",
                    (NODE_INT, {
                        let steps = PyDict::new(py);
                        steps.set_item("default", 4)?;
                        steps.set_item("min", STEPS_MIN)?;
                        steps.set_item("max", STEPS_MAX)?;
                        steps
                    }),
                )?;
                required.set_item(
                    "guidance",
                    (NODE_FLOAT, {
                        let guidance = PyDict::new(py);
                        guidance.set_item("default", 1.0)?;
                        guidance.set_item("min", 0.0)?;
                        guidance.set_item("max", GUIDANCE_MAX)?;
                        guidance.set_item("step", 0.1)?;
                        guidance
                    }),
                )?;
                required.set_item(
                    "denoise",
                    (NODE_FLOAT, {
                        let denoise = PyDict::new(py);
                        denoise.set_item("default", 0.75)?;
                        denoise.set_item("min", 0.0)?;
                        denoise.set_item("max", 1.0)?;
                        denoise.set_item("step", 0.01)?;
                        denoise
                    }),
                )?;
                required.set_item(
                    "seed",
                    (NODE_INT, {
                        let seed = PyDict::new(py);
                        seed.set_item("default", 0)?;
                        seed.set_item("min", 0)?;
                        seed.set_item("max", NODE_INT_MAX)?;
                        seed
                    }),
                )?;
                required.set_item(
                    "sampler_name",
                    (SamplerName::VARIANTS.to_vec(), {
                        let sampler_name = PyDict::new(py);
                        sampler_name.set_item("default", SamplerName::Euler.to_string())?;
                        sampler_name
                    }),
                )?;
                required.set_item(
                    "scheduler",
                    (Scheduler::VARIANTS.to_vec(), {
                        let scheduler = PyDict::new(py);
                        scheduler.set_item("default", Scheduler::Simple.to_string())?;
                        scheduler
                    }),
                )?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[allow(clippy::too_many_arguments)]
    #[pyo3(name = "execute")]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        model: Bound<'py, PyAny>,
        vae: Bound<'py, PyAny>,
        clip: Bound<'py, PyAny>,
        image: Bound<'py, PyAny>,
        prompt: &str,
        negative_prompt: &str,
        steps: u32,
        guidance: f64,
        denoise: f64,
        seed: u64,
        sampler_name: &str,
        scheduler: &str,
    ) -> PyResult<(Bound<'py, PyAny>,)> {
        let results = PainterParams::new(steps, guidance, denoise, seed, sampler_name, scheduler)
            .and_then(|params| {
                self.paint(py, &model, &vae, &clip, &image, prompt, negative_prompt, &params)
            });

        match results {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("MagicPainterWrapper error, {e}");
                if let Err(send_err) =
                    self.send_error(py, "MagicPainterWrapper".to_string(), e.to_string())
                {
                    error!("send error failed, {send_err}");
                }
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl MagicPainterWrapper {
    #[allow(clippy::too_many_arguments)]
    fn paint<'py>(
        &self,
        py: Python<'py>,
        model: &Bound<'py, PyAny>,
        vae: &Bound<'py, PyAny>,
        clip: &Bound<'py, PyAny>,
        image: &Bound<'py, PyAny>,
        prompt: &str,
        negative_prompt: &str,
        params: &PainterParams,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let nodes = ComfyNodes::new(py)?;

        // 1. 文本编码
        let positive = nodes.clip_text_encode(clip, prompt)?;
        let negative = nodes.clip_text_encode(clip, negative_prompt)?;

        // 2. 图像编码
        let latent = nodes.vae_encode(vae, image)?;

        // 3. 采样
        let sampler_name = params.sampler_name.to_string();
        let scheduler = params.scheduler.to_string();
        info!(
            "painting: steps={} guidance={} denoise={} seed={} sampler={sampler_name} scheduler={scheduler}",
            params.steps, params.guidance, params.denoise, params.seed
        );
        let args = KSamplerArgs {
            seed: params.seed,
            steps: params.steps,
            cfg: params.guidance,
            sampler_name: &sampler_name,
            scheduler: &scheduler,
            denoise: params.denoise,
        };
        let samples = nodes.ksampler(model, &positive, &negative, &latent, &args)?;

        // 4. 解码
        let pixels = nodes.vae_decode(vae, &samples)?;
        Ok(pixels)
    }
}
