use super::MlpConfig;
use crate::model::{SubModel1, SubModel2};
use anyhow::Result;
use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{
    layer_norm, linear_b,
    sequential::{seq, Sequential},
    LayerNormConfig, VarBuilder,
};
use log::{debug, info};

/// Multilayer perceptron.
///
/// The layer stack is `[linear, (layer_norm), (activation)] * n_hidden`
/// followed by `[linear, (activation)]` if an output dimension is given.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    seq: Sequential,
    layer_names: Vec<String>,
}

impl Mlp {
    fn create_net(vb: &VarBuilder, config: &MlpConfig) -> Result<(Sequential, Vec<String>)> {
        let dims = config.dims();
        let n_pairs = dims.len() - 1;
        let hidden_act = config.hidden_layer_activation;
        let mut seq = seq();
        let mut names = vec![];

        for i in 0..n_pairs {
            let (in_dim, out_dim) = (dims[i], dims[i + 1]);
            seq = seq.add(linear_b(
                in_dim,
                out_dim,
                config.use_bias,
                vb.pp(format!("ln{}", i)),
            )?);
            names.push(format!("linear({}, {})", in_dim, out_dim));

            // The output layer, if any, gets neither layer norm nor the hidden activation
            if config.output_dim.is_some() && i == n_pairs - 1 {
                break;
            }

            if config.hidden_layer_use_layernorm {
                let ln_config = LayerNormConfig::default();
                seq = seq.add(layer_norm(out_dim, ln_config, vb.pp(format!("norm{}", i)))?);
                names.push(format!("layer_norm({})", out_dim));
            }
            if !hidden_act.is_linear() {
                seq = seq.add(hidden_act);
                names.push(hidden_act.to_string());
            }
        }

        if config.output_dim.is_some() && !config.output_activation.is_linear() {
            seq = seq.add(config.output_activation);
            names.push(config.output_activation.to_string());
        }

        Ok((seq, names))
    }

    fn _build(vb: VarBuilder, config: MlpConfig) -> Result<Self> {
        config.check()?;
        let device = vb.device().clone();
        let (seq, layer_names) = Self::create_net(&vb.pp("mlp"), &config)?;

        info!("Build MLP with dims {:?}", config.dims());
        for (i, name) in layer_names.iter().enumerate() {
            debug!("mlp layer {}: {}", i, name);
        }

        Ok(Self {
            config,
            device,
            seq,
            layer_names,
        })
    }

    /// Returns the configuration of the MLP.
    pub fn config(&self) -> &MlpConfig {
        &self.config
    }

    /// Input dimension.
    pub fn in_dim(&self) -> usize {
        self.config.input_dim
    }

    /// Output dimension.
    pub fn out_dim(&self) -> usize {
        crate::util::OutDim::get_out_dim(&self.config)
    }

    /// Number of layers in the stack, including normalization and activation layers.
    pub fn n_layers(&self) -> usize {
        self.layer_names.len()
    }

    /// Human readable names of the layers in the stack.
    pub fn layer_names(&self) -> &[String] {
        &self.layer_names
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = xs.to_device(&self.device)?.to_dtype(DType::F32)?;
        self.seq.forward(&xs)
    }
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        Ok(Module::forward(self, xs)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        Self::_build(vb, config)
    }
}

impl SubModel2 for Mlp {
    type Config = MlpConfig;
    type Input1 = Tensor;
    type Input2 = Tensor;
    type Output = Tensor;

    fn forward(&self, input1: &Self::Input1, input2: &Self::Input2) -> Result<Self::Output> {
        let input1 = input1.to_device(&self.device)?.to_dtype(DType::F32)?;
        let input2 = input2.to_device(&self.device)?.to_dtype(DType::F32)?;
        let input = Tensor::cat(&[input1, input2], D::Minus1)?;
        Ok(self.seq.forward(&input)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        Self::_build(vb, config)
    }
}
