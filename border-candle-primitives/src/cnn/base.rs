use super::{same_padding, CnnConfig, SameConv2d, SpatialLayerNorm};
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{
    sequential::{seq, Sequential},
    VarBuilder,
};
use log::{debug, info};

#[allow(clippy::upper_case_acronyms)]
/// Convolutional neural network with Conv2D layers padded in SAME mode.
pub struct Cnn {
    config: CnnConfig,
    device: Device,
    seq: Sequential,
    layer_names: Vec<String>,
    output_height: usize,
    output_width: usize,
    output_depth: usize,
}

impl Cnn {
    fn create_net(vb: &VarBuilder, config: &CnnConfig) -> Result<(Sequential, Vec<String>, [usize; 3])> {
        let act = config.cnn_activation;
        let mut seq = seq();
        let mut names = vec![];
        let mut in_size = [config.input_dims[0], config.input_dims[1]];
        let mut in_depth = config.input_dims[2];

        for (i, spec) in config.cnn_filter_specifiers.iter().enumerate() {
            let (padding, out_size) = same_padding(in_size, spec.kernel, spec.stride);
            let out_depth = spec.out_depth;
            seq = seq.add(SameConv2d::new(
                in_depth,
                out_depth,
                spec.kernel,
                spec.stride,
                padding,
                config.use_bias,
                vb.pp(format!("c{}", i)),
            )?);
            names.push(format!(
                "conv2d({}, {}, kernel={:?}, stride={:?}, padding={:?})",
                in_depth,
                out_depth,
                spec.kernel.hw(),
                spec.stride.hw(),
                padding
            ));

            if config.cnn_use_layernorm {
                seq = seq.add(SpatialLayerNorm::new(
                    out_depth,
                    out_size[0],
                    out_size[1],
                    vb.pp(format!("norm{}", i)),
                )?);
                names.push(format!(
                    "layer_norm({}, {}, {})",
                    out_depth, out_size[0], out_size[1]
                ));
            }
            if !act.is_linear() {
                seq = seq.add(act);
                names.push(act.to_string());
            }

            in_size = out_size;
            in_depth = out_depth;
        }

        Ok((seq, names, [in_size[0], in_size[1], in_depth]))
    }

    /// Returns the configuration of the CNN.
    pub fn config(&self) -> &CnnConfig {
        &self.config
    }

    /// Height of the output feature map.
    pub fn output_height(&self) -> usize {
        self.output_height
    }

    /// Width of the output feature map.
    pub fn output_width(&self) -> usize {
        self.output_width
    }

    /// Number of channels of the output feature map.
    pub fn output_depth(&self) -> usize {
        self.output_depth
    }

    /// `[height, width, depth]` of the output feature map.
    pub fn output_dims(&self) -> [usize; 3] {
        [self.output_height, self.output_width, self.output_depth]
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

impl Module for Cnn {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        // [batch, h, w, c] -> [batch, c, h, w]
        let xs = xs
            .to_device(&self.device)?
            .permute((0, 3, 1, 2))?
            .to_dtype(DType::F32)?
            .contiguous()?;
        self.seq.forward(&xs)
    }
}

impl SubModel1 for Cnn {
    type Config = CnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        Ok(Module::forward(self, xs)?)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        config.check()?;
        let device = vb.device().clone();
        let (seq, layer_names, [output_height, output_width, output_depth]) =
            Self::create_net(&vb.pp("cnn"), &config)?;

        info!(
            "Build CNN with input dims {:?} and output dims {:?}",
            config.input_dims,
            [output_height, output_width, output_depth]
        );
        for (i, name) in layer_names.iter().enumerate() {
            debug!("cnn layer {}: {}", i, name);
        }

        Ok(Self {
            config,
            device,
            seq,
            layer_names,
            output_height,
            output_width,
            output_depth,
        })
    }
}
