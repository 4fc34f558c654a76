//! Layers of the CNN stack not covered by `candle_nn` as is.
use super::{Padding, Size2};
use candle_core::{Module, Result, Tensor};
use candle_nn::{init, Init, LayerNorm, VarBuilder};

/// Conv2D layer with explicit zero padding.
///
/// Unlike [`candle_nn::Conv2d`], the kernel and the stride can differ along
/// height and width, and the padding can be asymmetric.
#[derive(Clone, Debug)]
pub struct SameConv2d {
    weight: Tensor,
    bias: Option<Tensor>,
    padding: Padding,
    stride: (usize, usize),
}

impl SameConv2d {
    /// Creates the layer, getting its parameters from `vb`.
    ///
    /// The weight has shape `[out_depth, in_depth, kernel_h, kernel_w]` and the
    /// bias `[out_depth]`.
    pub fn new(
        in_depth: usize,
        out_depth: usize,
        kernel: Size2,
        stride: Size2,
        padding: Padding,
        use_bias: bool,
        vb: VarBuilder,
    ) -> Result<Self> {
        let (k_h, k_w) = kernel.hw();
        let weight = vb.get_with_hints(
            (out_depth, in_depth, k_h, k_w),
            "weight",
            init::DEFAULT_KAIMING_NORMAL,
        )?;
        let bias = if use_bias {
            let bound = 1. / ((in_depth * k_h * k_w) as f64).sqrt();
            let init_bs = Init::Uniform {
                lo: -bound,
                up: bound,
            };
            Some(vb.get_with_hints(out_depth, "bias", init_bs)?)
        } else {
            None
        };

        Ok(Self {
            weight,
            bias,
            padding,
            stride: stride.hw(),
        })
    }

    /// Kernel of the convolution, `[out_depth, in_depth, kernel_h, kernel_w]`.
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// Bias of the convolution, `[out_depth]`, if any.
    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }
}

impl Module for SameConv2d {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let p = &self.padding;
        let xs = xs
            .pad_with_zeros(2, p.top, p.bottom)?
            .pad_with_zeros(3, p.left, p.right)?;
        let (s_h, s_w) = self.stride;

        let ys = if s_h == s_w {
            xs.conv2d(&self.weight, 0, s_h, 1, 1)?
        } else {
            // Strided convolution is done by subsampling a dense one
            let ys = xs.conv2d(&self.weight, 0, 1, 1, 1)?;
            let (_, _, h, w) = ys.dims4()?;
            let ix_h = Tensor::arange_step(0u32, h as u32, s_h as u32, ys.device())?;
            let ix_w = Tensor::arange_step(0u32, w as u32, s_w as u32, ys.device())?;
            ys.index_select(&ix_h, 2)?.index_select(&ix_w, 3)?
        };

        match &self.bias {
            None => Ok(ys),
            Some(bias) => {
                let b = bias.dims1()?;
                ys.broadcast_add(&bias.reshape((1, b, 1, 1))?)
            }
        }
    }
}

/// Layer normalization over `[depth, height, width]` of a channels-first feature map.
///
/// The scale and the shift are elementwise, with the same shape as the
/// normalized dims.
#[derive(Clone, Debug)]
pub struct SpatialLayerNorm {
    dims: (usize, usize, usize),
    ln: LayerNorm,
}

impl SpatialLayerNorm {
    /// Creates the layer, getting its scale (`weight`, initialized to one) and
    /// shift (`bias`, initialized to zero) from `vb`.
    pub fn new(depth: usize, height: usize, width: usize, vb: VarBuilder) -> Result<Self> {
        let dims = (depth, height, width);
        let weight = vb.get_with_hints(dims, "weight", Init::Const(1.))?;
        let bias = vb.get_with_hints(dims, "bias", Init::Const(0.))?;
        let ln = LayerNorm::new(weight.flatten_all()?, bias.flatten_all()?, 1e-5);

        Ok(Self { dims, ln })
    }

    /// Returns `(depth, height, width)` of the normalized feature map.
    pub fn dims(&self) -> (usize, usize, usize) {
        self.dims
    }
}

impl Module for SpatialLayerNorm {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (b, c, h, w) = xs.dims4()?;
        let ys = self.ln.forward(&xs.flatten_from(1)?)?;
        ys.reshape((b, c, h, w))
    }
}
