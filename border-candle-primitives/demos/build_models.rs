//! Builds a CNN encoder followed by an MLP head and prints their parameters.
//!
//! ```bash
//! cargo run --example build_models -- --cnn-config cnn.yaml --mlp-config mlp.yaml
//! ```
//!
//! Without arguments, an encoder for stacked 42x42 frames and a Q-value head
//! with 6 outputs are built.
use anyhow::Result;
use border_candle_primitives::{
    cnn::{Cnn, CnnConfig, CnnFilterSpec},
    mlp::{Mlp, MlpConfig},
    util::{num_params, param_shapes, OutDim},
    SubModel1,
};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use clap::Parser;
use log::info;
use std::path::PathBuf;

const BATCH_SIZE: usize = 8;
const N_ACTIONS: usize = 6;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML file of the CNN configuration
    #[arg(long)]
    cnn_config: Option<PathBuf>,

    /// YAML file of the MLP configuration, its input dim is overwritten
    #[arg(long)]
    mlp_config: Option<PathBuf>,
}

fn cnn_config(args: &Args) -> Result<CnnConfig> {
    match &args.cnn_config {
        Some(path) => CnnConfig::load(path),
        None => Ok(CnnConfig::new(
            vec![42, 42, 4],
            vec![
                CnnFilterSpec::new(16, 4, 2),
                CnnFilterSpec::new(32, 4, 2),
                CnnFilterSpec::new(256, 11, 1),
            ],
        )),
    }
}

fn mlp_config(args: &Args, in_dim: usize) -> Result<MlpConfig> {
    let mut config = match &args.mlp_config {
        Some(path) => MlpConfig::load(path)?,
        None => {
            let mut config = MlpConfig::new(in_dim, vec![256], None);
            config.set_out_dim(N_ACTIONS);
            config
        }
    };
    config.input_dim = in_dim;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let device = Device::Cpu;
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);

    let cnn = Cnn::build(vb.pp("encoder"), cnn_config(&args)?)?;
    let [h, w, c] = cnn.output_dims();
    let mlp = <Mlp as SubModel1>::build(vb.pp("head"), mlp_config(&args, h * w * c)?)?;

    for (name, shape) in param_shapes(&varmap)? {
        println!("{:<32} {:?}", name, shape);
    }
    info!("Number of parameters: {}", num_params(&varmap));

    let [in_h, in_w, in_c] = {
        let d = &cnn.config().input_dims;
        [d[0], d[1], d[2]]
    };
    let obs = Tensor::zeros((BATCH_SIZE, in_h, in_w, in_c), DType::U8, &device)?;
    let feature = cnn.forward(&obs)?.flatten_from(1)?;
    let out = mlp.forward(&feature)?;
    info!("Output shape: {:?}", out.dims());

    Ok(())
}
