use anyhow::Result;
use border_candle_primitives::{
    cnn::{Cnn, CnnConfig, CnnFilterSpec},
    util::param_shapes,
    Activation, PrimitivesError, SubModel1,
};
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use tempdir::TempDir;
use test_log::test;

fn build(config: CnnConfig) -> Result<(Cnn, VarMap)> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let cnn = Cnn::build(vb, config)?;
    Ok((cnn, varmap))
}

fn shape_of(shapes: &[(String, Vec<usize>)], name: &str) -> Option<Vec<usize>> {
    shapes
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, s)| s.clone())
}

fn small_atari_config() -> CnnConfig {
    CnnConfig::new(
        vec![42, 42, 4],
        vec![
            CnnFilterSpec::new(16, 4, 2),
            CnnFilterSpec::new(32, 4, 2),
            CnnFilterSpec::new(64, 3, 1),
        ],
    )
}

#[test]
fn test_cnn_output_dims() -> Result<()> {
    let config = small_atari_config();
    assert_eq!(config.output_dims()?, [11, 11, 64]);

    let (cnn, varmap) = build(config)?;
    assert_eq!(cnn.output_dims(), [11, 11, 64]);
    assert_eq!(
        (cnn.output_height(), cnn.output_width(), cnn.output_depth()),
        (11, 11, 64)
    );

    let shapes = param_shapes(&varmap)?;
    assert_eq!(shapes.len(), 6);
    assert_eq!(shape_of(&shapes, "cnn.c0.weight"), Some(vec![16, 4, 4, 4]));
    assert_eq!(shape_of(&shapes, "cnn.c0.bias"), Some(vec![16]));
    assert_eq!(shape_of(&shapes, "cnn.c1.weight"), Some(vec![32, 16, 4, 4]));
    assert_eq!(shape_of(&shapes, "cnn.c2.weight"), Some(vec![64, 32, 3, 3]));
    assert_eq!(shape_of(&shapes, "cnn.c2.bias"), Some(vec![64]));

    // Channels-last input, channels-first output
    let xs = Tensor::randn(0f32, 1f32, (2, 42, 42, 4), &Device::Cpu)?;
    let ys = cnn.forward(&xs)?;
    assert_eq!(ys.dims(), &[2, 64, 11, 11]);
    assert!(ys.min_all()?.to_scalar::<f32>()? >= 0.0);

    Ok(())
}

#[test]
fn test_cnn_layernorm() -> Result<()> {
    let config = small_atari_config().cnn_use_layernorm(true);
    let (cnn, varmap) = build(config)?;

    let shapes = param_shapes(&varmap)?;
    assert_eq!(shapes.len(), 12);
    assert_eq!(shape_of(&shapes, "cnn.norm0.weight"), Some(vec![16, 21, 21]));
    assert_eq!(shape_of(&shapes, "cnn.norm0.bias"), Some(vec![16, 21, 21]));
    assert_eq!(shape_of(&shapes, "cnn.norm1.weight"), Some(vec![32, 11, 11]));
    assert_eq!(shape_of(&shapes, "cnn.norm2.weight"), Some(vec![64, 11, 11]));

    assert_eq!(cnn.n_layers(), 9);
    assert_eq!(cnn.layer_names()[1], "layer_norm(16, 21, 21)");
    assert_eq!(cnn.layer_names()[2], "relu");

    let xs = Tensor::randn(0f32, 1f32, (3, 42, 42, 4), &Device::Cpu)?;
    assert_eq!(cnn.forward(&xs)?.dims(), &[3, 64, 11, 11]);

    Ok(())
}

#[test]
fn test_cnn_rectangular_kernel_and_stride() -> Result<()> {
    let config = CnnConfig::new(vec![7, 9, 3], vec![CnnFilterSpec::new(5, (2, 3), (1, 2))]);
    let (cnn, varmap) = build(config)?;

    assert_eq!(cnn.output_dims(), [7, 5, 5]);
    let shapes = param_shapes(&varmap)?;
    assert_eq!(shape_of(&shapes, "cnn.c0.weight"), Some(vec![5, 3, 2, 3]));

    let xs = Tensor::randn(0f32, 1f32, (1, 7, 9, 3), &Device::Cpu)?;
    assert_eq!(cnn.forward(&xs)?.dims(), &[1, 5, 7, 5]);

    Ok(())
}

#[test]
fn test_cnn_without_bias_and_activation() -> Result<()> {
    let config = CnnConfig::new(vec![8, 8, 1], vec![CnnFilterSpec::new(2, 3, 1)])
        .use_bias(false)
        .cnn_activation(Activation::Linear);
    let (cnn, varmap) = build(config)?;

    assert_eq!(param_shapes(&varmap)?, vec![("cnn.c0.weight".to_string(), vec![2, 1, 3, 3])]);
    assert_eq!(cnn.n_layers(), 1);

    // A linear stack of zero-padded convolutions maps zeros to zeros
    let xs = Tensor::zeros((1, 8, 8, 1), DType::F32, &Device::Cpu)?;
    let ys = cnn.forward(&xs)?;
    assert_eq!(ys.dims(), &[1, 2, 8, 8]);
    assert_eq!(ys.abs()?.max_all()?.to_scalar::<f32>()?, 0.0);

    Ok(())
}

#[test]
fn test_cnn_casts_u8_input() -> Result<()> {
    let (cnn, _varmap) = build(small_atari_config())?;
    let xs = Tensor::zeros((1, 42, 42, 4), DType::U8, &Device::Cpu)?;
    let ys = cnn.forward(&xs)?;
    assert_eq!(ys.dtype(), DType::F32);
    assert_eq!(ys.dims(), &[1, 64, 11, 11]);
    Ok(())
}

#[test]
fn test_cnn_invalid_config() -> Result<()> {
    let config = CnnConfig::new(vec![42, 42], vec![CnnFilterSpec::new(16, 4, 2)]);
    let err = match build(config) {
        Ok(_) => panic!("CNN with 2 input dims must not be built"),
        Err(err) => err,
    };
    assert_eq!(
        err.downcast_ref::<PrimitivesError>(),
        Some(&PrimitivesError::InputRank(2))
    );

    let config = CnnConfig::new(vec![42, 42, 4], vec![]);
    let err = match build(config) {
        Ok(_) => panic!("CNN without filters must not be built"),
        Err(err) => err,
    };
    assert_eq!(
        err.downcast_ref::<PrimitivesError>(),
        Some(&PrimitivesError::EmptyFilterSpecifiers)
    );

    Ok(())
}

#[test]
fn test_cnn_config_yaml() -> Result<()> {
    let mut config = small_atari_config()
        .cnn_use_layernorm(true)
        .cnn_activation(Activation::Elu);
    config
        .cnn_filter_specifiers
        .push(CnnFilterSpec::new(8, (2, 3), (1, 2)));

    let tmp_dir = TempDir::new("cnn_config")?;
    let path = tmp_dir.path().join("cnn.yaml");
    config.save(&path)?;
    let config_ = CnnConfig::load(&path)?;
    assert_eq!(config, config_);

    Ok(())
}

#[test]
fn test_cnn_kernel_smaller_than_stride_samples_from_origin() -> Result<()> {
    let config = CnnConfig::new(vec![6, 6, 1], vec![CnnFilterSpec::new(1, 1, 4)])
        .use_bias(false)
        .cnn_activation(Activation::Linear);
    let (cnn, varmap) = build(config)?;
    assert_eq!(cnn.output_dims(), [2, 2, 1]);

    varmap
        .data()
        .lock()
        .unwrap()
        .get("cnn.c0.weight")
        .unwrap()
        .set(&Tensor::ones((1, 1, 1, 1), DType::F32, &Device::Cpu)?)?;

    // Pixel value is 10 * row + col
    let pixels = (0..36).map(|i| (10 * (i / 6) + i % 6) as f32).collect::<Vec<_>>();
    let xs = Tensor::from_vec(pixels, (1, 6, 6, 1), &Device::Cpu)?;
    let ys = cnn.forward(&xs)?.flatten_all()?.to_vec1::<f32>()?;
    assert_eq!(ys, vec![0., 4., 40., 44.]);

    Ok(())
}
