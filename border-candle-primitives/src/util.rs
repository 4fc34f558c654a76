//! Utilities.
use anyhow::{anyhow, Result};
use candle_nn::VarMap;

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: usize);
}

/// Returns the total number of scalar parameters in `varmap`.
pub fn num_params(varmap: &VarMap) -> usize {
    varmap.all_vars().iter().map(|v| v.elem_count()).sum()
}

/// Returns the names and shapes of the parameters in `varmap`, sorted by name.
pub fn param_shapes(varmap: &VarMap) -> Result<Vec<(String, Vec<usize>)>> {
    let data = varmap
        .data()
        .lock()
        .map_err(|_| anyhow!("VarMap lock is poisoned"))?;
    let mut shapes = data
        .iter()
        .map(|(k, v)| (k.clone(), v.dims().to_vec()))
        .collect::<Vec<_>>();
    shapes.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(shapes)
}

#[test]
fn test_param_shapes() -> Result<()> {
    use candle_core::{DType, Device};
    use candle_nn::Init;

    let varmap = VarMap::new();
    varmap.get((3, 2), "b", Init::Const(0.), DType::F32, &Device::Cpu)?;
    varmap.get(4, "a", Init::Const(1.), DType::F32, &Device::Cpu)?;

    assert_eq!(num_params(&varmap), 10);
    assert_eq!(
        param_shapes(&varmap)?,
        vec![("a".to_string(), vec![4]), ("b".to_string(), vec![3, 2])]
    );

    Ok(())
}
