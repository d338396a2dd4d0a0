use std::collections::HashMap;

use candle_core::{DType, Device, Tensor};
use rtenv_candle::{load, load_pickle, load_safetensors, var_builder};
use rtenv_core::error::Error;
use rtenv_core::{ExecutionContext, ExecutionDevice, MapLocation};
use tempfile::TempDir;

fn cpu_context() -> ExecutionContext {
    ExecutionContext {
        device: ExecutionDevice::Cpu,
        map_location: Some(MapLocation::Cpu),
        thread_request: Some(2),
        intra_op_threads: Some(2),
        autotune: true,
    }
}

fn pickle_fixture() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/linear.pt")
}

fn write_weights(dir: &TempDir) -> std::path::PathBuf {
    let dev = Device::Cpu;
    let mut tensors = HashMap::new();
    tensors.insert("linear.weight".to_string(), Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0], (2, 2), &dev).unwrap());
    tensors.insert("linear.bias".to_string(), Tensor::from_slice(&[0.5f32, -0.5], 2, &dev).unwrap());
    let path = dir.path().join("model.safetensors");
    candle_core::safetensors::save(&tensors, &path).unwrap();
    path
}

#[test]
fn safetensors_land_on_cpu_map_location() {
    let tmp = TempDir::new().unwrap();
    let path = write_weights(&tmp);

    let tensors = load_safetensors(&cpu_context(), &path).expect("load");
    assert_eq!(tensors.len(), 2);
    let w = &tensors["linear.weight"];
    assert!(matches!(w.device(), Device::Cpu));
    assert_eq!(w.to_vec2::<f32>().unwrap(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}

#[test]
fn load_dispatches_on_extension() {
    let tmp = TempDir::new().unwrap();
    let path = write_weights(&tmp);
    assert_eq!(load(&cpu_context(), &path).expect("load").len(), 2);

    let odd = tmp.path().join("model.onnx");
    std::fs::write(&odd, b"not a checkpoint").unwrap();
    let err = load(&cpu_context(), &odd).unwrap_err();
    assert!(matches!(err, Error::Backend(_)), "{err:?}");
}

#[test]
fn missing_artifact_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_safetensors(&cpu_context(), &tmp.path().join("absent.safetensors")).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
}

#[test]
fn var_builder_reads_named_weights() {
    let tmp = TempDir::new().unwrap();
    let path = write_weights(&tmp);

    let vb = var_builder(&cpu_context(), &path, DType::F32).expect("var builder");
    let bias = vb.pp("linear").get(2, "bias").expect("bias");
    assert_eq!(bias.to_vec1::<f32>().unwrap(), vec![0.5, -0.5]);
}

#[test]
fn pytorch_checkpoint_lands_on_cpu_map_location() {
    let tensors = load_pickle(&cpu_context(), &pickle_fixture()).expect("load .pt");

    let mut names: Vec<&str> = tensors.keys().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["linear.bias", "linear.weight"]);

    let w = &tensors["linear.weight"];
    assert!(matches!(w.device(), Device::Cpu));
    assert_eq!(w.dtype(), DType::F32);
    assert_eq!(w.to_vec2::<f32>().unwrap(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

    let b = &tensors["linear.bias"];
    assert!(matches!(b.device(), Device::Cpu));
    assert_eq!(b.to_vec1::<f32>().unwrap(), vec![0.5, -0.5]);
}

#[test]
fn load_routes_pt_extension_to_pickle_reader() {
    let tensors = load(&cpu_context(), &pickle_fixture()).expect("load .pt");
    assert_eq!(tensors.len(), 2);
    assert_eq!(tensors["linear.weight"].dims(), &[2, 2]);

    let vb = var_builder(&cpu_context(), &pickle_fixture(), DType::F32).expect("var builder");
    let w = vb.pp("linear").get((2, 2), "weight").expect("weight");
    assert_eq!(w.to_vec2::<f32>().unwrap(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
}
